use crate::errors::Result;
use crate::prober::ProbeRow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Defines the possible output formats for probe reports.
#[derive(Debug, Clone)]
pub enum ReportFormat {
    /// A simple, human-readable text format.
    Text,
    /// JSON format, suitable for machine processing.
    Json,
    /// Comma-Separated Values format.
    Csv,
}

impl From<&str> for ReportFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => ReportFormat::Json,
            "csv" => ReportFormat::Csv,
            _ => ReportFormat::Text,
        }
    }
}

/// Handles the formatting of probe rows into the supported output formats.
pub struct ProbeReportFormatter {
    format: ReportFormat,
    tool_name: String,
    tool_version: String,
}

impl ProbeReportFormatter {
    pub fn new(format: ReportFormat) -> Self {
        Self {
            format,
            tool_name: "mfr".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Writes the formatted report to a given writer.
    pub fn write_output<W: Write>(&self, writer: &mut W, rows: &[ProbeRow]) -> Result<()> {
        let output = match self.format {
            ReportFormat::Text => self.format_text(rows),
            ReportFormat::Json => self.format_json(rows)?,
            ReportFormat::Csv => self.format_csv(rows)?,
        };
        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    /// Formats rows into one line per file, in input order.
    fn format_text(&self, rows: &[ProbeRow]) -> String {
        let mut output = String::new();

        for row in rows {
            if let Some(error) = &row.error {
                output.push_str(&format!("{}  ERROR: {}\n", row.path.display(), error));
                continue;
            }
            // Failure rows aside, detection is always present.
            let Some(detection) = &row.detection else {
                continue;
            };
            output.push_str(&format!(
                "{}  {} (cp{})  {}  {}  [{}]{}\n",
                row.path.display(),
                detection.descriptor.name,
                detection.descriptor.code_page,
                if detection.bom_exists { "BOM" } else { "no BOM" },
                row.line_ending.map_or("-", |style| style.as_str()),
                detection.origin.as_str(),
                if row.matched { "  matched" } else { "" },
            ));
        }

        output
    }

    /// Formats rows into a structured JSON document.
    fn format_json(&self, rows: &[ProbeRow]) -> Result<String> {
        #[derive(Serialize)]
        struct JsonOutput {
            tool: ToolInfo,
            generated: DateTime<Utc>,
            total_files: usize,
            matched_files: usize,
            files: Vec<JsonRow>,
        }

        #[derive(Serialize)]
        struct ToolInfo {
            name: String,
            version: String,
        }

        #[derive(Serialize)]
        struct JsonRow {
            file: String,
            encoding: Option<String>,
            code_page: Option<u32>,
            bom: Option<bool>,
            origin: Option<String>,
            line_ending: Option<String>,
            matched: bool,
            error: Option<String>,
        }

        let json_rows: Vec<JsonRow> = rows
            .iter()
            .map(|row| JsonRow {
                file: row.path.display().to_string(),
                encoding: row.detection.map(|d| d.descriptor.name.to_string()),
                code_page: row.detection.map(|d| d.descriptor.code_page),
                bom: row.detection.map(|d| d.bom_exists),
                origin: row.detection.map(|d| d.origin.as_str().to_string()),
                line_ending: row.line_ending.map(|style| style.as_str().to_string()),
                matched: row.matched,
                error: row.error.clone(),
            })
            .collect();

        let output = JsonOutput {
            tool: ToolInfo {
                name: self.tool_name.clone(),
                version: self.tool_version.clone(),
            },
            generated: Utc::now(),
            total_files: rows.len(),
            matched_files: rows.iter().filter(|row| row.matched).count(),
            files: json_rows,
        };

        Ok(serde_json::to_string_pretty(&output)?)
    }

    /// Formats rows into a CSV table.
    fn format_csv(&self, rows: &[ProbeRow]) -> Result<String> {
        use csv::Writer;

        let mut wtr = Writer::from_writer(vec![]);

        wtr.write_record([
            "File",
            "Encoding",
            "CodePage",
            "BOM",
            "Origin",
            "LineEnding",
            "Matched",
            "Error",
        ])?;

        for row in rows {
            wtr.write_record([
                row.path.display().to_string(),
                row.detection
                    .map(|d| d.descriptor.name.to_string())
                    .unwrap_or_default(),
                row.detection
                    .map(|d| d.descriptor.code_page.to_string())
                    .unwrap_or_default(),
                row.detection
                    .map(|d| d.bom_exists.to_string())
                    .unwrap_or_default(),
                row.detection
                    .map(|d| d.origin.as_str().to_string())
                    .unwrap_or_default(),
                row.line_ending
                    .map(|style| style.as_str().to_string())
                    .unwrap_or_default(),
                row.matched.to_string(),
                row.error.clone().unwrap_or_default(),
            ])?;
        }

        let data = wtr
            .into_inner()
            .map_err(|e| format!("CSV writer error: {e}"))?;
        Ok(String::from_utf8(data).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::{self, DetectionMode};
    use crate::newline::LineEndingStyle;
    use std::path::PathBuf;

    fn create_test_rows() -> Vec<ProbeRow> {
        let detection = detect::resolve(b"plain text", None, DetectionMode::Normal);
        vec![
            ProbeRow {
                path: PathBuf::from("docs/readme.txt"),
                detection: Some(detection),
                line_ending: Some(LineEndingStyle::Lf),
                matched: true,
                error: None,
            },
            ProbeRow {
                path: PathBuf::from("docs/missing.txt"),
                detection: None,
                line_ending: None,
                matched: false,
                error: Some("No such file or directory".to_string()),
            },
        ]
    }

    #[test]
    fn test_text_format() {
        let formatter = ProbeReportFormatter::new(ReportFormat::Text);
        let rows = create_test_rows();

        let output = formatter.format_text(&rows);

        assert!(output.contains("docs/readme.txt"));
        assert!(output.contains("US-ASCII"));
        assert!(output.contains("matched"));
        assert!(output.contains("ERROR: No such file"));
    }

    #[test]
    fn test_json_format() {
        let formatter = ProbeReportFormatter::new(ReportFormat::Json);
        let rows = create_test_rows();

        let output = formatter.format_json(&rows).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["total_files"], 2);
        assert_eq!(parsed["matched_files"], 1);
        assert_eq!(parsed["files"][0]["encoding"], "US-ASCII");
        assert_eq!(parsed["files"][0]["code_page"], 20127);
        assert!(parsed["files"][1]["error"].is_string());
    }

    #[test]
    fn test_csv_format() {
        let formatter = ProbeReportFormatter::new(ReportFormat::Csv);
        let rows = create_test_rows();

        let output = formatter.format_csv(&rows).unwrap();

        let mut rdr = csv::Reader::from_reader(output.as_bytes());
        let headers = rdr.headers().unwrap();
        assert_eq!(headers.get(0), Some("File"));

        let records: Vec<_> = rdr
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(6), Some("true"));
    }

    #[test]
    fn test_format_dispatch_from_str() {
        assert!(matches!(ReportFormat::from("json"), ReportFormat::Json));
        assert!(matches!(ReportFormat::from("CSV"), ReportFormat::Csv));
        assert!(matches!(ReportFormat::from("anything"), ReportFormat::Text));
    }
}
