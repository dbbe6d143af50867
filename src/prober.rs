//! Per-file probing: BOM, encoding, line endings, and search-term matching.
//!
//! Files may be probed on parallel workers, but the report is assembled in
//! input order regardless of completion order; ordering is part of the
//! observable contract, not an implementation detail.

use crate::codec::{self, EncodingDescriptor};
use crate::config::{self, ProbeRequest};
use crate::detect::{self, DetectionMode, DetectionResult};
use crate::errors::Result;
use crate::newline::{self, LineEndingStyle};
use crate::report::{ProbeReportFormatter, ReportFormat};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One row of the probe report.
///
/// Unreadable or undecodable files keep their position in the report with
/// `error` set instead of aborting the batch.
#[derive(Debug, Clone)]
pub struct ProbeRow {
    pub path: PathBuf,
    /// `None` when the file could not even be read.
    pub detection: Option<DetectionResult>,
    /// `None` when the file could not be decoded.
    pub line_ending: Option<LineEndingStyle>,
    /// `true` when at least one search term occurs in the decoded text.
    pub matched: bool,
    pub error: Option<String>,
}

/// The engine for the probe operation.
///
/// Holds the search terms and read policy; owns no per-file state.
pub struct Prober {
    terms: Vec<String>,
    read_encoding: Option<&'static EncodingDescriptor>,
    detection: DetectionMode,
}

impl Prober {
    pub fn new(
        terms: Vec<String>,
        read_encoding: Option<&'static EncodingDescriptor>,
        detection: DetectionMode,
    ) -> Self {
        Self {
            terms,
            read_encoding,
            detection,
        }
    }

    /// Probes a single file: read, classify, decode, analyze, match.
    ///
    /// Terms are OR-ed: any single exact, case-sensitive substring match
    /// marks the file. I/O and decode failures become failure rows.
    pub fn probe_file(&self, path: &Path) -> ProbeRow {
        let raw = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return ProbeRow {
                    path: path.to_path_buf(),
                    detection: None,
                    line_ending: None,
                    matched: false,
                    error: Some(e.to_string()),
                };
            }
        };

        let detection = detect::resolve(&raw, self.read_encoding, self.detection);
        let Some(text) = detect::decode_with(&detection, &raw) else {
            return ProbeRow {
                path: path.to_path_buf(),
                detection: Some(detection),
                line_ending: None,
                matched: false,
                error: Some(format!(
                    "invalid byte sequence for {}",
                    detection.descriptor.name
                )),
            };
        };

        ProbeRow {
            path: path.to_path_buf(),
            detection: Some(detection),
            line_ending: Some(newline::analyze(&text)),
            matched: self.terms.iter().any(|term| text.contains(term.as_str())),
            error: None,
        }
    }

    /// Probes all files on a Rayon pool and returns rows in input order.
    pub fn probe_all(
        &self,
        files: &[PathBuf],
        workers: Option<usize>,
        quiet: bool,
    ) -> Result<Vec<ProbeRow>> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.unwrap_or_else(num_cpus::get))
            .build()?;

        let pb = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                    .unwrap()
                    .progress_chars("##-"),
            );
            pb
        };

        // par_iter().map() keeps item order, so the report comes back in
        // input order no matter which worker finished first.
        let rows: Vec<ProbeRow> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    pb.inc(1);
                    self.probe_file(path)
                })
                .collect()
        });

        pb.finish_and_clear();
        Ok(rows)
    }
}

/// Writes the match list: one path per line, input order, UTF-8.
///
/// The file is created even when no row matched. Returns the match count.
pub fn write_match_list(rows: &[ProbeRow], output: &Path) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(output)?);
    let mut count = 0;
    for row in rows.iter().filter(|row| row.matched) {
        writeln!(writer, "{}", row.path.display())?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// The main entry point for the `probe` command.
pub fn run_probe(
    terms: Vec<String>,
    output: PathBuf,
    read_encoding: Option<String>,
    detection: DetectionMode,
    format: String,
    report: Option<PathBuf>,
    files_from: Option<PathBuf>,
    inputs: Vec<PathBuf>,
    workers: Option<usize>,
    quiet: bool,
) -> Result<()> {
    let read_encoding = read_encoding.as_deref().map(codec::resolve).transpose()?;
    let terms = config::normalize_terms(terms)?;

    let mut paths = inputs;
    if let Some(list) = files_from {
        paths.extend(config::load_file_list(&list)?);
    }

    let request = ProbeRequest {
        files: config::collect_files(&paths)?,
        terms,
        output,
        read_encoding,
        detection,
    };
    request.validate()?;

    let prober = Prober::new(
        request.terms.clone(),
        request.read_encoding,
        request.detection,
    );
    let rows = prober.probe_all(&request.files, workers, quiet)?;

    let matched = write_match_list(&rows, &request.output)?;

    let formatter = ProbeReportFormatter::new(ReportFormat::from(format.as_str()));
    let mut writer: Box<dyn Write> = match report {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    };
    formatter.write_output(&mut writer, &rows)?;
    writer.flush()?;

    let failures = rows.iter().filter(|row| row.error.is_some()).count();
    println!();
    println!(
        "Search complete. {} of {} file(s) matched.",
        matched,
        rows.len()
    );
    if failures > 0 {
        eprintln!("{failures} file(s) could not be probed.");
    }

    Ok(())
}
