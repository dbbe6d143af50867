//! Validated request objects for the two operations, plus loaders for the
//! YAML replacement-table and plain file-list formats.

use crate::codec::EncodingDescriptor;
use crate::detect::DetectionMode;
use crate::errors::Result;
use crate::writer::BomPolicy;
use ignore::WalkBuilder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// One ordered find/replace pair. `find` must be non-empty; an empty
/// `replace` deletes every occurrence of `find`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplacePair {
    pub find: String,
    #[serde(default)]
    pub replace: String,
}

/// Table file format:
///
/// ```yaml
/// pairs:
///   - find: "TODO"
///     replace: "DONE"
///   - find: "obsolete"
///     replace: ""
/// ```
#[derive(Deserialize)]
struct TableFile {
    pairs: Vec<ReplacePair>,
}

/// A validated probe invocation.
#[derive(Debug)]
pub struct ProbeRequest {
    /// Files in input order; duplicates are processed once per occurrence.
    pub files: Vec<PathBuf>,
    /// Ordered, distinct, non-empty search terms. OR semantics: any one
    /// match marks the file.
    pub terms: Vec<String>,
    /// Destination of the match list; created even when no file matches.
    pub output: PathBuf,
    /// Explicit read encoding; bypasses detection when set.
    pub read_encoding: Option<&'static EncodingDescriptor>,
    pub detection: DetectionMode,
}

impl ProbeRequest {
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err("No input files given".into());
        }
        if self.terms.is_empty() {
            return Err("At least one search term is required".into());
        }
        Ok(())
    }
}

/// A validated replace invocation.
///
/// An empty table is valid: the run still performs encoding and line-ending
/// normalization on every file.
#[derive(Debug)]
pub struct ReplaceRequest {
    pub files: Vec<PathBuf>,
    pub table: Vec<ReplacePair>,
    pub read_encoding: Option<&'static EncodingDescriptor>,
    pub write_encoding: &'static EncodingDescriptor,
    pub bom_policy: BomPolicy,
    /// Target terminator; `None` preserves each file's original mixture.
    pub newline: Option<&'static str>,
    pub detection: DetectionMode,
}

impl ReplaceRequest {
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err("No input files given".into());
        }
        if self.table.iter().any(|pair| pair.find.is_empty()) {
            return Err("Replacement find strings must be non-empty".into());
        }
        Ok(())
    }
}

/// Loads an ordered replacement table from a YAML file.
pub fn load_table(path: &Path) -> Result<Vec<ReplacePair>> {
    let file = fs::File::open(path)?;
    let table: TableFile = serde_yaml::from_reader(file)?;
    Ok(table.pairs)
}

/// Loads a file-name list: one path per line, blank lines and `#` comments
/// skipped.
pub fn load_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}

/// Expands directory arguments into their files, in walk order, keeping
/// plain paths as given.
///
/// Missing paths are kept in the list; they surface later as per-file
/// failures rather than aborting the batch up front.
pub fn collect_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            for entry in WalkBuilder::new(input).build() {
                let entry = entry?;
                let path = entry.path();
                if path.is_file() {
                    files.push(path.to_path_buf());
                }
            }
        } else {
            files.push(input.clone());
        }
    }
    Ok(files)
}

/// Checks terms for emptiness and drops duplicates, preserving first-seen
/// order.
pub fn normalize_terms(terms: Vec<String>) -> Result<Vec<String>> {
    if terms.is_empty() {
        return Err("At least one search term is required".into());
    }
    let mut seen: Vec<String> = Vec::with_capacity(terms.len());
    for term in terms {
        if term.is_empty() {
            return Err("Search terms must be non-empty".into());
        }
        if !seen.contains(&term) {
            seen.push(term);
        }
    }
    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{self, TextEncoding};
    use tempfile::TempDir;

    #[test]
    fn test_load_table_preserves_pair_order() {
        let temp_dir = TempDir::new().unwrap();
        let table_path = temp_dir.path().join("table.yaml");
        fs::write(
            &table_path,
            "pairs:\n  - find: \"a\"\n    replace: \"b\"\n  - find: \"b\"\n    replace: \"c\"\n",
        )
        .unwrap();

        let table = load_table(&table_path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].find, "a");
        assert_eq!(table[1].find, "b");
    }

    #[test]
    fn test_load_table_defaults_missing_replace_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let table_path = temp_dir.path().join("table.yaml");
        fs::write(&table_path, "pairs:\n  - find: \"drop me\"\n").unwrap();

        let table = load_table(&table_path).unwrap();
        assert_eq!(table[0].replace, "");
    }

    #[test]
    fn test_load_file_list_skips_blanks_and_comments() {
        let temp_dir = TempDir::new().unwrap();
        let list_path = temp_dir.path().join("files.txt");
        fs::write(&list_path, "a.txt\n\n# comment\nb.txt\n").unwrap();

        let files = load_file_list(&list_path).unwrap();
        assert_eq!(files, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    }

    #[test]
    fn test_normalize_terms_dedups_preserving_order() {
        let terms = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(normalize_terms(terms).unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn test_normalize_terms_rejects_empty_input() {
        assert!(normalize_terms(vec![]).is_err());
        assert!(normalize_terms(vec!["ok".into(), "".into()]).is_err());
    }

    #[test]
    fn test_collect_files_expands_directories_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let sub = temp_dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("inner.txt"), "x").unwrap();
        let direct = temp_dir.path().join("direct.txt");
        fs::write(&direct, "y").unwrap();

        let files = collect_files(&[direct.clone(), sub]).unwrap();
        assert_eq!(files[0], direct);
        assert_eq!(files.len(), 2);
        assert!(files[1].ends_with("inner.txt"));
    }

    #[test]
    fn test_replace_request_rejects_empty_find() {
        let request = ReplaceRequest {
            files: vec![PathBuf::from("a.txt")],
            table: vec![ReplacePair {
                find: String::new(),
                replace: "x".into(),
            }],
            read_encoding: None,
            write_encoding: codec::descriptor(TextEncoding::Utf8),
            bom_policy: BomPolicy::Preserve,
            newline: None,
            detection: DetectionMode::Normal,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_replace_request_allows_empty_table() {
        let request = ReplaceRequest {
            files: vec![PathBuf::from("a.txt")],
            table: vec![],
            read_encoding: None,
            write_encoding: codec::descriptor(TextEncoding::Utf8),
            bom_policy: BomPolicy::Preserve,
            newline: None,
            detection: DetectionMode::Normal,
        };
        assert!(request.validate().is_ok());
    }
}
