//! Find-and-replace over files with encoding-aware transcoding.
//!
//! Replacement is literal substring substitution, applied pair by pair in
//! table order. Each pair rewrites the *current* text, so a later pair sees
//! the output of an earlier one; callers can stage transformations
//! deterministically (first normalize a term, then translate it).

use crate::codec::{self, EncodingDescriptor};
use crate::config::{self, ReplacePair, ReplaceRequest};
use crate::detect::{self, DetectionMode};
use crate::errors::{Error, Result};
use crate::writer::{self, BomPolicy};
use rayon::prelude::*;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Core engine for rewriting files.
///
/// A `Replacer` holds the replacement table and the transcoding policy; it
/// owns no file state, so one instance serves a whole batch.
pub struct Replacer {
    table: Vec<ReplacePair>,
    read_encoding: Option<&'static EncodingDescriptor>,
    write_encoding: &'static EncodingDescriptor,
    bom_policy: BomPolicy,
    newline: Option<&'static str>,
    detection: DetectionMode,
}

/// Options for processing a file.
#[derive(Clone, Copy)]
pub struct ProcessOptions {
    /// If `true`, changes are calculated but nothing is written to disk.
    pub dry_run: bool,
}

/// The result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Total occurrences replaced across all pairs.
    pub changes: usize,
    /// `true` if any pair matched.
    pub modified: bool,
}

/// Applies every pair in `table` order to `text`.
///
/// Occurrences are located left to right and do not overlap: after a match
/// is consumed, scanning resumes past the replacement span. An empty table
/// is the identity.
pub fn apply(text: &str, table: &[ReplacePair]) -> String {
    apply_counting(text, table).0
}

/// Like [`apply`], also returning the number of occurrences replaced.
pub fn apply_counting(text: &str, table: &[ReplacePair]) -> (String, usize) {
    let mut current = Cow::Borrowed(text);
    let mut total = 0;
    for pair in table {
        let occurrences = current.matches(pair.find.as_str()).count();
        if occurrences > 0 {
            total += occurrences;
            current = Cow::Owned(current.replace(pair.find.as_str(), &pair.replace));
        }
    }
    (current.into_owned(), total)
}

impl Replacer {
    /// Creates a new `Replacer` from a validated request.
    pub fn new(request: &ReplaceRequest) -> Self {
        Self {
            table: request.table.clone(),
            read_encoding: request.read_encoding,
            write_encoding: request.write_encoding,
            bom_policy: request.bom_policy,
            newline: request.newline,
            detection: request.detection,
        }
    }

    /// Runs the full pipeline for one file: read, resolve encoding, decode,
    /// substitute, and re-encode through the transcoding writer.
    ///
    /// The file is always rewritten (unless `dry_run`), even when no pair
    /// matched: an empty or miss-only table still normalizes the encoding,
    /// BOM state, and line endings.
    pub fn process_file(&self, path: &Path, options: ProcessOptions) -> Result<ProcessResult> {
        let raw = fs::read(path)?;
        let detection = detect::resolve(&raw, self.read_encoding, self.detection);
        let text = detect::decode_with(&detection, &raw).ok_or_else(|| Error::Decode {
            path: path.to_path_buf(),
            encoding: detection.descriptor.name,
        })?;

        let (new_text, changes) = apply_counting(&text, &self.table);

        if !options.dry_run {
            writer::write_transcoded(
                path,
                &new_text,
                self.write_encoding,
                self.bom_policy,
                detection.bom_exists,
                self.newline,
            )?;
        }

        Ok(ProcessResult {
            changes,
            modified: changes > 0,
        })
    }
}

/// The main entry point for the `replace` command.
///
/// Builds the request from the command-line pieces, collects the file list,
/// and processes the files on a Rayon pool. Per-file failures are reported
/// and counted; only configuration errors abort the run.
pub fn run_replace(
    find: Option<String>,
    replace: Option<String>,
    table_path: Option<PathBuf>,
    read_encoding: Option<String>,
    write_encoding: String,
    bom_policy: BomPolicy,
    newline: Option<&'static str>,
    detection: DetectionMode,
    files_from: Option<PathBuf>,
    inputs: Vec<PathBuf>,
    dry_run: bool,
    verbose: bool,
    workers: Option<usize>,
) -> Result<()> {
    // Encoding names are resolved before any file is touched; an unknown
    // name is fatal for the whole invocation.
    let read_encoding = read_encoding.as_deref().map(codec::resolve).transpose()?;
    let write_encoding = codec::resolve(&write_encoding)?;

    let table = if let Some(path) = table_path {
        config::load_table(&path)?
    } else if let Some(find) = find {
        vec![ReplacePair {
            find,
            replace: replace.unwrap_or_default(),
        }]
    } else {
        // Valid: a pure normalization pass over encoding/BOM/newlines.
        Vec::new()
    };

    let mut paths = inputs;
    if let Some(list) = files_from {
        paths.extend(config::load_file_list(&list)?);
    }

    let request = ReplaceRequest {
        files: config::collect_files(&paths)?,
        table,
        read_encoding,
        write_encoding,
        bom_policy,
        newline,
        detection,
    };
    request.validate()?;

    let replacer = Arc::new(Replacer::new(&request));

    let processed = AtomicUsize::new(0);
    let modified = AtomicUsize::new(0);
    let total_changes = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.unwrap_or_else(num_cpus::get))
        .build()?;

    let options = ProcessOptions { dry_run };
    let log_changes = verbose || dry_run;

    pool.install(|| {
        request.files.par_iter().for_each(|path| {
            match replacer.process_file(path, options) {
                Ok(result) => {
                    processed.fetch_add(1, Ordering::Relaxed);
                    if result.modified {
                        modified.fetch_add(1, Ordering::Relaxed);
                        total_changes.fetch_add(result.changes, Ordering::Relaxed);
                        if log_changes {
                            if dry_run {
                                println!(
                                    "DRY Modified {} ({} changes)",
                                    path.display(),
                                    result.changes
                                );
                            } else {
                                println!("Modified {} ({} changes)", path.display(), result.changes);
                            }
                        }
                    }
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    eprintln!("Error processing file {}: {}", path.display(), e);
                }
            }
        });
    });

    println!("\n{}", "-".repeat(50));
    println!("Files processed : {}", processed.load(Ordering::Relaxed));
    println!("Files changed   : {}", modified.load(Ordering::Relaxed));
    println!("Total edits     : {}", total_changes.load(Ordering::Relaxed));
    if failed.load(Ordering::Relaxed) > 0 {
        println!("Files failed    : {}", failed.load(Ordering::Relaxed));
    }
    println!("\nProcessing complete.");

    Ok(())
}
