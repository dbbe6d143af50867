use crate::detect::DetectionMode;
use crate::writer::BomPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// A multi-file encoding probe and rewrite tool.
///
/// `mfr` inspects text files whose encoding, BOM state, and line-ending
/// convention are unknown or mixed, and rewrites them with literal
/// find/replace tables, uniform line endings, and an explicit target
/// encoding and BOM policy.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Probe and rewrite text files across encodings, BOMs, and line endings",
    long_about = "mfr - probe and rewrite text files across encodings, BOMs, and line endings.

Handles files with:
  • BOM-tagged and BOM-less Unicode (UTF-8, UTF-16, UTF-32)
  • Legacy double-byte East-Asian encodings (Shift_JIS, EUC-JP, EUC-KR, GB18030)
  • Mixed CRLF / LF / CR line endings

QUICK EXAMPLES:
  mfr probe -t TODO -o hits.txt docs/          # Which files mention TODO?
  mfr replace -p TODO -r DONE -w utf-8 a.txt   # Literal replace, re-encode UTF-8
  mfr replace -w utf-8 --bom remove -n lf src/ # Pure normalization pass
  mfr encodings                                # List the supported encodings

For detailed help on any command, use: mfr <command> --help"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Heuristic strictness for encoding detection of BOM-less files.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum DetectionArg {
    /// Balanced default: Shift_JIS and EUC-JP candidates.
    Normal,
    /// Trusted in-house files: Shift_JIS only, strict threshold.
    FirstParty,
    /// Files of unknown provenance: widest candidate set, loose threshold.
    ThirdParty,
}

impl From<DetectionArg> for DetectionMode {
    fn from(arg: DetectionArg) -> Self {
        match arg {
            DetectionArg::Normal => DetectionMode::Normal,
            DetectionArg::FirstParty => DetectionMode::FirstParty,
            DetectionArg::ThirdParty => DetectionMode::ThirdParty,
        }
    }
}

/// Whether rewritten files carry a BOM.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum BomArg {
    /// Write the target encoding's marker (no-op if it has none).
    Add,
    /// Never write a marker.
    Remove,
    /// Keep each source file's BOM state.
    Preserve,
}

impl From<BomArg> for BomPolicy {
    fn from(arg: BomArg) -> Self {
        match arg {
            BomArg::Add => BomPolicy::Add,
            BomArg::Remove => BomPolicy::Remove,
            BomArg::Preserve => BomPolicy::Preserve,
        }
    }
}

/// Target line-ending convention.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum NewlineArg {
    Crlf,
    Lf,
    Cr,
}

impl NewlineArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewlineArg::Crlf => "\r\n",
            NewlineArg::Lf => "\n",
            NewlineArg::Cr => "\r",
        }
    }
}

/// The set of available commands for the `mfr` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe files: encoding, BOM, line endings, and search-term matches
    ///
    /// EXAMPLES:
    ///   mfr probe -t TODO -o hits.txt docs/            # Files mentioning TODO
    ///   mfr probe -t 重要,important -o hits.txt *.txt   # Multiple terms (OR)
    ///   mfr probe -t x -o h.txt -c shift_jis legacy/   # Force the read encoding
    ///   mfr probe -t x -o h.txt -f json --report r.json docs/
    ///
    /// Each probed file is reported with its detected encoding, BOM state,
    /// and line-ending style; paths of matching files are written to the
    /// output file, one per line, in input order.
    Probe {
        /// A search term. Repeatable, or comma-separated. Any one match
        /// marks the file.
        #[arg(short = 't', long = "term", value_delimiter = ',', required = true)]
        terms: Vec<String>,

        /// Path of the match-list file. Created even when nothing matches.
        #[arg(short, long)]
        output: PathBuf,

        /// Decode every file with this encoding instead of detecting one.
        #[arg(short = 'c', long = "read-encoding")]
        read_encoding: Option<String>,

        /// Heuristic strictness for BOM-less files.
        #[arg(long, value_enum, default_value = "normal")]
        detection: DetectionArg,

        /// The report format (`text`, `json`, `csv`).
        #[arg(short = 'f', long = "format", default_value = "text")]
        format: String,

        /// Write the per-file report here instead of standard output.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Read additional input paths from a list file (one per line).
        #[arg(long = "files-from")]
        files_from: Option<PathBuf>,

        /// The number of parallel worker threads to use. Defaults to the number of logical CPU cores.
        #[arg(short = 'w', long = "workers", env = "MFR_WORKERS")]
        workers: Option<usize>,

        /// Suppress the progress bar.
        #[arg(short, long)]
        quiet: bool,

        /// The input files or directories to probe.
        inputs: Vec<PathBuf>,
    },

    /// Replace strings in files and normalize encoding, BOM, and line endings
    ///
    /// EXAMPLES:
    ///   mfr replace -p TODO -r DONE -w utf-8 notes.txt       # Single pair
    ///   mfr replace --table pairs.yaml -w utf-8 docs/        # Ordered table
    ///   mfr replace -c shift_jis -w utf-8 --bom add legacy/  # Transcode + BOM
    ///   mfr replace -w utf-8 -n lf --dry-run src/            # Preview newline fix
    ///
    /// Table file format (pairs.yaml):
    ///   pairs:
    ///     - find: "TODO"
    ///       replace: "DONE"
    ///     - find: "obsolete"
    ///       replace: ""          # empty replace deletes
    ///
    /// Pairs apply in order to the current text, so earlier replacements are
    /// visible to later pairs. An empty table is a pure normalization pass.
    Replace {
        /// A single literal string to find.
        #[arg(short = 'p', long = "find")]
        find: Option<String>,

        /// The replacement for --find. Omitted or empty deletes occurrences.
        #[arg(short = 'r', long = "replace")]
        replace: Option<String>,

        /// Path to a YAML file with an ordered replacement table.
        #[arg(long)]
        table: Option<PathBuf>,

        /// Decode every file with this encoding instead of detecting one.
        #[arg(short = 'c', long = "read-encoding")]
        read_encoding: Option<String>,

        /// The encoding files are rewritten in.
        #[arg(short = 'w', long = "write-encoding")]
        write_encoding: String,

        /// BOM handling for rewritten files.
        #[arg(long, value_enum, default_value = "preserve")]
        bom: BomArg,

        /// Rewrite every line ending to this convention. Omitted preserves
        /// each file's original mixture.
        #[arg(short = 'n', long, value_enum)]
        newline: Option<NewlineArg>,

        /// Heuristic strictness for BOM-less files.
        #[arg(long, value_enum, default_value = "normal")]
        detection: DetectionArg,

        /// Read additional input paths from a list file (one per line).
        #[arg(long = "files-from")]
        files_from: Option<PathBuf>,

        /// Preview the changes without actually modifying any files.
        #[arg(long)]
        dry_run: bool,

        /// Print each modified file (useful for audits; slower on large runs).
        #[arg(short, long)]
        verbose: bool,

        /// The number of parallel worker threads to use.
        #[arg(long = "workers", env = "MFR_WORKERS")]
        workers: Option<usize>,

        /// The input files or directories to process.
        inputs: Vec<PathBuf>,
    },

    /// List the supported encodings, code pages, and aliases
    Encodings,
}

/// Parses command-line arguments and returns the populated `Args` struct.
pub fn parse_args() -> Args {
    Args::parse()
}
