//! `mfr` is a library for probing and rewriting text files whose character
//! encoding, byte-order-mark state, and line-ending convention are unknown
//! or heterogeneous.
//!
//! It provides the core logic for the `mfr` command-line tool but can also be
//! used as a standalone library. The main components are:
//!
//! - `bom`: Byte order mark detection over a buffer's leading bytes.
//! - `codec`: The enumerable table of supported encodings with strict
//!   decode/encode routines.
//! - `detect`: Encoding classification from an explicit choice, a BOM,
//!   byte-level heuristics, or a fallback.
//! - `Prober`: Per-file probing (encoding, BOM, line endings) plus
//!   search-term matching with an ordered match-list report.
//! - `Replacer`: Ordered literal find-and-replace with encoding-aware
//!   transcoding and atomic writes.
//!
//! Files are processed in input order; independent files may be probed on
//! parallel Rayon workers, with reports assembled in the original order.

pub mod bom;
pub mod cli;
pub mod codec;
pub mod config;
pub mod detect;
pub mod errors;
pub mod newline;
pub mod prober;
pub mod replacer;
pub mod report;
pub mod writer;

// Re-export main types for easier access by library users.
pub use errors::{Error, Result};
pub use detect::{DetectionMode, DetectionOrigin, DetectionResult};
pub use newline::LineEndingStyle;
pub use prober::Prober;
pub use replacer::Replacer;
pub use report::{ProbeReportFormatter, ReportFormat};
pub use writer::BomPolicy;
