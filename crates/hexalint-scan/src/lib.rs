//! # hexalint-scan
//!
//! Scanning front half of hexalint: walks a Python source tree, extracts
//! import statements with Tree-sitter, resolves them (including symbol
//! re-export chains) into concrete module edges, and orchestrates the
//! four-phase scan pipeline:
//!
//! 1. ingest + extract (parallel per file)
//! 2. link imports against the complete registry
//! 3. classify every node (via `hexalint-rules`)
//! 4. validate every edge
//!
//! Per-file problems degrade to report counters; a scan never fails
//! because of one bad file.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extract;
mod ingest;
mod module_path;
mod pipeline;
mod reexport;

pub use extract::{ParseError, PythonExtractor};
pub use ingest::{FileContents, IngestOutcome, SourceFile, SourceIngestor};
pub use module_path::{dotted_prefix, physical_to_logical};
pub use pipeline::{ScanError, ScanOutcome, ScanPipeline};
pub use reexport::{ReexportResolver, ResolveCache};
