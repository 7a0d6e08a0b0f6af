//! # hexalint-core
//!
//! Core model for hexagonal-architecture conformance linting.
//!
//! This crate owns the data the whole pipeline flows through:
//!
//! - [`Passport`] — the architectural classification of one module
//! - [`ModuleNode`] / [`DependencyGraph`] — modules, lifecycle, resolved edges
//! - [`Violation`] / [`ScanReport`] — rule-engine output and scan summary
//! - [`ScanOptions`] — per-scan configuration, loaded from TOML
//!
//! It contains no I/O beyond loading options; scanning and rule evaluation
//! live in `hexalint-scan` and `hexalint-rules`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod graph;
mod options;
mod passport;
mod report;

pub use graph::{DependencyGraph, LifecycleError, ModuleNode, NodeStatus, RawImport};
pub use options::{OptionsError, ScanOptions};
pub use passport::{
    AdapterComponent, AppComponent, ComponentType, CompositionComponent, Direction,
    DomainComponent, GlobalComponent, Layer, MatchMethod, Passport, PortComponent, Scope,
};
pub use report::{ScanReport, Severity, Violation, ViolationDiagnostic};
