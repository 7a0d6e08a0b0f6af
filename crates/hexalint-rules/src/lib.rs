//! # hexalint-rules
//!
//! Architectural knowledge base for hexalint: the classification engine
//! that assigns a [`hexalint_core::Passport`] to each module, and the rule
//! engine that validates import edges against the access-policy matrix.
//!
//! Both engines are pure: they read static, compile-once pattern tables and
//! the nodes handed to them, and share no mutable state, so the scan
//! pipeline runs them freely in parallel.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod access;
mod classify;

pub use access::RuleEngine;
pub use classify::Classifier;
