//! This crate is part of `rdfc`,
//! an implementation of [RDF dataset canonicalization] (RDFC-1.0) in Rust.
//!
//! It provides the canonicalization engine itself:
//! see [`rdfc10::normalize`] and [`rdfc10::relabel`].
//!
//! Canonicalization of a dataset with pathological blank node symmetry
//! can require factorial work;
//! every run is therefore bounded by a wall-clock [deadline](deadline::Deadline),
//! and exceeding it aborts the run with [`C14nError::DeadlineExceeded`].
//!
//! [RDF dataset canonicalization]: https://www.w3.org/TR/rdf-canon/

#![deny(missing_docs)]

mod _permutations;

pub mod deadline;
pub mod hash;
pub mod issuer;
pub mod rdfc10;

use thiserror::Error;

/// Canonicalization error.
#[derive(Debug, Error)]
pub enum C14nError {
    /// The wall-clock budget of the run was exhausted.
    ///
    /// This is the only cancellation mechanism:
    /// there is no partial canonical output.
    #[error("deadline exceeded (budget was {budget_ms}ms)")]
    DeadlineExceeded {
        /// The budget that was exhausted, in milliseconds.
        budget_ms: i64,
    },
    /// A negative deadline budget was supplied.
    #[error("invalid deadline budget: {0}ms")]
    InvalidDeadline(i64),
    /// An IO error occurred while writing the normalized form.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
fn test_setup() {
    TEST_SETUP.call_once(|| {
        env_logger::init();
    });
}

#[cfg(test)]
static TEST_SETUP: std::sync::Once = std::sync::Once::new();
