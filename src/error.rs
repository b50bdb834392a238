// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for scope definition and compilation.
//!
//! Every failure here is a programming or configuration bug: it is raised
//! synchronously, never retried, and never produces a partial result.
//! Transient failures (bad dictionary, unknown column) belong to whatever
//! executes the compiled SQL, not to this crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    /// Structurally invalid scope configuration (missing columns, missing
    /// query, empty strategy list).
    #[error("invalid search configuration: {0}")]
    Configuration(String),

    /// A strategy key outside the known set (`tsearch`, `trigram`).
    #[error("unsupported search strategy: {0}")]
    UnsupportedStrategy(String),

    /// Compile was requested for a scope name never registered.
    #[error("no search scope named '{0}'")]
    UnknownScope(String),
}
