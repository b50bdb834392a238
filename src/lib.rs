// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! # Scoped Search
//!
//! Compiles declarative search scopes into ranked PostgreSQL full-text
//! and trigram SQL.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ScopeRegistry                          │
//! │  • Named scopes per table (define / compile)                │
//! │  • Merges call-time query into declared options             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │              ScopeOptions → SearchConfiguration             │
//! │  • against: columns with optional A–D weights               │
//! │  • using: tsearch and/or trigram                            │
//! │  • normalizing: diacritics, prefixes                        │
//! │  • with_dictionary: tokenization ruleset                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      QueryCompiler                          │
//! │  • Assembles SqlExpr fragments, quotes via SqlQuoting       │
//! │  • Emits predicate, rank, select, order + bind params       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The crate never executes SQL. [`CompiledSearch`] hands the execution
//! layer four fragments (`select_clause`, `predicate`, `order_clause`,
//! and the named [`BoundParams`]) to splice into a full statement:
//! `SELECT <select_clause> FROM <table> WHERE <predicate> ORDER BY
//! <order_clause>`.
//!
//! ## Quick Start
//!
//! ```
//! use scoped_search::{
//!     Column, PostgresQuoting, QueryCompiler, ScopeOptions, SearchStrategy,
//!     TableSource, Weight,
//! };
//!
//! let table = TableSource::new("posts", "id", &PostgresQuoting);
//! let options = ScopeOptions::against([
//!     Column::weighted("title", Weight::A),
//!     Column::named("body"),
//! ])
//! .using([SearchStrategy::Tsearch, SearchStrategy::Trigram]);
//!
//! let config = options.resolve("rust postgres").unwrap();
//! let compiled = QueryCompiler::new(&table, &PostgresQuoting)
//!     .compile(&config)
//!     .unwrap();
//!
//! assert!(compiled.predicate.contains(" OR "));
//! assert_eq!(compiled.order_clause, "rank DESC, \"posts\".\"id\" ASC");
//! ```
//!
//! ## Guarantees
//!
//! - **Deterministic output**: columns render in declaration order,
//!   strategies OR together in a fixed order (tsearch, trigram).
//! - **Symmetric normalization**: accent folding applies to both the
//!   document and the query, never to one side only.
//! - **Structural quoting**: fragments are built as expression trees and
//!   quoted in one render pass; the query text itself only reaches the
//!   database as a bound parameter or a quoted literal.
//!
//! ## Modules
//!
//! - [`config`]: scope options and the resolved configuration
//! - [`compile`]: the query compiler and fragment builder
//! - [`quoting`]: the injected identifier/literal quoting capability
//! - [`registry`]: named scopes per table

pub mod compile;
pub mod config;
pub mod error;
pub mod quoting;
pub mod registry;

pub use compile::{BoundParams, CompiledSearch, QueryCompiler, SqlExpr};
pub use config::{
    Column, Normalization, ScopeOptions, SearchConfiguration, SearchStrategy, Weight,
};
pub use error::SearchError;
pub use quoting::{PostgresQuoting, SqlQuoting, TableSource};
pub use registry::ScopeRegistry;
