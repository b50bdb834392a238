// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search compilation.
//!
//! ```text
//! SearchConfiguration
//!     ↓
//! QueryCompiler ── SqlExpr fragments ── render(SqlQuoting)
//!     ↓
//! CompiledSearch { predicate, rank, select, order, params }
//! ```
//!
//! [`fragment`] holds the expression tree the compiler assembles;
//! [`compiler`] holds the compilation steps themselves.

mod compiler;
mod fragment;

pub use compiler::{BoundParams, CompiledSearch, QueryCompiler};
pub use fragment::SqlExpr;
