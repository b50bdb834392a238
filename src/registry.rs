// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Named search scopes.
//!
//! A [`ScopeRegistry`] stands in for the host ORM surface: it binds scope
//! names to [`ScopeOptions`] for one table, validates eagerly at
//! definition time, and compiles a scope on demand with the call-time
//! query merged in. Lookups go through a `DashMap`, so defining and
//! compiling scopes is safe from concurrent tasks without extra locking.
//!
//! # Example
//!
//! ```
//! use scoped_search::{
//!     Column, PostgresQuoting, ScopeOptions, ScopeRegistry, TableSource, Weight,
//! };
//!
//! let table = TableSource::new("posts", "id", &PostgresQuoting);
//! let registry = ScopeRegistry::new(table);
//! registry
//!     .define(
//!         "search_content",
//!         ScopeOptions::against([Column::weighted("title", Weight::A), Column::named("body")]),
//!     )
//!     .unwrap();
//!
//! let compiled = registry.compile("search_content", "hello world").unwrap();
//! assert!(compiled.predicate.contains("@@"));
//! ```

use dashmap::DashMap;
use tracing::info;

use crate::compile::{CompiledSearch, QueryCompiler};
use crate::config::{ScopeOptions, SearchStrategy};
use crate::error::SearchError;
use crate::quoting::{PostgresQuoting, SqlQuoting, TableSource};

/// Named search scopes for one table.
pub struct ScopeRegistry {
    table: TableSource,
    quoting: Box<dyn SqlQuoting + Send + Sync>,
    scopes: DashMap<String, ScopeOptions>,
}

impl ScopeRegistry {
    /// Registry with standard PostgreSQL quoting.
    pub fn new(table: TableSource) -> Self {
        Self::with_quoting(table, Box::new(PostgresQuoting))
    }

    pub fn with_quoting(table: TableSource, quoting: Box<dyn SqlQuoting + Send + Sync>) -> Self {
        Self {
            table,
            quoting,
            scopes: DashMap::new(),
        }
    }

    /// Register a named scope. Fails eagerly when the options carry no
    /// target columns, so a broken scope never waits until first use to
    /// surface.
    pub fn define(
        &self,
        name: impl Into<String>,
        options: ScopeOptions,
    ) -> Result<(), SearchError> {
        let name = name.into();
        if options.against.is_empty() {
            return Err(SearchError::Configuration(format!(
                "the search scope {name} must have target columns in its options"
            )));
        }
        info!(scope = %name, columns = options.against.len(), "defined search scope");
        self.scopes.insert(name, options);
        Ok(())
    }

    /// Compile a named scope with the call-time query.
    pub fn compile(&self, name: &str, query: &str) -> Result<CompiledSearch, SearchError> {
        self.compile_using(name, query, None)
    }

    /// Compile a named scope, optionally overriding the configured
    /// strategies for this one call.
    pub fn compile_using(
        &self,
        name: &str,
        query: &str,
        using: Option<&[SearchStrategy]>,
    ) -> Result<CompiledSearch, SearchError> {
        let options = self
            .scopes
            .get(name)
            .ok_or_else(|| SearchError::UnknownScope(name.to_string()))?
            .value()
            .clone();
        let mut config = options.resolve(query)?;
        if let Some(strategies) = using {
            config.strategies = strategies.to_vec();
        }
        QueryCompiler::new(&self.table, self.quoting.as_ref()).compile(&config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Column, Weight};

    fn registry() -> ScopeRegistry {
        ScopeRegistry::new(TableSource::new("posts", "id", &PostgresQuoting))
    }

    #[test]
    fn test_define_and_compile() {
        let registry = registry();
        registry
            .define(
                "search_content",
                ScopeOptions::against([
                    Column::weighted("title", Weight::A),
                    Column::named("body"),
                ]),
            )
            .unwrap();

        let compiled = registry.compile("search_content", "hello").unwrap();
        assert!(compiled.predicate.contains("@@"));
        assert_eq!(compiled.parameters.query, "hello");
    }

    #[test]
    fn test_unknown_scope() {
        let err = registry().compile("nope", "hello").unwrap_err();
        assert!(matches!(err, SearchError::UnknownScope(ref name) if name == "nope"));
    }

    #[test]
    fn test_define_rejects_empty_against() {
        let err = registry()
            .define("broken", ScopeOptions::against([]))
            .unwrap_err();
        assert!(matches!(err, SearchError::Configuration(_)));
    }

    #[test]
    fn test_call_time_query_wins_over_configured_default() {
        let registry = registry();
        registry
            .define(
                "pinned",
                ScopeOptions::against([Column::named("title")]).default_query("fixed"),
            )
            .unwrap();

        let compiled = registry.compile("pinned", "caller").unwrap();
        assert_eq!(compiled.parameters.query, "caller");
        let compiled = registry.compile("pinned", "").unwrap();
        assert_eq!(compiled.parameters.query, "fixed");
    }

    #[test]
    fn test_strategy_override_per_call() {
        let registry = registry();
        registry
            .define("basic", ScopeOptions::against([Column::named("title")]))
            .unwrap();

        let compiled = registry
            .compile_using("basic", "hello", Some(&[SearchStrategy::Trigram]))
            .unwrap();
        assert!(compiled.predicate.contains("%"));
        assert!(!compiled.predicate.contains("@@"));
    }

    #[test]
    fn test_redefining_replaces_options() {
        let registry = registry();
        registry
            .define("s", ScopeOptions::against([Column::named("title")]))
            .unwrap();
        registry
            .define("s", ScopeOptions::against([Column::named("body")]))
            .unwrap();

        let compiled = registry.compile("s", "hello").unwrap();
        assert!(compiled.document.contains("\"body\""));
        assert!(!compiled.document.contains("\"title\""));
    }
}
