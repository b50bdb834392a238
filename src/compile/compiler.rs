// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search query compiler.
//!
//! Turns a resolved [`SearchConfiguration`] into the SQL fragments needed
//! to run a ranked search against one table: a boolean predicate, a rank
//! expression, and the select/order clauses, plus the named bind
//! parameters (`:query`, `:dictionary`) referenced by those fragments.
//!
//! Compilation is pure and synchronous. Two compiles of the same
//! configuration produce byte-identical output: columns render in
//! declaration order and strategies OR together in the fixed order
//! tsearch, trigram.
//!
//! # Fragment grammar
//!
//! ```text
//! document    coalesce(t.c1, '') || ' ' || coalesce(t.c2, '')
//! tsquery     to_tsquery('''hello''') && to_tsquery('''world''')
//! tsdocument  setweight(to_tsvector(coalesce(t.c1, '')), 'A') || to_tsvector(coalesce(t.c2, ''))
//! predicate   ((tsdocument) @@ (tsquery)) OR ((document) % :query)
//! rank        ts_rank((tsdocument), (tsquery))
//! ```
//!
//! With `diacritics` normalization every text expression on both sides is
//! wrapped in `unaccent(...)`; with a dictionary configured every
//! `to_tsvector`/`to_tsquery` call takes a leading `:dictionary` argument.

use tracing::debug;

use crate::config::{Column, Normalization, SearchConfiguration, SearchStrategy};
use crate::error::SearchError;
use crate::quoting::{SqlQuoting, TableSource};

use super::fragment::SqlExpr;

/// Named bind parameters referenced by the compiled fragments.
///
/// `dictionary` is the configured dictionary name, or the empty string
/// when none is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundParams {
    pub query: String,
    pub dictionary: String,
}

impl BoundParams {
    /// Placeholder-name → value pairs, for drivers that bind by name.
    pub fn named(&self) -> [(&'static str, &str); 2] {
        [
            ("query", self.query.as_str()),
            ("dictionary", self.dictionary.as_str()),
        ]
    }
}

/// Output of one compile call. All fields are rendered SQL text; the
/// caller combines `predicate` with its own filters via AND and executes
/// `SELECT <select_clause> FROM <table> WHERE <predicate> ORDER BY
/// <order_clause>` with [`BoundParams`] bound.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSearch {
    /// All target columns null-coalesced and space-joined, unweighted and
    /// untokenized. Used by the trigram strategy.
    pub document: String,
    /// The query terms tokenized and AND-joined. Empty string when the
    /// query split into zero terms.
    pub tsquery: String,
    /// The target columns tokenized, weighted, and concatenated.
    pub tsdocument: String,
    /// OR-join of the enabled strategies' conditions.
    pub predicate: String,
    /// `ts_rank` over the tokenized forms; the constant `0` when the
    /// query split into zero terms.
    pub rank_expression: String,
    pub select_clause: String,
    pub order_clause: String,
    pub parameters: BoundParams,
}

/// Compiles search configurations against one table.
///
/// Holds no mutable state; a single compiler can serve concurrent
/// compile calls.
pub struct QueryCompiler<'a> {
    table: &'a TableSource,
    quoting: &'a dyn SqlQuoting,
}

impl<'a> QueryCompiler<'a> {
    pub fn new(table: &'a TableSource, quoting: &'a dyn SqlQuoting) -> Self {
        Self { table, quoting }
    }

    /// Compile a resolved configuration into SQL fragments.
    ///
    /// Fails with [`SearchError::Configuration`] when the configuration
    /// is structurally invalid; never produces partial output.
    pub fn compile(&self, config: &SearchConfiguration) -> Result<CompiledSearch, SearchError> {
        if config.columns.is_empty() {
            return Err(SearchError::Configuration(
                "missing target columns".to_string(),
            ));
        }
        if config.query.is_empty() {
            return Err(SearchError::Configuration("missing query".to_string()));
        }

        let document = self.document(config);
        let tsquery = self.tsquery(config);
        let tsdocument = self.tsdocument(config);

        // Stable strategy order: tsearch before trigram, regardless of
        // the order the caller listed them in.
        let mut conditions = Vec::new();
        for strategy in [SearchStrategy::Tsearch, SearchStrategy::Trigram] {
            if !config.uses(strategy) {
                continue;
            }
            let condition = match strategy {
                SearchStrategy::Tsearch => match &tsquery {
                    Some(tsquery) => SqlExpr::infix(
                        "@@",
                        vec![tsdocument.clone().group(), tsquery.clone().group()],
                    ),
                    // Zero query terms: an empty AND-chain is not a valid
                    // tsquery, so the lexical strategy matches nothing.
                    None => SqlExpr::Verbatim("FALSE"),
                },
                SearchStrategy::Trigram => SqlExpr::infix(
                    "%",
                    vec![
                        self.normalize(config, document.clone()).group(),
                        self.normalize(config, SqlExpr::Placeholder("query")),
                    ],
                ),
            };
            conditions.push(condition.group());
        }
        if conditions.is_empty() {
            return Err(SearchError::Configuration(
                "no search strategies enabled".to_string(),
            ));
        }
        let predicate = conditions
            .iter()
            .map(|c| c.render(self.quoting))
            .collect::<Vec<_>>()
            .join(" OR ");

        // Rank always derives from the tokenized forms, even when only
        // trigram matching is enabled. Fixed behavior callers rely on;
        // see the zero-term fallback above for the degenerate case.
        let rank = match &tsquery {
            Some(tsquery) => SqlExpr::call(
                "ts_rank",
                vec![tsdocument.clone().group(), tsquery.clone().group()],
            ),
            None => SqlExpr::Verbatim("0"),
        };
        let rank_expression = rank.render(self.quoting);

        let select_clause = format!(
            "{}.*, ({})::float AS rank",
            self.table.quoted_name, rank_expression
        );
        let order_clause = format!(
            "rank DESC, {}.{} ASC",
            self.table.quoted_name,
            self.quoting.quote_identifier(&self.table.primary_key)
        );

        debug!(
            columns = config.columns.len(),
            strategies = ?config.strategies,
            dictionary = config.dictionary.as_deref().unwrap_or(""),
            "compiled search scope"
        );

        Ok(CompiledSearch {
            document: document.render(self.quoting),
            tsquery: tsquery
                .map(|q| q.render(self.quoting))
                .unwrap_or_default(),
            tsdocument: tsdocument.render(self.quoting),
            predicate,
            rank_expression,
            select_clause,
            order_clause,
            parameters: BoundParams {
                query: config.query.clone(),
                dictionary: config.dictionary.clone().unwrap_or_default(),
            },
        })
    }

    /// `coalesce(<table>.<column>, '')`
    fn coalesced(&self, column: &Column) -> SqlExpr {
        SqlExpr::call(
            "coalesce",
            vec![
                SqlExpr::column(self.table.quoted_name.clone(), column.name.clone()),
                SqlExpr::literal(""),
            ],
        )
    }

    /// All columns coalesced and space-joined, in declaration order.
    fn document(&self, config: &SearchConfiguration) -> SqlExpr {
        let mut operands = Vec::new();
        for column in &config.columns {
            if !operands.is_empty() {
                operands.push(SqlExpr::literal(" "));
            }
            operands.push(self.coalesced(column));
        }
        SqlExpr::infix("||", operands)
    }

    /// Wrap `expr` in `unaccent(...)` when diacritics folding is on.
    /// Applied uniformly to document, columns, and query terms so both
    /// sides of every comparison see the same transform.
    fn normalize(&self, config: &SearchConfiguration, expr: SqlExpr) -> SqlExpr {
        if config.normalizes(Normalization::Diacritics) {
            SqlExpr::call("unaccent", vec![expr])
        } else {
            expr
        }
    }

    /// Split the query on ASCII whitespace and tokenize each term.
    /// Returns `None` when the query splits into zero terms.
    fn tsquery(&self, config: &SearchConfiguration) -> Option<SqlExpr> {
        let terms: Vec<SqlExpr> = config
            .query
            .split(|c: char| c.is_ascii_whitespace())
            .filter(|term| !term.is_empty())
            .map(|term| self.ts_term(config, term))
            .collect();
        if terms.is_empty() {
            None
        } else {
            Some(SqlExpr::infix("&&", terms))
        }
    }

    /// One query term as `to_tsquery([:dictionary, ]'<lexeme>')`, with
    /// the `:*` prefix marker appended when prefix matching is on.
    fn ts_term(&self, config: &SearchConfiguration, term: &str) -> SqlExpr {
        let mut lexeme = format!("'{term}'");
        if config.normalizes(Normalization::Prefixes) {
            lexeme.push_str(":*");
        }
        let mut args = Vec::new();
        if config.dictionary.is_some() {
            args.push(SqlExpr::Placeholder("dictionary"));
        }
        args.push(self.normalize(config, SqlExpr::literal(lexeme)));
        SqlExpr::call("to_tsquery", args)
    }

    /// All columns tokenized (weighted where declared) and concatenated,
    /// in declaration order.
    fn tsdocument(&self, config: &SearchConfiguration) -> SqlExpr {
        let vectors = config
            .columns
            .iter()
            .map(|column| self.tsvector(config, column))
            .collect();
        SqlExpr::infix("||", vectors)
    }

    /// One column as `to_tsvector([:dictionary, ]<normalized coalesced
    /// column>)`, wrapped in `setweight(..., '<W>')` when weighted.
    fn tsvector(&self, config: &SearchConfiguration, column: &Column) -> SqlExpr {
        let mut args = Vec::new();
        if config.dictionary.is_some() {
            args.push(SqlExpr::Placeholder("dictionary"));
        }
        args.push(self.normalize(config, self.coalesced(column)));
        let tsvector = SqlExpr::call("to_tsvector", args);
        match column.weight {
            Some(weight) => SqlExpr::call(
                "setweight",
                vec![tsvector, SqlExpr::literal(weight.as_str())],
            ),
            None => tsvector,
        }
    }
}
