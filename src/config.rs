// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Scope configuration.
//!
//! [`ScopeOptions`] is what a caller declares once per named scope:
//! the target columns (`against`), the matching strategies (`using`),
//! normalization transforms, and an optional dictionary. It deserializes
//! from plain data (so scopes can live in config files) and rejects
//! unknown keys outright.
//!
//! [`SearchConfiguration`] is the resolved, validated, per-compile form:
//! options merged with the call-time query. The compiler only ever sees
//! this type.
//!
//! # Example
//!
//! ```
//! use scoped_search::{Column, ScopeOptions, SearchStrategy, Weight};
//!
//! let options = ScopeOptions::against([
//!     Column::weighted("title", Weight::A),
//!     Column::named("body"),
//! ])
//! .using([SearchStrategy::Tsearch, SearchStrategy::Trigram]);
//!
//! let config = options.resolve("hello world").unwrap();
//! assert_eq!(config.columns.len(), 2);
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Relative importance label attached to a column. Influences rank,
/// not matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weight {
    A,
    B,
    C,
    D,
}

impl Weight {
    pub fn as_str(self) -> &'static str {
        match self {
            Weight::A => "A",
            Weight::B => "B",
            Weight::C => "C",
            Weight::D => "D",
        }
    }
}

/// Matching technique. Enabled strategies are OR-ed together in the
/// compiled predicate, always in the order tsearch, trigram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategy {
    /// Token-vector full-text matching (`to_tsvector @@ to_tsquery`).
    Tsearch,
    /// Trigram similarity matching (`%` from pg_trgm).
    Trigram,
}

impl FromStr for SearchStrategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tsearch" => Ok(SearchStrategy::Tsearch),
            "trigram" => Ok(SearchStrategy::Trigram),
            other => Err(SearchError::UnsupportedStrategy(other.to_string())),
        }
    }
}

/// Text normalization transform applied during compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    /// Accent-fold every text expression on both sides (`unaccent(...)`).
    Diacritics,
    /// Append the `:*` prefix-match marker to each query term
    /// (tsearch strategy only).
    Prefixes,
}

/// Wire form of a column spec: either a bare name or a single-entry
/// `{column: weight}` map.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnSpec {
    Bare(String),
    Weighted(BTreeMap<String, Weight>),
}

/// A search target column, optionally weighted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ColumnSpec")]
pub struct Column {
    pub name: String,
    pub weight: Option<Weight>,
}

impl Column {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: None,
        }
    }

    pub fn weighted(name: impl Into<String>, weight: Weight) -> Self {
        Self {
            name: name.into(),
            weight: Some(weight),
        }
    }
}

impl TryFrom<ColumnSpec> for Column {
    type Error = String;

    fn try_from(spec: ColumnSpec) -> Result<Self, Self::Error> {
        match spec {
            ColumnSpec::Bare(name) => Ok(Column::named(name)),
            ColumnSpec::Weighted(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "weighted column spec must have exactly one column, got {}",
                        map.len()
                    ));
                }
                let (name, weight) = map.into_iter().next().unwrap();
                Ok(Column::weighted(name, weight))
            }
        }
    }
}

/// Declaration-time options for a named search scope.
///
/// Defaults: `using` is tsearch only, `normalizing` is empty,
/// `with_dictionary` is none. A `query`
/// given here acts as a default and is overridden by any non-empty
/// call-time query.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeOptions {
    pub against: Vec<Column>,

    #[serde(default)]
    pub query: Option<String>,

    #[serde(default = "default_using")]
    pub using: Vec<SearchStrategy>,

    #[serde(default)]
    pub normalizing: Vec<Normalization>,

    #[serde(default)]
    pub with_dictionary: Option<String>,
}

fn default_using() -> Vec<SearchStrategy> {
    vec![SearchStrategy::Tsearch]
}

impl ScopeOptions {
    /// Start from a set of target columns with all other options at their
    /// defaults.
    pub fn against(columns: impl IntoIterator<Item = Column>) -> Self {
        Self {
            against: columns.into_iter().collect(),
            query: None,
            using: default_using(),
            normalizing: Vec::new(),
            with_dictionary: None,
        }
    }

    pub fn using(mut self, strategies: impl IntoIterator<Item = SearchStrategy>) -> Self {
        self.using = strategies.into_iter().collect();
        self
    }

    pub fn normalizing(mut self, transforms: impl IntoIterator<Item = Normalization>) -> Self {
        self.normalizing = transforms.into_iter().collect();
        self
    }

    pub fn with_dictionary(mut self, dictionary: impl Into<String>) -> Self {
        self.with_dictionary = Some(dictionary.into());
        self
    }

    /// Fix a default query for the scope. Overridden by any non-empty
    /// call-time query.
    pub fn default_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Merge the call-time query and validate into a [`SearchConfiguration`].
    pub fn resolve(&self, query: &str) -> Result<SearchConfiguration, SearchError> {
        if self.against.is_empty() {
            return Err(SearchError::Configuration(
                "missing target columns".to_string(),
            ));
        }
        let query = if query.is_empty() {
            self.query.clone().unwrap_or_default()
        } else {
            query.to_string()
        };
        if query.is_empty() {
            return Err(SearchError::Configuration("missing query".to_string()));
        }
        if self.using.is_empty() {
            return Err(SearchError::Configuration(
                "no search strategies enabled".to_string(),
            ));
        }
        Ok(SearchConfiguration {
            query,
            columns: self.against.clone(),
            strategies: self.using.clone(),
            dictionary: self.with_dictionary.clone(),
            normalizing: self.normalizing.clone(),
        })
    }
}

/// Resolved, immutable input to one compile call.
#[derive(Debug, Clone)]
pub struct SearchConfiguration {
    pub query: String,
    /// Target columns in declaration order. Order is preserved in every
    /// emitted fragment.
    pub columns: Vec<Column>,
    pub strategies: Vec<SearchStrategy>,
    pub dictionary: Option<String>,
    pub normalizing: Vec<Normalization>,
}

impl SearchConfiguration {
    pub fn uses(&self, strategy: SearchStrategy) -> bool {
        self.strategies.contains(&strategy)
    }

    pub fn normalizes(&self, transform: Normalization) -> bool {
        self.normalizing.contains(&transform)
    }
}
