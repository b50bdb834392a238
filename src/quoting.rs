// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! SQL quoting capability.
//!
//! The compiler never quotes anything itself; it goes through [`SqlQuoting`],
//! injected at construction time. This keeps identifier/literal escaping in
//! one place and leaves room for a non-Postgres implementation if one is
//! ever needed.

/// Identifier and literal quoting for the target database.
pub trait SqlQuoting {
    /// Quote a column or table identifier.
    fn quote_identifier(&self, name: &str) -> String;

    /// Quote a string value as a SQL literal.
    fn quote_literal(&self, value: &str) -> String;
}

/// Standard PostgreSQL quoting: `"` around identifiers, `'` around
/// literals, embedded quote characters doubled.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresQuoting;

impl SqlQuoting for PostgresQuoting {
    fn quote_identifier(&self, name: &str) -> String {
        format!("\"{}\"", name.replace('"', "\"\""))
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\'', "''"))
    }
}

/// Identity of the table being searched.
///
/// `quoted_name` is stored already quoted (it may be schema-qualified,
/// e.g. `"public"."posts"`); `primary_key` is stored raw and quoted at
/// the point of use.
#[derive(Debug, Clone)]
pub struct TableSource {
    pub quoted_name: String,
    pub primary_key: String,
}

impl TableSource {
    /// Build from a bare table name, quoting it with the given capability.
    pub fn new(name: &str, primary_key: impl Into<String>, quoting: &dyn SqlQuoting) -> Self {
        Self {
            quoted_name: quoting.quote_identifier(name),
            primary_key: primary_key.into(),
        }
    }

    /// Build from an already-quoted (possibly schema-qualified) table name.
    pub fn pre_quoted(quoted_name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            quoted_name: quoted_name.into(),
            primary_key: primary_key.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_quoting() {
        assert_eq!(PostgresQuoting.quote_identifier("title"), "\"title\"");
    }

    #[test]
    fn test_identifier_with_embedded_quote() {
        assert_eq!(PostgresQuoting.quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_literal_quoting() {
        assert_eq!(PostgresQuoting.quote_literal("hello"), "'hello'");
    }

    #[test]
    fn test_literal_with_embedded_quote() {
        // 'cat' as a value becomes '''cat''' on the wire
        assert_eq!(PostgresQuoting.quote_literal("'cat'"), "'''cat'''");
    }

    #[test]
    fn test_table_source_quotes_name() {
        let table = TableSource::new("posts", "id", &PostgresQuoting);
        assert_eq!(table.quoted_name, "\"posts\"");
        assert_eq!(table.primary_key, "id");
    }

    #[test]
    fn test_table_source_pre_quoted() {
        let table = TableSource::pre_quoted("\"public\".\"posts\"", "id");
        assert_eq!(table.quoted_name, "\"public\".\"posts\"");
    }
}
