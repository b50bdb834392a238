// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Structured SQL fragment builder.
//!
//! The compiler assembles every fragment as a [`SqlExpr`] tree and renders
//! it in one pass. Quoting happens only inside [`SqlExpr::render`], through
//! the injected [`SqlQuoting`] capability, so user-supplied text can never
//! reach the output without passing a quoting boundary: identifiers and
//! literals are quoted at render time, free SQL text is restricted to
//! `&'static str` template constants.

use crate::quoting::SqlQuoting;

/// A SQL expression fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlExpr {
    /// Static template text (`FALSE`, `0`). The `'static` bound keeps
    /// runtime strings out of this variant.
    Verbatim(&'static str),
    /// `<table>.<column>`; the table name arrives pre-quoted, the column
    /// is quoted at render time.
    Column { table: String, column: String },
    /// A string literal, quoted at render time.
    Literal(String),
    /// A named bind placeholder, rendered as `:name`.
    Placeholder(&'static str),
    /// `function(arg, ...)`
    Call {
        function: &'static str,
        args: Vec<SqlExpr>,
    },
    /// Operands joined by ` op `. No parentheses are added; wrap operands
    /// in [`SqlExpr::group`] where grouping matters.
    Infix {
        op: &'static str,
        operands: Vec<SqlExpr>,
    },
    /// `(expr)`
    Group(Box<SqlExpr>),
}

impl SqlExpr {
    pub fn column(table: impl Into<String>, column: impl Into<String>) -> Self {
        SqlExpr::Column {
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn literal(value: impl Into<String>) -> Self {
        SqlExpr::Literal(value.into())
    }

    pub fn call(function: &'static str, args: Vec<SqlExpr>) -> Self {
        SqlExpr::Call { function, args }
    }

    pub fn infix(op: &'static str, operands: Vec<SqlExpr>) -> Self {
        SqlExpr::Infix { op, operands }
    }

    pub fn group(self) -> Self {
        SqlExpr::Group(Box::new(self))
    }

    /// Render the tree to SQL text.
    pub fn render(&self, quoting: &dyn SqlQuoting) -> String {
        match self {
            SqlExpr::Verbatim(text) => (*text).to_string(),
            SqlExpr::Column { table, column } => {
                format!("{}.{}", table, quoting.quote_identifier(column))
            }
            SqlExpr::Literal(value) => quoting.quote_literal(value),
            SqlExpr::Placeholder(name) => format!(":{name}"),
            SqlExpr::Call { function, args } => {
                let args: Vec<String> = args.iter().map(|arg| arg.render(quoting)).collect();
                format!("{}({})", function, args.join(", "))
            }
            SqlExpr::Infix { op, operands } => {
                let parts: Vec<String> = operands.iter().map(|o| o.render(quoting)).collect();
                parts.join(&format!(" {op} "))
            }
            SqlExpr::Group(inner) => format!("({})", inner.render(quoting)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quoting::PostgresQuoting;

    fn render(expr: &SqlExpr) -> String {
        expr.render(&PostgresQuoting)
    }

    #[test]
    fn test_column_render() {
        let expr = SqlExpr::column("\"posts\"", "title");
        assert_eq!(render(&expr), "\"posts\".\"title\"");
    }

    #[test]
    fn test_call_with_literal_arg() {
        let expr = SqlExpr::call(
            "coalesce",
            vec![
                SqlExpr::column("\"posts\"", "title"),
                SqlExpr::literal(""),
            ],
        );
        assert_eq!(render(&expr), "coalesce(\"posts\".\"title\", '')");
    }

    #[test]
    fn test_literal_quoting_goes_through_capability() {
        let expr = SqlExpr::literal("'cat':*");
        assert_eq!(render(&expr), "'''cat'':*'");
    }

    #[test]
    fn test_infix_join() {
        let expr = SqlExpr::infix(
            "||",
            vec![
                SqlExpr::literal("a"),
                SqlExpr::literal(" "),
                SqlExpr::literal("b"),
            ],
        );
        assert_eq!(render(&expr), "'a' || ' ' || 'b'");
    }

    #[test]
    fn test_infix_single_operand_has_no_operator() {
        let expr = SqlExpr::infix("&&", vec![SqlExpr::Verbatim("x")]);
        assert_eq!(render(&expr), "x");
    }

    #[test]
    fn test_group_and_placeholder() {
        let expr = SqlExpr::infix(
            "%",
            vec![
                SqlExpr::Verbatim("doc").group(),
                SqlExpr::Placeholder("query"),
            ],
        );
        assert_eq!(render(&expr), "(doc) % :query");
    }

    #[test]
    fn test_nested_calls() {
        let expr = SqlExpr::call(
            "setweight",
            vec![
                SqlExpr::call("to_tsvector", vec![SqlExpr::Verbatim("doc")]),
                SqlExpr::literal("A"),
            ],
        );
        assert_eq!(render(&expr), "setweight(to_tsvector(doc), 'A')");
    }
}
