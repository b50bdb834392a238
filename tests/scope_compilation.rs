//! End-to-end scope compilation through the public API.
//!
//! The unit tests next to the compiler assert individual fragments; these
//! exercise the full path a host application takes: deserialize options,
//! register a named scope, compile with a call-time query, and check the
//! complete statement pieces fit together.

use scoped_search::{
    Column, Normalization, PostgresQuoting, ScopeOptions, ScopeRegistry, SearchError,
    SearchStrategy, TableSource, Weight,
};

fn posts_registry() -> ScopeRegistry {
    ScopeRegistry::new(TableSource::new("posts", "id", &PostgresQuoting))
}

#[test]
fn full_statement_pieces_fit_together() {
    let registry = posts_registry();
    registry
        .define(
            "search_content",
            ScopeOptions::against([Column::weighted("title", Weight::A), Column::named("body")])
                .using([SearchStrategy::Tsearch, SearchStrategy::Trigram])
                .with_dictionary("english"),
        )
        .unwrap();

    let compiled = registry.compile("search_content", "hello world").unwrap();

    let statement = format!(
        "SELECT {} FROM \"posts\" WHERE {} ORDER BY {}",
        compiled.select_clause, compiled.predicate, compiled.order_clause
    );

    assert!(statement.starts_with("SELECT \"posts\".*, (ts_rank(("));
    assert!(statement.contains(") OR (("));
    assert!(statement.contains("% :query"));
    assert!(statement.ends_with("ORDER BY rank DESC, \"posts\".\"id\" ASC"));
    assert_eq!(
        compiled.parameters.named(),
        [("query", "hello world"), ("dictionary", "english")]
    );
}

#[test]
fn options_declared_as_data() {
    // The same declaration a host would load from a config file.
    let options: ScopeOptions = serde_json::from_str(
        r#"{
            "against": [{"title": "A"}, "body"],
            "using": ["tsearch"],
            "normalizing": ["prefixes"]
        }"#,
    )
    .unwrap();

    let registry = posts_registry();
    registry.define("from_config", options).unwrap();

    let compiled = registry.compile("from_config", "run").unwrap();
    assert_eq!(compiled.tsquery, "to_tsquery('''run'':*')");
}

#[test]
fn misconfigured_scope_fails_before_first_use() {
    let registry = posts_registry();
    let err = registry
        .define("broken", ScopeOptions::against([]))
        .unwrap_err();
    assert!(matches!(err, SearchError::Configuration(_)));
}

#[test]
fn accent_folding_is_symmetric_through_the_registry() {
    let registry = posts_registry();
    registry
        .define(
            "accented",
            ScopeOptions::against([Column::named("title")])
                .normalizing([Normalization::Diacritics]),
        )
        .unwrap();

    let compiled = registry.compile("accented", "café").unwrap();
    assert!(compiled.tsdocument.contains("unaccent(coalesce("));
    assert!(compiled.tsquery.contains("unaccent('"));
}

#[test]
fn registry_is_shareable_across_threads() {
    let registry = std::sync::Arc::new(posts_registry());
    registry
        .define("shared", ScopeOptions::against([Column::named("title")]))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = registry.clone();
            std::thread::spawn(move || {
                let compiled = registry.compile("shared", &format!("term{i}")).unwrap();
                assert!(compiled.predicate.contains("@@"));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
