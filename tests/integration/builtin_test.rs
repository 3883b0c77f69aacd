//! Built-in catalog tests.
//!
//! Loads the embedded JQL and SQL example texts and checks lookup, listing
//! and search against them.

use pretty_assertions::assert_eq;
use querybook::catalog::{builtin_sources, BuiltinSource};
use querybook::{Catalog, Dialect, QueryFilter, Tier};

fn source(dialect: Dialect) -> &'static BuiltinSource {
    builtin_sources()
        .iter()
        .find(|s| s.dialect == dialect)
        .expect("built-in source for dialect")
}

fn load(dialect: Dialect) -> Catalog {
    Catalog::load(source(dialect).text, dialect).unwrap()
}

#[test]
fn test_both_sources_load_non_empty() {
    for dialect in Dialect::ALL {
        let catalog = load(dialect);
        assert!(!catalog.is_empty(), "{dialect} catalog is empty");
        assert!(catalog.iter().all(|e| e.dialect == dialect));
    }
}

#[test]
fn test_every_tier_is_present_in_both_sources() {
    for dialect in Dialect::ALL {
        let catalog = load(dialect);
        assert_eq!(catalog.tiers(), Tier::ALL.to_vec(), "{dialect}");
        for tier in Tier::ALL {
            assert_eq!(catalog.list_by_tier(tier).len(), 5, "{dialect} {tier}");
        }
    }
}

#[test]
fn test_list_by_tier_returns_source_blocks_verbatim() {
    for dialect in Dialect::ALL {
        let text = source(dialect).text;
        let catalog = load(dialect);
        for tier in catalog.tiers() {
            for entry in catalog.list_by_tier(tier) {
                assert!(
                    text.contains(&entry.text),
                    "{} body is not a verbatim block of the source",
                    entry.id
                );
                let title_line = text.lines().nth(entry.line - 1).unwrap();
                assert!(title_line.contains(&entry.title), "{}", entry.id);
            }
        }
    }
}

#[test]
fn test_list_by_tier_keeps_source_order() {
    let catalog = load(Dialect::Sql);
    let numbers: Vec<u32> = catalog
        .list_by_tier(Tier::Intermediate)
        .iter()
        .map(|e| e.number)
        .collect();
    assert_eq!(numbers, vec![6, 7, 8, 9, 10]);
}

#[test]
fn test_multiline_sql_body() {
    let catalog = load(Dialect::Sql);
    let entry = catalog.get("sql-2").unwrap();
    assert_eq!(entry.title, "Count defects recorded today");
    assert_eq!(entry.tier, Tier::Beginner);
    assert_eq!(
        entry.text,
        "SELECT COUNT(*) AS defects_today\nFROM defects\nWHERE detected_at >= CURRENT_DATE;"
    );
}

#[test]
fn test_multiline_jql_body() {
    let catalog = load(Dialect::Jql);
    let entry = catalog.get("jql-11").unwrap();
    assert_eq!(entry.tier, Tier::Advanced);
    assert!(entry.text.starts_with("project = MFGENG AND issuetype = Bug"));
    assert!(entry.text.ends_with("ORDER BY created DESC"));
    assert_eq!(entry.text.lines().count(), 3);
}

#[test]
fn test_search_torque_finds_torque_tool_integration() {
    let catalog = load(Dialect::Jql);
    let hits = catalog.search("torque");
    assert!(hits
        .iter()
        .any(|e| e.title.to_lowercase().contains("torque tool integration")));
    assert!(hits.iter().all(|e| e.dialect == Dialect::Jql));
}

#[test]
fn test_search_defect_finds_expected_sql_queries() {
    let catalog = load(Dialect::Sql);
    let numbers: Vec<u32> = catalog.search("defect").iter().map(|e| e.number).collect();
    for expected in [2, 7, 15] {
        assert!(numbers.contains(&expected), "missing query {expected}: {numbers:?}");
    }
}

#[test]
fn test_search_without_match_is_empty() {
    let catalog = Catalog::builtin().unwrap();
    assert!(catalog.search("kubernetes").is_empty());
}

#[test]
fn test_search_upper_case_needle() {
    let catalog = load(Dialect::Sql);
    assert_eq!(catalog.search("DEFECT"), catalog.search("defect"));
}

#[test]
fn test_builtin_ids_are_unique_and_prefixed() {
    let catalog = Catalog::builtin().unwrap();
    let mut ids: Vec<&str> = catalog.iter().map(|e| e.id.as_str()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
    assert!(catalog.get("jql-6").is_some());
    assert!(catalog.get("sql-15").is_some());
}

#[test]
fn test_filter_across_builtin_catalog() {
    let catalog = Catalog::builtin().unwrap();
    let filter = QueryFilter {
        dialect: Some(Dialect::Sql),
        tier: Some(Tier::Advanced),
        text: Some("defect".to_string()),
        limit: None,
    };
    let ids: Vec<&str> = catalog
        .filter(&filter)
        .iter()
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(ids, vec!["sql-15"]);
}

#[test]
fn test_stats_count_builtin_catalog() {
    let catalog = Catalog::builtin().unwrap();
    let stats = catalog.stats();
    assert_eq!(stats.total, 30);
    assert_eq!(stats.groups.len(), 6);
    assert_eq!(stats.count(Dialect::Jql, Tier::Advanced), 5);
}

#[test]
fn test_empty_input_is_parse_error() {
    for dialect in Dialect::ALL {
        let err = Catalog::load("", dialect).unwrap_err();
        assert!(err.is_parse(), "{err}");
    }
}

#[test]
fn test_unrecognized_input_is_parse_error() {
    let err = Catalog::load("SELECT 1;\nproject = MFG\nrandom notes", Dialect::Sql).unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.category(), "Parse Error");
}
