//! Lint tests over the built-in catalog.
//!
//! Example queries are meant to be pasted as-is, so every built-in entry
//! must pass its dialect's checks.

use querybook::lint::{lint_catalog, lint_entry, SafetyLevel, Severity};
use querybook::{Catalog, Dialect};

#[test]
fn test_builtin_sql_parses_and_is_read_only() {
    let catalog = Catalog::builtin().unwrap();
    for entry in catalog.list_by_dialect(Dialect::Sql) {
        let report = lint_entry(entry);
        assert!(
            !report.has_errors(),
            "{} failed to lint: {:?}",
            entry.id,
            report.findings
        );
        let classification = report.classification.unwrap();
        assert_eq!(classification.level, SafetyLevel::ReadOnly, "{}", entry.id);
        assert_eq!(classification.statements, 1, "{}", entry.id);
    }
}

#[test]
fn test_builtin_jql_has_no_errors_or_warnings() {
    let catalog = Catalog::builtin().unwrap();
    for entry in catalog.list_by_dialect(Dialect::Jql) {
        let report = lint_entry(entry);
        let problems: Vec<_> = report.at_least(Severity::Warning).collect();
        assert!(problems.is_empty(), "{}: {:?}", entry.id, problems);
    }
}

#[test]
fn test_builtin_jql_reports_referenced_fields() {
    let catalog = Catalog::builtin().unwrap();
    let report = lint_entry(catalog.get("jql-13").unwrap());
    let info = &report.findings[0];
    assert_eq!(info.severity, Severity::Info);
    assert!(info.message.contains("Audit Type"));
    assert!(info.message.contains("status"));
}

#[test]
fn test_lint_catalog_covers_every_entry_in_order() {
    let catalog = Catalog::builtin().unwrap();
    let reports = lint_catalog(&catalog, None);
    let ids: Vec<&str> = reports.iter().map(|r| r.id).collect();
    let expected: Vec<&str> = catalog.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_lint_flags_problems_in_user_catalog() {
    let source = "\
-- ADVANCED QUERIES
-- 201. Clean up scratch rows
DELETE FROM scratch_results;

-- 202. Typo
SELEC * FROM machines;
";
    let catalog = Catalog::load(source, Dialect::Sql).unwrap();
    let reports = lint_catalog(&catalog, Some(Dialect::Sql));
    assert_eq!(reports[0].report.max_severity(), Some(Severity::Warning));
    assert!(reports[1].report.has_errors());
}
