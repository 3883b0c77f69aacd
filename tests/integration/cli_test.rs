//! Binary tests.
//!
//! Runs the compiled `querybook` binary with an isolated config path.

use std::path::Path;
use std::process::Command;

fn run(args: &[&str], config: &Path) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_querybook"))
        .args(args)
        .env("QUERYBOOK_CONFIG", config)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute querybook");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

fn run_default(args: &[&str]) -> (i32, String, String) {
    let dir = tempfile::tempdir().unwrap();
    run(args, &dir.path().join("missing.toml"))
}

#[test]
fn test_list_by_tier() {
    let (code, stdout, _) = run_default(&["list", "--dialect", "sql", "--tier", "beginner"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("sql-1 "));
    assert!(stdout.contains("sql-5 "));
    assert!(!stdout.contains("sql-6 "));
    assert!(stdout.contains("5 queries"));
}

#[test]
fn test_search_json() {
    let (code, stdout, _) = run_default(&["search", "torque", "-d", "jql", "--format", "json"]);
    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let titles: Vec<&str> = value
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert!(titles
        .iter()
        .any(|t| t.to_lowercase().contains("torque tool integration")));
}

#[test]
fn test_show_prints_verbatim_text() {
    let (code, stdout, _) = run_default(&["show", "SQL-2"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("sql-2  Count defects recorded today"));
    assert!(stdout.contains("SELECT COUNT(*) AS defects_today\nFROM defects\n"));
}

#[test]
fn test_show_unknown_id_fails() {
    let (code, stdout, stderr) = run_default(&["show", "sql-999"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Not found"), "stderr: {stderr}");
}

#[test]
fn test_stats() {
    let (code, stdout, _) = run_default(&["stats"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Total: 30"));
}

#[test]
fn test_lint_builtin_passes() {
    let (code, stdout, _) = run_default(&["lint"]);
    assert_eq!(code, 0, "stdout: {stdout}");
    assert!(stdout.contains("30 queries checked, 0 errors, 0 warnings"));
}

#[test]
fn test_extra_source_and_lint_failure() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("team.sql");
    std::fs::write(&source, "-- ADVANCED QUERIES\n-- 101. Broken\nSELEC 1;\n").unwrap();

    let source_arg = source.to_str().unwrap();
    let config = dir.path().join("missing.toml");

    let (code, stdout, _) = run(&["--no-builtin", "-s", source_arg, "list"], &config);
    assert_eq!(code, 0);
    assert!(stdout.contains("sql-101"));
    assert!(stdout.contains("1 query"));

    let (code, stdout, _) = run(&["--no-builtin", "-s", source_arg, "lint"], &config);
    assert_eq!(code, 1);
    assert!(stdout.contains("sql-101: error:"));
}

#[test]
fn test_config_file_sources_and_format() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("filters.jql"),
        "## Beginner\n// 100. Team backlog\nproject = TEAM ORDER BY rank\n",
    )
    .unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(
        &config,
        "[catalog]\ninclude_builtin = false\n\n[[catalog.sources]]\npath = \"filters.jql\"\n\n[output]\nformat = \"json\"\n",
    )
    .unwrap();

    let (code, stdout, stderr) = run(&["export"], &config);
    assert_eq!(code, 0, "stderr: {stderr}");
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 1);
    assert_eq!(value[0]["id"], "jql-100");

    let (code, stdout, _) = run(&["list", "--format", "text"], &config);
    assert_eq!(code, 0);
    assert!(stdout.contains("jql-100"));
}

#[test]
fn test_unparseable_source_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("notes.sql");
    std::fs::write(&source, "just notes\n").unwrap();

    let (code, _, stderr) = run(
        &["--no-builtin", "-s", source.to_str().unwrap(), "list"],
        &dir.path().join("missing.toml"),
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("Parse error"), "stderr: {stderr}");
}
