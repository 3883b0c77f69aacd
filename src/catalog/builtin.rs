//! Example sources compiled into the binary.

use super::Dialect;

/// A catalog source embedded at compile time.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSource {
    /// File name under `queries/`.
    pub name: &'static str,
    pub dialect: Dialect,
    pub text: &'static str,
}

static BUILTIN_SOURCES: [BuiltinSource; 2] = [
    BuiltinSource {
        name: "jira_examples.jql",
        dialect: Dialect::Jql,
        text: include_str!("../../queries/jira_examples.jql"),
    },
    BuiltinSource {
        name: "sql_examples.sql",
        dialect: Dialect::Sql,
        text: include_str!("../../queries/sql_examples.sql"),
    },
];

/// The embedded example sources, JQL first.
pub fn builtin_sources() -> &'static [BuiltinSource] {
    &BUILTIN_SOURCES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_match_dialects() {
        for source in builtin_sources() {
            assert_eq!(Dialect::from_path(source.name.as_ref()), Some(source.dialect));
            assert!(!source.text.trim().is_empty());
        }
    }
}
