//! SQL parsing and classification logic.
//!
//! Uses sqlparser-rs with PostgreSQL dialect to parse SQL and classify
//! statements by their safety level.

use sqlparser::ast::{Query, Select, SetExpr, Statement, TableFactor, TableWithJoins};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::{QuerybookError, Result};

use super::{Classification, Finding, LintReport, SafetyLevel, StatementType};

/// SQL classifier that parses and classifies SQL queries.
#[derive(Debug)]
pub struct SqlClassifier {
    dialect: PostgreSqlDialect,
}

impl Default for SqlClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlClassifier {
    /// Creates a new SQL classifier.
    pub fn new() -> Self {
        Self {
            dialect: PostgreSqlDialect {},
        }
    }

    /// Parses `sql` and returns the most dangerous classification among its
    /// statements.
    pub fn classify(&self, sql: &str) -> Result<Classification> {
        let statements = Parser::parse_sql(&self.dialect, sql)
            .map_err(|e| QuerybookError::parse(format!("SQL parse error: {e}")))?;

        if statements.is_empty() {
            return Err(QuerybookError::parse("Empty SQL statement"));
        }

        let mut level = SafetyLevel::ReadOnly;
        let mut statement_type = StatementType::Unknown;
        for (idx, stmt) in statements.iter().enumerate() {
            let (stmt_level, stmt_type) = classify_statement(stmt);
            if idx == 0 || stmt_level > level {
                level = stmt_level;
                statement_type = stmt_type;
            }
        }

        Ok(Classification {
            level,
            statement_type,
            statements: statements.len(),
        })
    }

    /// Lints `sql`: parse failures are errors, anything that is not
    /// read-only is a warning.
    pub fn lint(&self, sql: &str) -> LintReport {
        let mut report = LintReport::default();

        match self.classify(sql) {
            Ok(classification) => {
                if !classification.level.is_read_only() {
                    report.push(Finding::warning(format!(
                        "{} statement is {}; example queries should be read-only",
                        classification.statement_type, classification.level
                    )));
                }
                if classification.statements > 1 {
                    report.push(Finding::info(format!(
                        "contains {} statements",
                        classification.statements
                    )));
                }
                report.classification = Some(classification);
            }
            Err(QuerybookError::Parse(msg)) => report.push(Finding::error(msg)),
            Err(other) => report.push(Finding::error(other.to_string())),
        }

        report
    }
}

/// Convenience function to classify SQL without creating a classifier instance.
pub fn classify_sql(sql: &str) -> Result<Classification> {
    SqlClassifier::new().classify(sql)
}

pub(super) fn lint_sql(sql: &str) -> LintReport {
    SqlClassifier::new().lint(sql)
}

/// Picks the more dangerous of two classifications, preferring `current` on ties.
fn most_dangerous(
    current: (SafetyLevel, StatementType),
    candidate: (SafetyLevel, StatementType),
) -> (SafetyLevel, StatementType) {
    if candidate.0 > current.0 {
        candidate
    } else {
        current
    }
}

/// Classifies a single parsed statement.
fn classify_statement(statement: &Statement) -> (SafetyLevel, StatementType) {
    match statement {
        // Query: may contain data-modifying CTEs, so recurse
        Statement::Query(query) => classify_query(query),
        Statement::Explain {
            analyze, statement, ..
        } => {
            if *analyze {
                // EXPLAIN ANALYZE executes the statement
                let (inner_level, _) = classify_statement(statement);
                (inner_level, StatementType::Explain)
            } else {
                (SafetyLevel::ReadOnly, StatementType::Explain)
            }
        }
        Statement::ShowVariable { .. }
        | Statement::ShowTables { .. }
        | Statement::ShowColumns { .. }
        | Statement::ShowCreate { .. }
        | Statement::ShowFunctions { .. }
        | Statement::ShowStatus { .. }
        | Statement::ShowCollation { .. } => (SafetyLevel::ReadOnly, StatementType::Show),

        Statement::Insert(_) => (SafetyLevel::Mutating, StatementType::Insert),
        Statement::Update { .. } => (SafetyLevel::Mutating, StatementType::Update),
        Statement::Merge { .. } => (SafetyLevel::Mutating, StatementType::Merge),

        Statement::Delete(_) => (SafetyLevel::Destructive, StatementType::Delete),
        Statement::Drop { .. } => (SafetyLevel::Destructive, StatementType::Drop),
        Statement::Truncate { .. } => (SafetyLevel::Destructive, StatementType::Truncate),
        Statement::AlterTable { .. }
        | Statement::AlterIndex { .. }
        | Statement::AlterView { .. }
        | Statement::AlterRole { .. } => (SafetyLevel::Destructive, StatementType::Alter),
        Statement::CreateTable { .. }
        | Statement::CreateIndex { .. }
        | Statement::CreateView { .. }
        | Statement::CreateSchema { .. }
        | Statement::CreateDatabase { .. }
        | Statement::CreateFunction { .. }
        | Statement::CreateProcedure { .. }
        | Statement::CreateRole { .. }
        | Statement::CreateSequence { .. }
        | Statement::CreateType { .. } => (SafetyLevel::Destructive, StatementType::Create),
        Statement::Grant { .. } => (SafetyLevel::Destructive, StatementType::Grant),
        Statement::Revoke { .. } => (SafetyLevel::Destructive, StatementType::Revoke),

        // Anything else is treated as destructive
        _ => (SafetyLevel::Destructive, StatementType::Unknown),
    }
}

/// Classifies a Query by recursively inspecting for data-modifying operations.
fn classify_query(query: &Query) -> (SafetyLevel, StatementType) {
    let mut max = (SafetyLevel::ReadOnly, StatementType::Select);

    if let Some(with) = &query.with {
        for cte in &with.cte_tables {
            max = most_dangerous(max, classify_query(&cte.query));
        }
    }

    most_dangerous(max, classify_set_expr(&query.body))
}

/// Classifies a SetExpr, detecting mutations and recursing into nested queries.
fn classify_set_expr(set_expr: &SetExpr) -> (SafetyLevel, StatementType) {
    match set_expr {
        // Data-modifying CTE bodies
        SetExpr::Delete(stmt) => classify_statement(stmt),
        SetExpr::Update(stmt) => classify_statement(stmt),
        SetExpr::Insert(stmt) => classify_statement(stmt),
        SetExpr::Merge(stmt) => classify_statement(stmt),

        SetExpr::Query(query) => classify_query(query),
        SetExpr::Select(select) => classify_select(select),

        // UNION, INTERSECT, EXCEPT
        SetExpr::SetOperation { left, right, .. } => {
            most_dangerous(classify_set_expr(left), classify_set_expr(right))
        }

        SetExpr::Values(_) | SetExpr::Table(_) => (SafetyLevel::ReadOnly, StatementType::Select),
    }
}

/// Classifies a Select by checking its FROM clause for subqueries.
fn classify_select(select: &Select) -> (SafetyLevel, StatementType) {
    select
        .from
        .iter()
        .map(classify_table_with_joins)
        .fold((SafetyLevel::ReadOnly, StatementType::Select), most_dangerous)
}

/// Classifies a TableWithJoins, checking the main relation and all joins.
fn classify_table_with_joins(twj: &TableWithJoins) -> (SafetyLevel, StatementType) {
    twj.joins
        .iter()
        .map(|join| classify_table_factor(&join.relation))
        .fold(classify_table_factor(&twj.relation), most_dangerous)
}

/// Classifies a TableFactor, recursing into derived tables (subqueries).
fn classify_table_factor(factor: &TableFactor) -> (SafetyLevel, StatementType) {
    match factor {
        TableFactor::Derived { subquery, .. } => classify_query(subquery),
        TableFactor::NestedJoin {
            table_with_joins, ..
        } => classify_table_with_joins(table_with_joins),
        _ => (SafetyLevel::ReadOnly, StatementType::Select),
    }
}
