//! JQL tokenizer and structural checks.
//!
//! This is not a full JQL grammar. It catches the mistakes that make a
//! pasted filter fail outright: unterminated strings, unbalanced
//! parentheses, dangling boolean operators, and a misplaced `ORDER BY`.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use super::{Finding, LintReport};

/// A token of JQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JqlToken {
    /// Field names, keywords, values, function names, relative dates.
    Word(String),
    /// A single- or double-quoted string, without its quotes.
    Quoted(String),
    /// Comparison operator: `=`, `!=`, `<`, `<=`, `>`, `>=`, `~`, `!~`.
    Operator(String),
    LParen,
    RParen,
    Comma,
}

impl JqlToken {
    /// Returns true if this is a word equal to `keyword`, ignoring case.
    fn is_keyword(&self, keyword: &str) -> bool {
        matches!(self, JqlToken::Word(w) if w.eq_ignore_ascii_case(keyword))
    }

    fn is_connective(&self) -> bool {
        self.is_keyword("and") || self.is_keyword("or")
    }
}

impl fmt::Display for JqlToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(w) => write!(f, "{w}"),
            Self::Quoted(q) => write!(f, "\"{q}\""),
            Self::Operator(op) => write!(f, "{op}"),
            Self::LParen => write!(f, "("),
            Self::RParen => write!(f, ")"),
            Self::Comma => write!(f, ","),
        }
    }
}

/// Words that start a comparison when they follow a field name.
const FIELD_KEYWORDS: [&str; 4] = ["in", "is", "was", "changed"];

/// Words that are never field names.
const RESERVED: [&str; 7] = ["and", "or", "not", "order", "by", "empty", "null"];

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '"' | '\'' | '(' | ')' | ',' | '=' | '!' | '<' | '>' | '~')
}

/// Tokenizes JQL text.
///
/// Returns an error message for an unterminated quoted string.
pub fn tokenize_jql(input: &str) -> Result<Vec<JqlToken>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(JqlToken::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(JqlToken::RParen);
            }
            ',' => {
                chars.next();
                tokens.push(JqlToken::Comma);
            }
            '"' | '\'' => {
                chars.next();
                tokens.push(JqlToken::Quoted(collect_quoted(&mut chars, c)?));
            }
            '=' | '~' => {
                chars.next();
                tokens.push(JqlToken::Operator(c.to_string()));
            }
            '!' | '<' | '>' => {
                chars.next();
                let mut op = c.to_string();
                if let Some(&next @ ('=' | '~')) = chars.peek() {
                    // `<~` and `>~` are not operators
                    if next == '=' || c == '!' {
                        op.push(next);
                        chars.next();
                    }
                }
                tokens.push(JqlToken::Operator(op));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if !is_word_char(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                tokens.push(JqlToken::Word(word));
            }
        }
    }

    Ok(tokens)
}

/// Collects characters until the closing quote, handling backslash escapes.
fn collect_quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, String> {
    let mut value = String::new();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => value.push(escaped),
                None => break,
            },
            c if c == quote => return Ok(value),
            c => value.push(c),
        }
    }

    Err(format!("unterminated {quote}-quoted string"))
}

/// Lints JQL text.
pub fn lint_jql(text: &str) -> LintReport {
    let mut report = LintReport::default();

    let tokens = match tokenize_jql(text) {
        Ok(tokens) => tokens,
        Err(msg) => {
            report.push(Finding::error(msg));
            return report;
        }
    };

    if tokens.is_empty() {
        report.push(Finding::error("empty query"));
        return report;
    }

    check_parentheses(&tokens, &mut report);
    check_connectives(&tokens, &mut report);
    check_order_by(&tokens, &mut report);

    let fields = referenced_fields(&tokens);
    if !fields.is_empty() {
        report.push(Finding::info(format!("fields: {}", fields.join(", "))));
    }

    report
}

fn check_parentheses(tokens: &[JqlToken], report: &mut LintReport) {
    let mut depth: usize = 0;
    for token in tokens {
        match token {
            JqlToken::LParen => depth += 1,
            JqlToken::RParen => {
                if depth == 0 {
                    report.push(Finding::error("unexpected ')'"));
                    return;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    if depth > 0 {
        report.push(Finding::error(format!("{depth} unclosed '('")));
    }
}

fn check_connectives(tokens: &[JqlToken], report: &mut LintReport) {
    if let Some(first) = tokens.first().filter(|t| t.is_connective()) {
        report.push(Finding::error(format!("query starts with '{first}'")));
    }
    if let Some(last) = tokens
        .last()
        .filter(|t| t.is_connective() || t.is_keyword("not"))
    {
        report.push(Finding::error(format!("query ends with '{last}'")));
    }

    for pair in tokens.windows(2) {
        let dangling = match (&pair[0], &pair[1]) {
            (JqlToken::LParen, next) => next.is_connective(),
            (prev, next) => {
                prev.is_connective()
                    && (next.is_connective()
                        || *next == JqlToken::RParen
                        || next.is_keyword("order"))
            }
        };
        if dangling {
            report.push(Finding::error(format!(
                "'{}' is followed by '{}'",
                pair[0], pair[1]
            )));
        }
    }
}

fn check_order_by(tokens: &[JqlToken], report: &mut LintReport) {
    let order_by: Vec<usize> = tokens
        .windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0].is_keyword("order") && pair[1].is_keyword("by"))
        .map(|(idx, _)| idx)
        .collect();

    let Some(&first) = order_by.first() else {
        return;
    };

    if order_by.len() > 1 {
        report.push(Finding::warning("ORDER BY appears more than once"));
    }
    if tokens[first..].iter().any(JqlToken::is_connective) {
        report.push(Finding::warning("ORDER BY should be the final clause"));
    }
}

/// Field names in first-seen order: words or quoted names directly followed
/// by a comparison operator or comparison keyword.
fn referenced_fields(tokens: &[JqlToken]) -> Vec<String> {
    let mut fields: Vec<String> = Vec::new();

    for (idx, pair) in tokens.windows(2).enumerate() {
        let name = match &pair[0] {
            JqlToken::Word(w) if !RESERVED.iter().any(|r| w.eq_ignore_ascii_case(r)) => w,
            JqlToken::Quoted(q) => q,
            _ => continue,
        };

        let starts_comparison = match &pair[1] {
            JqlToken::Operator(_) => true,
            next if FIELD_KEYWORDS.iter().any(|k| next.is_keyword(k)) => true,
            next if next.is_keyword("not") => tokens
                .get(idx + 2)
                .is_some_and(|t| t.is_keyword("in") || t.is_keyword("was")),
            _ => false,
        };

        if starts_comparison && !fields.iter().any(|f| f == name) {
            fields.push(name.clone());
        }
    }

    fields
}
