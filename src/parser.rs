/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

use crate::error::{Error, MalformedReason, Result};
use crate::lexer::{Lexer, Line};
use tracing::warn;

/// A classified source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `name=value` with both sides sanitized. The value is not yet resolved.
    Assignment {
        line: Line,
        name: String,
        value: String,
    },
    Comment(Line),
    /// Neither a comment nor a usable assignment.
    Other(Line),
}

impl Statement {
    pub fn line(&self) -> &Line {
        match self {
            Statement::Assignment { line, .. } | Statement::Comment(line) | Statement::Other(line) => {
                line
            }
        }
    }
}

/// Strip `export `, every quote character and surrounding whitespace.
pub fn sanitize_name(raw: &str) -> String {
    raw.replace("export ", "")
        .replace(['\'', '"'], "")
        .trim()
        .to_string()
}

/// Clean up the right-hand side of an assignment.
///
/// Quoted values run up to the matching unescaped closing quote and anything
/// after it is dropped. Unquoted values lose a trailing ` #` comment and must
/// not contain whitespace.
pub fn sanitize_value(raw: &str) -> std::result::Result<String, MalformedReason> {
    let value = raw.trim();
    if value.is_empty() {
        return Ok(String::new());
    }

    let value = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => scan_quoted(&value[1..], quote)?,
        _ => {
            let value = match value.split_once(" #") {
                Some((before, _)) => before,
                None => value,
            }
            .trim();

            if value.chars().any(char::is_whitespace) {
                // A bare comment where the value should be, e.g. `FOO= # note`
                if value.starts_with('#') {
                    String::new()
                } else {
                    return Err(MalformedReason::UnquotedWhitespace);
                }
            } else {
                value.to_string()
            }
        }
    };

    Ok(value.trim().to_string())
}

// Scan past the opening quote, unescaping `\\` and `\<quote>` on the way.
// Any other escape is kept verbatim.
fn scan_quoted(rest: &str, quote: char) -> std::result::Result<String, MalformedReason> {
    let mut value = String::with_capacity(rest.len());
    let mut after_escape = false;

    for ch in rest.chars() {
        if after_escape {
            if ch != quote && ch != '\\' {
                value.push('\\');
            }
            value.push(ch);
            after_escape = false;
            continue;
        }

        match ch {
            '\\' => after_escape = true,
            c if c == quote => return Ok(value),
            c => value.push(c),
        }
    }

    Err(MalformedReason::UnterminatedQuote)
}

/// Turns the lines of a [`Lexer`] into [`Statement`]s.
pub struct Parser {
    pub lexer: Lexer,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Self { lexer }
    }

    pub fn parse_line(line: Line) -> Result<Statement> {
        if line.is_comment() {
            return Ok(Statement::Comment(line));
        }

        let Some(assignment) = line.split_assignment() else {
            return Ok(Statement::Other(line));
        };

        let name = sanitize_name(&assignment.name);
        if name.is_empty() {
            warn!(line = line.number, "skipping assignment with an empty name");
            return Ok(Statement::Other(line));
        }

        let value = sanitize_value(&assignment.raw_value).map_err(|reason| Error::MalformedValue {
            line: line.number,
            name: name.clone(),
            reason,
        })?;

        Ok(Statement::Assignment { line, name, value })
    }

    pub fn next_statement(&mut self) -> Option<Result<Statement>> {
        self.lexer.next_line().map(Self::parse_line)
    }

    /// Parse everything, stopping at the first malformed value.
    pub fn parse_all(&mut self) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        while let Some(statement) = self.next_statement() {
            statements.push(statement?);
        }
        Ok(statements)
    }
}

impl Iterator for Parser {
    type Item = Result<Statement>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_statement()
    }
}

#[cfg(test)]
mod parser_tests {
    use super::*;

    fn value(raw: &str) -> String {
        sanitize_value(raw).unwrap()
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("FOO"), "FOO");
        assert_eq!(sanitize_name("export FOO"), "FOO");
        assert_eq!(sanitize_name("  'FOO'  "), "FOO");
        assert_eq!(sanitize_name("\"FOO\""), "FOO");
        assert_eq!(sanitize_name("export \"FOO\""), "FOO");
        assert_eq!(sanitize_name("\"\""), "");
    }

    #[test]
    fn test_plain_values() {
        assert_eq!(value("bar"), "bar");
        assert_eq!(value("  bar  "), "bar");
        assert_eq!(value(""), "");
        assert_eq!(value("   "), "");
        assert_eq!(value("0"), "0");
    }

    #[test]
    fn test_trailing_comment() {
        assert_eq!(value("bar # trailing comment"), "bar");
        assert_eq!(value("bar#not-a-comment"), "bar#not-a-comment");
        assert_eq!(value("# just a comment"), "");
        assert_eq!(value("#nospace"), "#nospace");
    }

    #[test]
    fn test_unquoted_whitespace_is_rejected() {
        assert_eq!(
            sanitize_value("bar baz"),
            Err(MalformedReason::UnquotedWhitespace)
        );
        assert_eq!(
            sanitize_value("bar\tbaz # comment"),
            Err(MalformedReason::UnquotedWhitespace)
        );
    }

    #[test]
    fn test_quoted_values() {
        assert_eq!(value(r#""hello world""#), "hello world");
        assert_eq!(value("'hello world'"), "hello world");
        assert_eq!(value(r#""a \"quoted\" value""#), r#"a "quoted" value"#);
        assert_eq!(value(r"'it\'s'"), "it's");
        assert_eq!(value(r#""back\\slash""#), r"back\slash");
        assert_eq!(value(r#""""#), "");
    }

    #[test]
    fn test_quoted_value_drops_trailing_text() {
        assert_eq!(value(r#""bar" # comment"#), "bar");
        assert_eq!(value(r#""bar"baz"#), "bar");
        assert_eq!(value(r#""with # hash" ignored"#), "with # hash");
    }

    #[test]
    fn test_quoted_value_is_trimmed() {
        assert_eq!(value(r#""  padded  ""#), "padded");
    }

    #[test]
    fn test_other_quote_kind_is_literal() {
        assert_eq!(value(r#""it's""#), "it's");
        assert_eq!(value(r#"'say "hi"'"#), r#"say "hi""#);
    }

    #[test]
    fn test_unknown_escape_is_kept() {
        assert_eq!(value(r#""line\nbreak""#), r"line\nbreak");
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            sanitize_value(r#""never closed"#),
            Err(MalformedReason::UnterminatedQuote)
        );
        assert_eq!(
            sanitize_value(r#""escaped end\""#),
            Err(MalformedReason::UnterminatedQuote)
        );
    }

    #[test]
    fn test_parse_line_kinds() {
        let statement = Parser::parse_line(Line::new("# FOO=bar", 1)).unwrap();
        assert!(matches!(statement, Statement::Comment(_)));

        let statement = Parser::parse_line(Line::new("no equals here", 2)).unwrap();
        assert!(matches!(statement, Statement::Other(_)));

        let statement = Parser::parse_line(Line::new("=orphan", 3)).unwrap();
        assert!(matches!(statement, Statement::Other(_)));

        let statement = Parser::parse_line(Line::new("export FOO='bar'", 4)).unwrap();
        match statement {
            Statement::Assignment { name, value, line } => {
                assert_eq!(name, "FOO");
                assert_eq!(value, "bar");
                assert_eq!(line.number, 4);
            }
            other => panic!("Expected assignment, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_line_reports_position() {
        let err = Parser::parse_line(Line::new("FOO=bar baz", 7)).unwrap_err();
        match err {
            Error::MalformedValue { line, name, reason } => {
                assert_eq!(line, 7);
                assert_eq!(name, "FOO");
                assert_eq!(reason, MalformedReason::UnquotedWhitespace);
            }
            other => panic!("Expected malformed value, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_all_stops_at_error() {
        let mut parser = Parser::new(Lexer::new("A=1\nB=two words\nC=3"));
        assert!(parser.parse_all().is_err());
        // The line after the bad one is still available
        let next = parser.next_statement().unwrap().unwrap();
        assert_eq!(next.line().text, "C=3");
    }
}
