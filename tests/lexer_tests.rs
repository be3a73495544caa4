/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

use envfile::lexer::{Lexer, Line};

#[test]
fn test_lexer_basic_lines() {
    let mut lexer = Lexer::new("A=1\nB=2");

    let line1 = lexer.next_line().unwrap();
    assert_eq!(line1.text, "A=1");
    assert_eq!(line1.number, 1);

    let line2 = lexer.next_line().unwrap();
    assert_eq!(line2.text, "B=2");
    assert_eq!(line2.number, 2);

    assert!(lexer.next_line().is_none());
    assert!(lexer.next_line().is_none());
}

#[test]
fn test_lexer_mixed_line_endings() {
    let lines = Lexer::new("A=1\r\nB=2\nC=3\rD=4\r\n").tokenize();
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(texts, vec!["A=1", "B=2", "C=3", "D=4"]);
}

#[test]
fn test_lexer_keeps_inner_whitespace() {
    let lines = Lexer::new("  KEY = value  \n").tokenize();
    assert_eq!(lines, vec![Line::new("  KEY = value  ", 1)]);
}

#[test]
fn test_lexer_classifies_lines() {
    let lines = Lexer::new("# comment\nKEY=value\nplain words\n\t# tabbed").tokenize();

    assert!(lines[0].is_comment());
    assert!(!lines[1].is_comment());
    assert!(lines[1].looks_like_assignment());
    assert!(!lines[2].is_comment());
    assert!(!lines[2].looks_like_assignment());
    assert!(lines[3].is_comment());
}

#[test]
fn test_lexer_split_assignment() {
    let assignment = Line::new("export KEY = \"a=b\" ", 1)
        .split_assignment()
        .unwrap();
    assert_eq!(assignment.name, "export KEY");
    assert_eq!(assignment.raw_value, "\"a=b\"");
}
