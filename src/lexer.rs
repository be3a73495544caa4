/*
 * Copyright (c) 2025 Raphael Amorim
 *
 * This file is part of envfile, which is licensed
 * under GNU General Public License v3.0.
 */

/// A single non-empty line of source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub number: usize,
}

/// A `(name, raw value)` pair split out of an assignment line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub raw_value: String,
}

impl Line {
    pub fn new(text: impl Into<String>, number: usize) -> Self {
        Self {
            text: text.into(),
            number,
        }
    }

    /// True when the first non-blank character is `#`.
    pub fn is_comment(&self) -> bool {
        self.text.trim_start().starts_with('#')
    }

    /// True when the line contains `=` anywhere.
    pub fn looks_like_assignment(&self) -> bool {
        self.text.contains('=')
    }

    /// Split on the first `=` and trim both halves.
    pub fn split_assignment(&self) -> Option<Assignment> {
        let (name, value) = self.text.split_once('=')?;
        Some(Assignment {
            name: name.trim().to_string(),
            raw_value: value.trim().to_string(),
        })
    }
}

/// Splits file content into lines. `\n`, `\r\n` and a bare `\r` all end a line.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    read_position: usize,
    ch: char,
    line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Self {
            input: input.chars().collect(),
            position: 0,
            read_position: 0,
            ch: '\0',
            line: 1,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        if self.read_position >= self.input.len() {
            self.ch = '\0';
        } else {
            self.ch = self.input[self.read_position];
        }
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> char {
        if self.read_position >= self.input.len() {
            '\0'
        } else {
            self.input[self.read_position]
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    // Consume one line terminator, if we are sitting on one
    fn skip_newline(&mut self) -> bool {
        match self.ch {
            '\r' => {
                if self.peek_char() == '\n' {
                    self.read_char();
                }
                self.read_char();
                true
            }
            '\n' => {
                self.read_char();
                true
            }
            _ => false,
        }
    }

    /// Next non-empty line, or `None` once the input is exhausted.
    pub fn next_line(&mut self) -> Option<Line> {
        loop {
            if self.at_end() {
                return None;
            }

            let number = self.line;
            let start = self.position;
            while !self.at_end() && self.ch != '\n' && self.ch != '\r' {
                self.read_char();
            }
            let end = self.position.min(self.input.len());
            let text: String = self.input[start..end].iter().collect();

            self.skip_newline();
            self.line += 1;

            if !text.is_empty() {
                return Some(Line::new(text, number));
            }
        }
    }

    pub fn tokenize(mut self) -> Vec<Line> {
        let mut lines = Vec::new();
        while let Some(line) = self.next_line() {
            lines.push(line);
        }
        lines
    }
}

impl Iterator for Lexer {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        self.next_line()
    }
}
