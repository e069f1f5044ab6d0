// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition tokeniser (§4.A).
//!
//! Lexes a condition source into typed tokens using a fixed, priority-ordered
//! set of patterns — multi-word operators before single words, quoted and
//! multi-dot/digit-prefixed literals before the generic identifier catch-all.
//! Grounded in `condition_parser/core/tokenizer.py`; tokenisation never
//! fails — unmatched runs become [`TokenType::Unknown`] tokens.

use crate::tokens::{Token, TokenType};
use once_cell::sync::Lazy;
use regex::Regex;

struct Pattern {
    kind: TokenType,
    re: Regex,
}

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!(r"\A(?:{pattern})")).expect("static tokeniser pattern is valid regex")
}

static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    vec![
        Pattern { kind: TokenType::Boolean, re: anchored(r"\b(?:True|False|true|false)\b") },
        Pattern { kind: TokenType::None, re: anchored(r"\bNone\b") },
        Pattern {
            kind: TokenType::Field,
            re: anchored(r"[\$][\w\.]+(?:\[[^\]]+\])+(?:\.[\w]+)*"),
        },
        Pattern { kind: TokenType::Field, re: anchored(r"[\$][\w\.]+(?:\.[\w]+)*") },
        Pattern { kind: TokenType::String, re: anchored(r#""[^"]*""#) },
        Pattern { kind: TokenType::String, re: anchored(r"'[^']*'") },
        Pattern { kind: TokenType::String, re: anchored(r"\d+\.\d+\.\d+[.\d\s:]*") },
        Pattern {
            kind: TokenType::String,
            re: anchored(r"\d+[a-zA-Z\-:][a-zA-Z0-9_\-:.]*"),
        },
        Pattern { kind: TokenType::Number, re: anchored(r"-?\d+\.\d+") },
        Pattern { kind: TokenType::Number, re: anchored(r"-?\d+") },
        Pattern { kind: TokenType::Operator, re: anchored(r"\bnot\s+is_null\b") },
        Pattern { kind: TokenType::Operator, re: anchored(r"\bnot\s+in\b") },
        Pattern { kind: TokenType::Logical, re: anchored(r"\b(?:and|or|not)\b") },
        Pattern { kind: TokenType::Operator, re: anchored(r">=|<=|!=|==|!~|~|>|<") },
        Pattern { kind: TokenType::Operator, re: anchored(r"\b(?:regex|is_null|in)\b") },
        Pattern {
            kind: TokenType::String,
            re: anchored(r"\b[a-zA-Z0-9_][a-zA-Z0-9_\-:.]*\b"),
        },
        Pattern { kind: TokenType::Bracket, re: anchored(r"[\(\)\[\]]") },
        Pattern { kind: TokenType::Comma, re: anchored(",") },
    ]
});

fn is_boundary_char(c: char) -> bool {
    matches!(c, '=' | '!' | '>' | '<' | '~' | '&' | '|' | '(' | ')' | '[' | ']' | ',')
        || c.is_whitespace()
}

/// Extends a multi-dot STRING match ("2024.01.01" / "192.168.0.1:8080") to
/// its natural boundary: keep consuming digits/`.`/`:` until an operator
/// character or whitespace.
fn extend_to_natural_boundary(text: &str, start: usize, mut end: usize) -> usize {
    let bytes = text.as_bytes();
    while end < bytes.len() {
        let c = text[end..].chars().next().unwrap_or('\0');
        if is_boundary_char(c) {
            break;
        }
        end += c.len_utf8();
    }
    end.max(start)
}

pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let len = source.len();

    while pos < len {
        let rest = &source[pos..];
        let leading_ws = rest.len() - rest.trim_start().len();
        if leading_ws > 0 {
            pos += leading_ws;
            continue;
        }

        let mut matched = false;
        for (idx, pattern) in PATTERNS.iter().enumerate() {
            if let Some(m) = pattern.re.find(&source[pos..]) {
                if m.start() != 0 {
                    continue;
                }
                let mut match_end = pos + m.end();
                // Patterns 6/7 (multi-dot / digit-prefixed STRING) extend to
                // a natural boundary past the raw regex match.
                if idx == 6 || idx == 7 {
                    match_end = extend_to_natural_boundary(source, pos, match_end);
                }
                let text = &source[pos..match_end];
                tokens.push(Token::new(pattern.kind, text, pos));
                pos = match_end;
                matched = true;
                break;
            }
        }

        if !matched {
            // No pattern matches at this exact position: scan forward for
            // the next position any pattern matches, emitting everything in
            // between as one UNKNOWN token. If nothing matches again,
            // consume the remainder of the string as UNKNOWN.
            let mut next = pos + 1;
            let found = 'search: loop {
                if next >= len {
                    break 'search None;
                }
                for pattern in PATTERNS.iter() {
                    if let Some(m) = pattern.re.find(&source[next..]) {
                        if m.start() == 0 {
                            break 'search Some(next);
                        }
                    }
                }
                next += source[next..].chars().next().map(char::len_utf8).unwrap_or(1);
            };

            let end = found.unwrap_or(len);
            tokens.push(Token::new(TokenType::Unknown, &source[pos..end], pos));
            pos = end;
        }
    }

    tokens
}

#[path = "tokenizer_tests.rs"]
#[cfg(test)]
mod tests;
