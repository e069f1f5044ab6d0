// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition compiler (§4.B): parses tokens into an AST once, then evaluates
//! the AST directly against an event on every match — replacing the source
//! repository's "compile to a Python expression string and `eval()` it"
//! shortcut (flagged as non-idiomatic in the design notes) with a
//! tree-walking interpreter.

use crate::field::FieldPath;
use crate::operators;
use crate::tokens::{Token, TokenType};
use scenario_core::{Number, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Field(FieldPath),
    Literal(Value),
}

impl Operand {
    fn resolve(&self, event: &Value) -> Value {
        match self {
            Operand::Field(path) => path.resolve(event),
            Operand::Literal(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Gte,
    Lte,
    Contains,
    NotContains,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Bool(bool),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare(Operand, CompareOp, Operand),
    Regex(Operand, Operand),
    In { operand: Operand, items: Vec<Operand>, negate: bool },
    IsNull(Operand, bool),
    /// A bare field or literal used as a condition on its own: truthy test.
    Truthy(Operand),
}

impl Expr {
    /// Evaluates the predicate against an event. Never panics: any internal
    /// inconsistency (which the parser should already prevent) degrades to
    /// `false` rather than propagating.
    pub fn eval(&self, event: &Value) -> bool {
        match self {
            Expr::Bool(b) => *b,
            Expr::And(l, r) => l.eval(event) && r.eval(event),
            Expr::Or(l, r) => l.eval(event) || r.eval(event),
            Expr::Not(inner) => !inner.eval(event),
            Expr::Compare(l, op, r) => {
                let lv = l.resolve(event);
                let rv = r.resolve(event);
                match op {
                    CompareOp::Eq => operators::safe_eq(&lv, &rv),
                    CompareOp::Ne => operators::safe_ne(&lv, &rv),
                    CompareOp::Gt => operators::safe_gt(&lv, &rv),
                    CompareOp::Lt => operators::safe_lt(&lv, &rv),
                    CompareOp::Gte => operators::safe_gte(&lv, &rv),
                    CompareOp::Lte => operators::safe_lte(&lv, &rv),
                    CompareOp::Contains => operators::contains(&lv, &rv),
                    CompareOp::NotContains => !operators::contains(&lv, &rv),
                }
            }
            Expr::Regex(l, r) => {
                let lv = l.resolve(event);
                let pattern = r.resolve(event);
                operators::regex_match(&lv, pattern.as_str().unwrap_or_default())
            }
            Expr::In { operand, items, negate } => {
                let v = operand.resolve(event);
                let found = items.iter().any(|item| operators::safe_eq(&v, &item.resolve(event)));
                found != *negate
            }
            Expr::IsNull(operand, negate) => {
                let v = operand.resolve(event);
                operators::is_null(&v) != *negate
            }
            Expr::Truthy(operand) => operand.resolve(event).truthy(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("unexpected end of condition expression")]
    UnexpectedEof,
    #[error("unexpected token at position {0}")]
    UnexpectedToken(usize),
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        self.pos += 1;
        t
    }

    fn parse_or(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_and()?;
        while let Some(t) = self.peek() {
            if t.kind == TokenType::Logical && t.value == "or" {
                self.advance();
                let right = self.parse_and()?;
                left = Expr::Or(Box::new(left), Box::new(right));
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, CompileError> {
        let mut left = self.parse_unary()?;
        while let Some(t) = self.peek() {
            if t.kind == TokenType::Logical && t.value == "and" {
                self.advance();
                let right = self.parse_unary()?;
                left = Expr::And(Box::new(left), Box::new(right));
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, CompileError> {
        if let Some(t) = self.peek() {
            if t.kind == TokenType::Logical && t.value == "not" {
                self.advance();
                let inner = self.parse_unary()?;
                return Ok(Expr::Not(Box::new(inner)));
            }
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> Result<Expr, CompileError> {
        if let Some(t) = self.peek() {
            if t.kind == TokenType::Bracket && t.value == "(" {
                self.advance();
                let inner = self.parse_or()?;
                match self.advance() {
                    Some(t) if t.kind == TokenType::Bracket && t.value == ")" => {}
                    _ => return Err(CompileError::UnexpectedEof),
                }
                return Ok(inner);
            }
        }
        self.parse_comparison()
    }

    fn parse_operand(&mut self) -> Result<Operand, CompileError> {
        let token = self.advance().ok_or(CompileError::UnexpectedEof)?;
        let operand = match token.kind {
            TokenType::Field => Operand::Field(FieldPath::parse(token.field_name())),
            TokenType::Number => {
                let value = if token.value.contains('.') {
                    Value::Number(Number::Float(token.value.parse().unwrap_or(0.0)))
                } else {
                    Value::Number(Number::Int(token.value.parse().unwrap_or(0)))
                };
                Operand::Literal(value)
            }
            TokenType::Boolean => {
                Operand::Literal(Value::Bool(token.value.eq_ignore_ascii_case("true")))
            }
            TokenType::None => Operand::Literal(Value::Null),
            TokenType::String => Operand::Literal(Value::String(unquote(&token.value))),
            _ => return Err(CompileError::UnexpectedToken(token.position)),
        };
        Ok(operand)
    }

    fn parse_list(&mut self) -> Result<Vec<Operand>, CompileError> {
        match self.advance() {
            Some(t) if t.kind == TokenType::Bracket && t.value == "[" => {}
            _ => return Err(CompileError::UnexpectedEof),
        }
        let mut items = Vec::new();
        loop {
            if let Some(t) = self.peek() {
                if t.kind == TokenType::Bracket && t.value == "]" {
                    self.advance();
                    break;
                }
            }
            items.push(self.parse_operand()?);
            if let Some(t) = self.peek() {
                if t.kind == TokenType::Comma {
                    self.advance();
                    continue;
                }
            }
        }
        Ok(items)
    }

    fn parse_comparison(&mut self) -> Result<Expr, CompileError> {
        let left = self.parse_operand()?;

        let Some(op_token) = self.peek() else {
            return Ok(Expr::Truthy(left));
        };

        if op_token.kind != TokenType::Operator {
            return Ok(Expr::Truthy(left));
        }

        let op_text = op_token.value.clone();
        let op_position = op_token.position;
        self.advance();

        match op_text.as_str() {
            "==" => Ok(Expr::Compare(left, CompareOp::Eq, self.parse_operand()?)),
            "!=" => Ok(Expr::Compare(left, CompareOp::Ne, self.parse_operand()?)),
            ">" => Ok(Expr::Compare(left, CompareOp::Gt, self.parse_operand()?)),
            "<" => Ok(Expr::Compare(left, CompareOp::Lt, self.parse_operand()?)),
            ">=" => Ok(Expr::Compare(left, CompareOp::Gte, self.parse_operand()?)),
            "<=" => Ok(Expr::Compare(left, CompareOp::Lte, self.parse_operand()?)),
            "~" => Ok(Expr::Compare(left, CompareOp::Contains, self.parse_operand()?)),
            "!~" => Ok(Expr::Compare(left, CompareOp::NotContains, self.parse_operand()?)),
            "regex" => Ok(Expr::Regex(left, self.parse_operand()?)),
            "in" => Ok(Expr::In { operand: left, items: self.parse_list()?, negate: false }),
            "not in" => Ok(Expr::In { operand: left, items: self.parse_list()?, negate: true }),
            "is_null" => Ok(Expr::IsNull(left, false)),
            "not is_null" => Ok(Expr::IsNull(left, true)),
            _ => Err(CompileError::UnexpectedToken(op_position)),
        }
    }
}

fn unquote(s: &str) -> String {
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

/// Compiles a token stream into an AST. Bare `"true"`/`"false"` condition
/// strings are special-cased by the caller before tokens reach here.
pub fn compile(tokens: &[Token]) -> Result<Expr, CompileError> {
    if tokens.is_empty() {
        return Ok(Expr::Bool(true));
    }
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_or()
}

#[path = "ast_tests.rs"]
#[cfg(test)]
mod tests;
