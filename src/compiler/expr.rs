//! Expression trees and the precedence-climbing expression parser
//!
//! Precedence, loosest first: `OR`, `AND`, comparisons, `+ -`, `* /`, unary
//! `- !`. The tree only exists while compiling; execution uses the plan built
//! from it.

use super::Compiler;
use crate::arena::StrId;
use crate::executor::errors::{self, Fault};
use crate::executor::types::{BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Number(i32),
    Str(StrId),
    Var(StrId),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call { name: StrId, args: Vec<Expr> },
}

impl Expr {
    pub fn is_call(&self) -> bool {
        matches!(self, Expr::Call { .. })
    }
}

fn comparison_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::EqEq => Some(BinaryOp::Eq),
        TokenKind::Neq => Some(BinaryOp::Neq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Lte => Some(BinaryOp::Lte),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Gte => Some(BinaryOp::Gte),
        _ => None,
    }
}

fn additive_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        _ => None,
    }
}

fn multiplicative_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        _ => None,
    }
}

impl Compiler<'_> {
    pub(super) fn parse_expr(&mut self) -> Result<Expr, Fault> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, Fault> {
        let mut left = self.parse_and()?;
        while self.eat(TokenKind::Or)? {
            let right = self.parse_and()?;
            left = Expr::Binary(BinaryOp::Or, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, Fault> {
        let mut left = self.parse_comparison()?;
        while self.eat(TokenKind::And)? {
            let right = self.parse_comparison()?;
            left = Expr::Binary(BinaryOp::And, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, Fault> {
        let mut left = self.parse_additive()?;
        while let Some(op) = comparison_op(self.peek().kind) {
            self.advance()?;
            let right = self.parse_additive()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, Fault> {
        let mut left = self.parse_term()?;
        while let Some(op) = additive_op(self.peek().kind) {
            self.advance()?;
            let right = self.parse_term()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr, Fault> {
        let mut left = self.parse_unary()?;
        while let Some(op) = multiplicative_op(self.peek().kind) {
            self.advance()?;
            let right = self.parse_unary()?;
            left = Expr::Binary(op, Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, Fault> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Negate,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::Unary(op, Box::new(operand)))
    }

    fn parse_primary(&mut self) -> Result<Expr, Fault> {
        let token = self.peek();
        match token.kind {
            TokenKind::Number => {
                self.advance()?;
                let text = token.span.text(self.source);
                let n = text.parse::<i32>().map_err(|_| {
                    Fault::compile(
                        errors::NUMBER_TOO_LARGE,
                        self.line_of(token),
                        format!("Number '{}' does not fit in 32 bits", text),
                    )
                })?;
                Ok(Expr::Number(n))
            }

            TokenKind::String => {
                self.advance()?;
                let text = token.span.text(self.source);
                let id = self.intern(&text[1..text.len() - 1], token)?;
                Ok(Expr::Str(id))
            }

            TokenKind::Keyword if token.is_keyword(Keyword::True) => {
                self.advance()?;
                Ok(Expr::Number(1))
            }

            TokenKind::Keyword if token.is_keyword(Keyword::False) => {
                self.advance()?;
                Ok(Expr::Number(0))
            }

            TokenKind::Identifier => {
                self.advance()?;
                let name = self.intern(token.span.text(self.source), token)?;
                if !self.eat(TokenKind::LParen)? {
                    return Ok(Expr::Var(name));
                }
                let args = self.parse_args()?;
                Ok(Expr::Call { name, args })
            }

            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }

            _ => Err(self.unexpected("an expression")),
        }
    }

    /// Arguments after an opening `(`, through the closing `)`
    fn parse_args(&mut self) -> Result<Vec<Expr>, Fault> {
        let mut args = Vec::new();
        if self.eat(TokenKind::RParen)? {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if self.eat(TokenKind::Comma)? {
                continue;
            }
            self.expect(TokenKind::RParen, "',' or ')'")?;
            return Ok(args);
        }
    }
}
