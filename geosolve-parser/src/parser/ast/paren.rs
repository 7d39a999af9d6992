use crate::{
    parser::{ast::expr::Expr, error::UnclosedParenthesis, Parser, Precedence},
    tokenizer::TokenKind,
};
use geosolve_error::Error;
use std::{fmt, ops::Range};

/// A parenthesized expression. A [`Paren`] can only contain a single expression.
///
/// A parenthesis left open at the end of the input is treated as closed there.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Paren {
    /// The inner expression.
    pub expr: Box<Expr>,

    /// The region of the source code that this [`Paren`] was parsed from.
    pub span: Range<usize>,
}

impl Paren {
    /// Returns the span of the parenthesized expression.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the innermost expression in the parenthesized expression.
    pub fn innermost(&self) -> &Expr {
        let mut inner = &*self.expr;
        while let Expr::Paren(paren) = inner {
            inner = &paren.expr;
        }
        inner
    }

    /// Parses the remainder of a parenthesized expression, after its opening parenthesis at
    /// `open_start` has been consumed.
    pub(crate) fn parse_rest(input: &mut Parser<'_>, open_start: usize) -> Result<Self, Error> {
        let expr = Expr::parse_with_precedence(input, Precedence::Any)?;
        let end = close_paren(input, expr.span().end)?;
        Ok(Self { expr: Box::new(expr), span: open_start..end })
    }
}

/// Consumes the closing parenthesis that should be the next token, returning where the
/// parenthesized region ends. At the end of the input, the parenthesis is implicitly closed at
/// `end_of_contents`.
pub(crate) fn close_paren(input: &mut Parser<'_>, end_of_contents: usize) -> Result<usize, Error> {
    match input.peek().map(|token| token.kind) {
        None => Ok(end_of_contents),
        Some(TokenKind::CloseParen) => Ok(input.next_token()?.span.end),
        Some(_) => Err(input.error(UnclosedParenthesis)),
    }
}

impl fmt::Display for Paren {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({})", self.expr)
    }
}
