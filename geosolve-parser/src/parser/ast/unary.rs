use crate::parser::{
    ast::expr::Expr,
    op::{UnaryOp, UnaryOpKind},
    Parser,
    Precedence,
};
use geosolve_error::Error;
use std::{fmt, ops::Range};

/// A prefix unary operation, such as `-x`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unary {
    /// The operand of the unary operation.
    pub operand: Box<Expr>,

    /// The unary operator.
    pub op: UnaryOp,

    /// The region of the source code that this unary operation was parsed from.
    pub span: Range<usize>,
}

impl Unary {
    /// Returns the span of the unary operation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Parses a unary operation, or a primary expression if the next token is not a unary
    /// operator.
    ///
    /// The operand of a unary operator extends over exponentiation only, so `-x**2` is
    /// `-(x**2)` while `-2x` is `(-2)*x`.
    pub(crate) fn parse_or_lower(input: &mut Parser<'_>) -> Result<Expr, Error> {
        let kind = input.peek().and_then(|token| UnaryOpKind::from_token(token.kind));
        let Some(kind) = kind else {
            return Expr::parse_primary(input);
        };

        let token = input.next_token()?;
        let op = UnaryOp { kind, span: token.span };
        let operand = Expr::parse_with_precedence(input, op.precedence())?;
        let span = op.span.start..operand.span().end;
        Ok(Expr::Unary(Self { operand: Box::new(operand), op, span }))
    }
}

impl fmt::Display for Unary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.op, self.operand)
    }
}
