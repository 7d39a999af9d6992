use crate::{
    parser::{
        ast::{expr::Expr, unary::Unary},
        error::CaretExponent,
        op::{BinOp, BinOpKind},
        Associativity,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use geosolve_error::Error;
use std::{fmt, ops::Range};

/// A binary operation, such as `1 + 2`, or the implicit product in `2x`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binary {
    /// The left-hand side of the binary operation.
    pub lhs: Box<Expr>,

    /// The operator of the binary operation.
    pub op: BinOp,

    /// The right-hand side of the binary operation.
    pub rhs: Box<Expr>,

    /// The region of the source code that this binary operation was parsed from.
    pub span: Range<usize>,
}

impl Binary {
    /// Returns the span of the binary operation.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns the operator that joins `lhs` to whatever follows it, without consuming it.
    ///
    /// A token that begins an operand is treated as an implicit multiplication.
    fn peek_op(input: &Parser<'_>, lhs: &Expr) -> Result<Option<BinOp>, Error> {
        let Some(token) = input.peek() else {
            return Ok(None);
        };

        if let Some(kind) = BinOpKind::from_token(token.kind, input.options()) {
            return Ok(Some(BinOp { kind, implicit: false, span: token.span.clone() }));
        }

        match token.kind {
            TokenKind::Caret => Err(input.error(CaretExponent)),
            kind if kind.starts_operand() => Ok(Some(BinOp {
                kind: BinOpKind::Mul,
                implicit: true,
                span: lhs.span().end..token.span.start,
            })),
            _ => Ok(None),
        }
    }

    /// Parses a sequence of binary operations whose operators bind at least as tightly as
    /// `min_precedence`, using precedence climbing.
    pub(crate) fn parse_expr(input: &mut Parser<'_>, min_precedence: Precedence) -> Result<Expr, Error> {
        input.nested(|input| Self::parse_chain(input, min_precedence))
    }

    fn parse_chain(input: &mut Parser<'_>, min_precedence: Precedence) -> Result<Expr, Error> {
        let mut lhs = Unary::parse_or_lower(input)?;

        while let Some(op) = Self::peek_op(input, &lhs)? {
            if op.precedence() < min_precedence {
                break;
            }

            input.count_operator(op.span.clone())?;

            if !op.implicit {
                input.next_token()?;
            }

            let rhs_precedence = match op.associativity() {
                Associativity::Left => op.precedence().tighter(),
                Associativity::Right => op.precedence(),
            };
            let rhs = Self::parse_expr(input, rhs_precedence)?;
            let span = lhs.span().start..rhs.span().end;
            lhs = Expr::Binary(Self { lhs: Box::new(lhs), op, rhs: Box::new(rhs), span });
        }

        Ok(lhs)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}", self.lhs, self.op, self.rhs)
    }
}
