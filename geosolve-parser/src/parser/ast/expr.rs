use crate::{
    parser::{
        ast::{
            binary::Binary,
            call::Call,
            literal::{LitFloat, LitInt, LitSym, Literal},
            paren::Paren,
            unary::Unary,
        },
        error::UnexpectedToken,
        Parse,
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use geosolve_error::Error;
use std::{fmt, ops::Range};

/// Represents any kind of expression in the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    Literal(Literal),
    Call(Call),
    Paren(Paren),
    Unary(Unary),
    Binary(Binary),
}

impl Expr {
    /// Returns the span of the expression.
    pub fn span(&self) -> Range<usize> {
        match self {
            Expr::Literal(literal) => literal.span(),
            Expr::Call(call) => call.span(),
            Expr::Paren(paren) => paren.span(),
            Expr::Unary(unary) => unary.span(),
            Expr::Binary(binary) => binary.span(),
        }
    }

    /// If this expression is an [`Expr::Paren`], returns the innermost expression in the
    /// parenthesized expression. Otherwise, returns `self`.
    pub fn innermost(&self) -> &Expr {
        match self {
            Expr::Paren(paren) => paren.innermost(),
            expr => expr,
        }
    }

    /// Calls `f` on every symbol in the expression that is not the name of a called function.
    pub fn visit_symbols<'a>(&'a self, f: &mut impl FnMut(&'a LitSym)) {
        match self {
            Expr::Literal(Literal::Symbol(sym)) => f(sym),
            Expr::Literal(_) => {},
            Expr::Call(call) => call.args.iter().for_each(|arg| arg.visit_symbols(f)),
            Expr::Paren(paren) => paren.expr.visit_symbols(f),
            Expr::Unary(unary) => unary.operand.visit_symbols(f),
            Expr::Binary(binary) => {
                binary.lhs.visit_symbols(f);
                binary.rhs.visit_symbols(f);
            },
        }
    }

    /// Parses an expression whose binary operators bind at least as tightly as `precedence`.
    pub(crate) fn parse_with_precedence(input: &mut Parser<'_>, precedence: Precedence) -> Result<Self, Error> {
        Binary::parse_expr(input, precedence)
    }

    /// Parses a primary expression: a literal, a function call, or a parenthesized expression.
    pub(crate) fn parse_primary(input: &mut Parser<'_>) -> Result<Self, Error> {
        let token = input.next_token()?;
        match token.kind {
            TokenKind::Int => Ok(Expr::Literal(Literal::Integer(LitInt {
                value: token.lexeme.to_owned(),
                span: token.span,
            }))),
            TokenKind::Float => Ok(Expr::Literal(Literal::Float(LitFloat {
                value: token.lexeme.to_owned(),
                span: token.span,
            }))),
            TokenKind::Name => {
                let name = LitSym { name: token.lexeme.to_owned(), span: token.span };
                if input.peek_is(TokenKind::OpenParen) {
                    Ok(Expr::Call(Call::parse_args(input, name)?))
                } else {
                    Ok(Expr::Literal(Literal::Symbol(name)))
                }
            },
            TokenKind::OpenParen => Ok(Expr::Paren(Paren::parse_rest(input, token.span.start)?)),
            _ => Err(Error::new(vec![token.span], UnexpectedToken { found: token.lexeme.to_owned() })),
        }
    }
}

impl<'source> Parse<'source> for Expr {
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error> {
        Self::parse_with_precedence(input, Precedence::Any)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(literal) => literal.fmt(f),
            Expr::Call(call) => call.fmt(f),
            Expr::Paren(paren) => paren.fmt(f),
            Expr::Unary(unary) => unary.fmt(f),
            Expr::Binary(binary) => binary.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_symbols_skip_function_names() {
        let expr = Parser::new("sin(x) + y*pi").try_parse_full::<Expr>().unwrap();
        let mut names = Vec::new();
        expr.visit_symbols(&mut |sym| names.push(sym.name.as_str()));
        assert_eq!(names, ["x", "y", "pi"]);
    }

    #[test]
    fn innermost_strips_parens() {
        let expr = Parser::new("((x))").try_parse_full::<Expr>().unwrap();
        assert_eq!(expr.innermost().to_string(), "x");
    }
}
