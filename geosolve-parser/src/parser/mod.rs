pub mod ast;
pub mod error;
pub mod op;

use geosolve_error::{Error, ErrorKind};
use super::tokenizer::{tokenize_complete, Token, TokenKind};
use std::ops::Range;

/// Deepest nesting of parentheses, calls, unary operators and right-associative operators that
/// the parser accepts.
pub const MAX_DEPTH: usize = 128;

/// Most binary operators, implicit multiplication included, that the parser accepts in one input.
pub const MAX_OPERATORS: usize = 1024;

/// Options that relax the grammar accepted by the [`Parser`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParseOptions {
    /// Accept `^` as the exponentiation operator, in addition to `**`.
    ///
    /// When disabled, `^` is rejected with an error suggesting `**`.
    pub caret_power: bool,
}

impl ParseOptions {
    /// Options for the permissive grammar, used when interpreting raw user text.
    pub fn permissive() -> Self {
        Self { caret_power: true }
    }
}

/// A high-level parser for the expression grammar. This is the type to use to parse an arbitrary
/// piece of text into an abstract syntax tree.
#[derive(Debug, Clone)]
pub struct Parser<'source> {
    /// The tokens that this parser is currently parsing.
    tokens: Box<[Token<'source>]>,

    /// The index of the **next** token to be parsed.
    cursor: usize,

    /// Grammar relaxations in effect.
    options: ParseOptions,

    /// How many nested expressions are currently being parsed.
    depth: usize,

    /// How many binary operators have been parsed.
    operators: usize,
}

impl<'source> Parser<'source> {
    /// Create a new parser for the given source, using the strict grammar.
    pub fn new(source: &'source str) -> Self {
        Self::with_options(source, ParseOptions::default())
    }

    /// Create a new parser for the given source with the given grammar options.
    pub fn with_options(source: &'source str, options: ParseOptions) -> Self {
        Self {
            tokens: tokenize_complete(source),
            cursor: 0,
            options,
            depth: 0,
            operators: 0,
        }
    }

    /// The grammar options in effect.
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Creates an error that points at the next non-whitespace token, or the end of the source
    /// code if there are no tokens left.
    pub fn error(&self, kind: impl ErrorKind + 'static) -> Error {
        Error::new(vec![self.span()], kind)
    }

    /// Returns a span pointing at the end of the source code.
    pub fn eof_span(&self) -> Range<usize> {
        self.tokens.last().map_or(0..0, |token| token.span.end..token.span.end)
    }

    /// Returns the span of the next non-whitespace token, or the end of the source code if there
    /// are no tokens left.
    pub fn span(&self) -> Range<usize> {
        self.peek().map_or(self.eof_span(), |token| token.span.clone())
    }

    /// Returns the next non-whitespace token without advancing the cursor.
    pub fn peek(&self) -> Option<&Token<'source>> {
        self.tokens[self.cursor..].iter().find(|token| !token.is_whitespace())
    }

    /// Returns true if the next non-whitespace token is of the given kind.
    pub fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek().map_or(false, |token| token.kind == kind)
    }

    /// Returns the next token to be parsed, then advances the cursor. Whitespace tokens are
    /// skipped.
    ///
    /// Returns an EOF error if there are no more tokens.
    pub fn next_token(&mut self) -> Result<Token<'source>, Error> {
        while self.cursor < self.tokens.len() {
            let token = &self.tokens[self.cursor];
            self.cursor += 1;
            if !token.is_whitespace() {
                return Ok(token.clone());
            }
        }

        Err(self.error(error::UnexpectedEof))
    }

    /// Parses a nested expression with `f`, failing if the nesting limit is reached.
    pub(crate) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(error::TooDeeplyNested));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Counts a parsed binary operator, failing if the operator limit is reached.
    pub(crate) fn count_operator(&mut self, span: Range<usize>) -> Result<(), Error> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(Error::new(vec![span], error::TooManyOperators));
        }
        Ok(())
    }

    /// Advances the cursor past any whitespace.
    fn skip_whitespace(&mut self) {
        while self.tokens.get(self.cursor).map_or(false, Token::is_whitespace) {
            self.cursor += 1;
        }
    }

    /// Speculatively parses a value from the given stream of tokens, automatically backtracking
    /// the cursor position if parsing fails.
    ///
    /// If parsing is successful, the stream is advanced past the consumed tokens and the parsed
    /// value is returned. Otherwise, the stream is left unchanged and an error is returned.
    pub fn try_parse<T: Parse<'source>>(&mut self) -> Result<T, Error> {
        let start = self.cursor;
        match T::parse(self) {
            Ok(value) => Ok(value),
            err => {
                self.cursor = start;
                err
            },
        }
    }

    /// Attempts to parse a value from the given stream of tokens. All the tokens must be consumed
    /// by the parser; if not, an error pointing at the unparsed remainder is returned.
    pub fn try_parse_full<T: Parse<'source>>(&mut self) -> Result<T, Error> {
        let value = self.try_parse::<T>()?;
        self.skip_whitespace();
        if self.cursor == self.tokens.len() {
            Ok(value)
        } else {
            let start = self.span().start;
            Err(Error::new(vec![start..self.eof_span().end], error::ExpectedEof))
        }
    }
}

/// Any type that can be parsed from a source of tokens.
pub trait Parse<'source>: Sized {
    /// Parses a value from the given stream of tokens, advancing the stream past the consumed
    /// tokens if parsing is successful.
    fn parse(input: &mut Parser<'source>) -> Result<Self, Error>;
}

/// The associativity of a binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// `a op b op c` is evaluated as `(a op b) op c`.
    Left,

    /// `a op b op c` is evaluated as `a op (b op c)`.
    Right,
}

/// The precedence of an operation, in order from lowest precedence (evaluated last) to highest
/// precedence (evaluated first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    /// Any precedence.
    Any,

    /// Precedence of addition (`+`) and subtraction (`-`), which separate terms.
    Term,

    /// Precedence of multiplication (`*`) and division (`/`), which separate factors. Implicit
    /// multiplication shares this precedence.
    Factor,

    /// Precedence of unary negation (`-`) and unary plus (`+`).
    Neg,

    /// Precedence of exponentiation (`**`).
    Exp,
}

impl Precedence {
    /// Returns the next-higher precedence, used to parse the right-hand side of a
    /// left-associative operator.
    pub fn tighter(self) -> Self {
        match self {
            Self::Any => Self::Term,
            Self::Term => Self::Factor,
            Self::Factor => Self::Neg,
            Self::Neg | Self::Exp => Self::Exp,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    use ast::{Binary, Call, Expr, LitFloat, LitInt, LitSym, Literal, Paren, Unary};
    use op::{BinOp, BinOpKind, UnaryOp, UnaryOpKind};

    fn parse(source: &str) -> Expr {
        Parser::new(source).try_parse_full::<Expr>().unwrap()
    }

    fn parse_err(source: &str) -> Error {
        Parser::new(source).try_parse_full::<Expr>().unwrap_err()
    }

    #[test]
    fn literal_int() {
        assert_eq!(parse("16"), Expr::Literal(Literal::Integer(LitInt {
            value: "16".to_string(),
            span: 0..2,
        })));
    }

    #[test]
    fn literal_float() {
        assert_eq!(parse("  .5 "), Expr::Literal(Literal::Float(LitFloat {
            value: ".5".to_string(),
            span: 2..4,
        })));
    }

    #[test]
    fn precedence_of_terms_and_factors() {
        assert_eq!(parse("1 + 2*x"), Expr::Binary(Binary {
            lhs: Box::new(Expr::Literal(Literal::Integer(LitInt { value: "1".to_string(), span: 0..1 }))),
            op: BinOp { kind: BinOpKind::Add, implicit: false, span: 2..3 },
            rhs: Box::new(Expr::Binary(Binary {
                lhs: Box::new(Expr::Literal(Literal::Integer(LitInt { value: "2".to_string(), span: 4..5 }))),
                op: BinOp { kind: BinOpKind::Mul, implicit: false, span: 5..6 },
                rhs: Box::new(Expr::Literal(Literal::Symbol(LitSym { name: "x".to_string(), span: 6..7 }))),
                span: 4..7,
            })),
            span: 0..7,
        }));
    }

    #[test]
    fn exponent_is_right_associative() {
        let Expr::Binary(Binary { lhs, rhs, .. }) = parse("2**3**2") else {
            panic!("expected binary expression");
        };
        assert_eq!(lhs.to_string(), "2");
        assert_eq!(rhs.to_string(), "3**2");
    }

    #[test]
    fn negation_binds_looser_than_exponent() {
        let expr = parse("-x**2");
        let Expr::Unary(Unary { op: UnaryOp { kind: UnaryOpKind::Neg, .. }, operand, .. }) = expr else {
            panic!("expected negation, got {:?}", expr);
        };
        assert!(matches!(*operand, Expr::Binary(Binary { op: BinOp { kind: BinOpKind::Exp, .. }, .. })));
    }

    #[test]
    fn implicit_multiplication() {
        let expr = parse("2x sin(x)");
        assert_eq!(expr.to_string(), "2*x*sin(x)");

        let Expr::Binary(Binary { op, lhs, .. }) = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(op.kind, BinOpKind::Mul);
        assert!(op.implicit);
        assert!(matches!(*lhs, Expr::Binary(Binary { op: BinOp { implicit: true, .. }, .. })));
    }

    #[test]
    fn negative_coefficient_before_implicit_product() {
        let Expr::Binary(Binary { lhs, op, .. }) = parse("-2x") else {
            panic!("expected binary expression");
        };
        assert!(op.implicit);
        assert_eq!(lhs.to_string(), "-2");
    }

    #[test]
    fn call_with_arguments() {
        assert_eq!(parse("log(x, 2)"), Expr::Call(Call {
            name: LitSym { name: "log".to_string(), span: 0..3 },
            args: vec![
                Expr::Literal(Literal::Symbol(LitSym { name: "x".to_string(), span: 4..5 })),
                Expr::Literal(Literal::Integer(LitInt { value: "2".to_string(), span: 7..8 })),
            ],
            span: 0..9,
            paren_span: 3..9,
        }));
    }

    #[test]
    fn nested_calls() {
        assert_eq!(parse("sin(radians(30))").to_string(), "sin(radians(30))");
    }

    #[test]
    fn unclosed_parens_are_closed_at_end() {
        assert_eq!(parse("sin(x").to_string(), "sin(x)");
        assert_eq!(parse("2*(x + 1").to_string(), "2*(x + 1)");
        assert_eq!(parse("((1"), Expr::Paren(Paren {
            expr: Box::new(Expr::Paren(Paren {
                expr: Box::new(Expr::Literal(Literal::Integer(LitInt { value: "1".to_string(), span: 2..3 }))),
                span: 1..3,
            })),
            span: 0..3,
        }));
    }

    #[test]
    fn caret_rejected_in_strict_mode() {
        let err = parse_err("x^2");
        assert_eq!(err.spans, vec![1..2]);
        assert!(err.message().contains('^'));
    }

    #[test]
    fn caret_accepted_in_permissive_mode() {
        let expr = Parser::with_options("x^2 + 1", ParseOptions::permissive())
            .try_parse_full::<Expr>()
            .unwrap();
        assert_eq!(expr.to_string(), "x**2 + 1");
    }

    #[test]
    fn empty_input() {
        let err = parse_err("   ");
        assert_eq!(err.message(), "unexpected end of input");
    }

    #[test]
    fn trailing_garbage() {
        let err = parse_err("x + 1 = 2");
        assert_eq!(err.spans, vec![6..9]);
        assert_eq!(err.message(), "expected end of input");
    }

    #[test]
    fn stray_symbol() {
        let err = parse_err("x + $");
        assert_eq!(err.spans, vec![4..5]);
        assert_eq!(err.message(), "unexpected token `$`");
    }

    #[test]
    fn nesting_limit() {
        let deep = format!("{}x{}", "(".repeat(20000), ")".repeat(20000));
        let err = parse_err(&deep);
        assert_eq!(err.message(), "expression is too deeply nested");
        assert_eq!(err.spans, vec![MAX_DEPTH..MAX_DEPTH + 1]);

        assert!(parse_err(&format!("{}x", "-".repeat(20000))).message().contains("nested"));
        assert!(parse_err(&format!("x{}", "**x".repeat(5000))).message().contains("nested"));

        let shallow = format!("{}x{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&shallow).innermost().to_string(), "x");
        assert_eq!(parse(&format!("x{}", " + x".repeat(500))).span(), 0..2001);
    }

    #[test]
    fn operator_limit() {
        let long = format!("x{}", " + x".repeat(MAX_OPERATORS + 1));
        let err = parse_err(&long);
        assert_eq!(err.message(), "expression is too long");
        let start = 2 + 4 * MAX_OPERATORS;
        assert_eq!(err.spans, vec![start..start + 1]);

        let nested = format!("{}x{}", "(x + ".repeat(50), ")".repeat(50));
        assert!(parse(&nested).to_string().starts_with("(x + (x + "));

        // operators are counted across every level of nesting
        let level = format!("({}", "x + ".repeat(40));
        let nested = format!("{}x{}", level.repeat(30), ")".repeat(30));
        assert_eq!(parse_err(&nested).message(), "expression is too long");
    }

    #[test]
    fn dangling_operator() {
        let err = parse_err("x +");
        assert_eq!(err.message(), "unexpected end of input");
        assert_eq!(err.spans, vec![3..3]);
    }
}
