use crate::{
    parser::{
        ast::{expr::Expr, literal::LitSym},
        error::{MissingArgument, UnclosedParenthesis},
        Parser,
        Precedence,
    },
    tokenizer::TokenKind,
};
use geosolve_error::Error;
use std::{fmt, ops::Range};

/// A function call, such as `sin(x)` or `log(x, 2)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    /// The name of the function to call.
    pub name: LitSym,

    /// The arguments to the function.
    pub args: Vec<Expr>,

    /// The region of the source code that this function call was parsed from.
    pub span: Range<usize>,

    /// The span of the parentheses that surround the arguments.
    pub paren_span: Range<usize>,
}

impl Call {
    /// Returns the span of the function call.
    pub fn span(&self) -> Range<usize> {
        self.span.clone()
    }

    /// Returns a set of two spans, where the first is the span of the function name and the
    /// second is the span of the outer parentheses.
    pub fn outer_span(&self) -> [Range<usize>; 2] {
        [self.name.span.clone(), self.paren_span.clone()]
    }

    /// Parses the argument list of a call to `name`. The next token must be the opening
    /// parenthesis.
    pub(crate) fn parse_args(input: &mut Parser<'_>, name: LitSym) -> Result<Self, Error> {
        let open = input.next_token()?;
        let mut args = Vec::new();
        let mut end = open.span.end;

        loop {
            match input.peek().map(|token| token.kind) {
                None => break,
                Some(TokenKind::CloseParen) if args.is_empty() => {
                    end = input.next_token()?.span.end;
                    break;
                },
                Some(TokenKind::Comma | TokenKind::CloseParen) => {
                    return Err(input.error(MissingArgument));
                },
                Some(_) => {},
            }

            let arg = Expr::parse_with_precedence(input, Precedence::Any)?;
            end = arg.span().end;
            args.push(arg);

            match input.peek().map(|token| token.kind) {
                None => break,
                Some(TokenKind::Comma) => {
                    input.next_token()?;
                },
                Some(TokenKind::CloseParen) => {
                    end = input.next_token()?.span.end;
                    break;
                },
                Some(_) => return Err(input.error(UnclosedParenthesis)),
            }
        }

        Ok(Self {
            span: name.span.start..end,
            paren_span: open.span.start..end,
            name,
            args,
        })
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}(", self.name.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> Result<Expr, Error> {
        Parser::new(source).try_parse_full::<Expr>()
    }

    #[test]
    fn no_arguments() {
        let Ok(Expr::Call(call)) = parse("f()") else {
            panic!("expected call");
        };
        assert!(call.args.is_empty());
        assert_eq!(call.span, 0..3);
    }

    #[test]
    fn spaced_call() {
        assert_eq!(parse("sin (x)").unwrap().to_string(), "sin(x)");
    }

    #[test]
    fn missing_argument() {
        let err = parse("log(x,, 2)").unwrap_err();
        assert_eq!(err.message(), "missing function argument");
        assert_eq!(err.spans, vec![6..7]);

        assert!(parse("log(x,)").is_err());
    }

    #[test]
    fn unclosed_with_trailing_comma_arg() {
        assert_eq!(parse("log(8, 2").unwrap().to_string(), "log(8, 2)");
    }

    #[test]
    fn junk_inside_call() {
        let err = parse("sin(x = 1)").unwrap_err();
        assert_eq!(err.message(), "missing closing parenthesis");
    }
}
