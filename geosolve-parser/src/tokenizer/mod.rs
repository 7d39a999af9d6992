pub mod token;

use logos::{Lexer, Logos};
pub use token::{Token, TokenKind};

/// Returns an iterator over the token kinds produced by the tokenizer.
pub fn tokenize(input: &str) -> Lexer<TokenKind> {
    TokenKind::lexer(input)
}

/// Returns an owned array containing all of the tokens produced by the tokenizer. This allows us
/// to backtrack in case of an error.
pub fn tokenize_complete(input: &str) -> Box<[Token]> {
    let mut lexer = tokenize(input);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        tokens.push(Token {
            span: lexer.span(),
            kind: result.unwrap_or(TokenKind::Symbol),
            lexeme: lexer.slice(),
        });
    }

    tokens.into_boxed_slice()
}

/// Returns true if the input contains a name token equal to `name`, ignoring ASCII case.
///
/// This is a lexical check: `exp(2)` does not mention `x`, while `2x` and `X + 1` do.
pub fn mentions_name(input: &str, name: &str) -> bool {
    let mut lexer = tokenize(input);
    while let Some(result) = lexer.next() {
        if result == Ok(TokenKind::Name) && lexer.slice().eq_ignore_ascii_case(name) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compares the tokens produced by the tokenizer to the raw expected tokens.
    fn compare_tokens<'source, const N: usize>(input: &'source str, expected: [(TokenKind, &'source str); N]) {
        let mut lexer = tokenize(input);

        for (expected_kind, expected_lexeme) in expected.into_iter() {
            assert_eq!(lexer.next(), Some(Ok(expected_kind)));
            assert_eq!(lexer.slice(), expected_lexeme);
        }

        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn basic_expr() {
        compare_tokens(
            "1 + 2",
            [
                (TokenKind::Int, "1"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Add, "+"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Int, "2"),
            ],
        );
    }

    #[test]
    fn power_and_call() {
        compare_tokens(
            "x**2*sin(radians(4.5))",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Pow, "**"),
                (TokenKind::Int, "2"),
                (TokenKind::Mul, "*"),
                (TokenKind::Name, "sin"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Name, "radians"),
                (TokenKind::OpenParen, "("),
                (TokenKind::Float, "4.5"),
                (TokenKind::CloseParen, ")"),
                (TokenKind::CloseParen, ")"),
            ],
        );
    }

    #[test]
    fn stray_symbols() {
        compare_tokens(
            "x^^ = ∫",
            [
                (TokenKind::Name, "x"),
                (TokenKind::Caret, "^"),
                (TokenKind::Caret, "^"),
                (TokenKind::Whitespace, " "),
                (TokenKind::Eq, "="),
                (TokenKind::Whitespace, " "),
                (TokenKind::Symbol, "∫"),
            ],
        );
    }

    #[test]
    fn name_mentions() {
        assert!(mentions_name("3*x + 1", "x"));
        assert!(mentions_name("X**2", "x"));
        assert!(!mentions_name("exp(2) + max", "x"));
        assert!(!mentions_name("", "x"));
    }
}
