//! Tokenizer and parser for the expression grammar accepted by the algebra engine and the
//! numeric evaluator.
//!
//! The grammar is deliberately strict: exponentiation is written `**`, function calls use
//! parentheses, and numbers are plain decimal literals. Free-form user text is expected to go
//! through a normalization pass before it reaches this parser. Two tolerances are built in:
//! juxtaposed operands are multiplied (`x**2 sin(x)`), and parentheses left open at the end of
//! the input are closed (`sin(x` parses as `sin(x)`).

pub mod parser;
pub mod tokenizer;
