//! The narrow interface the query pipeline uses to talk to an algebra engine, and
//! [`SymbolicEngine`], the built-in implementation backed by [`crate::symbolic`].

use geosolve_error::Error;
use geosolve_parser::parser::{ast::Expr, op::BinOpKind, ParseOptions, Parser};
use std::{fmt::{Debug, Display}, ops::Range};
use tracing::debug;
use crate::symbolic::{self, error::DivisionByZero, poly::Poly, SymExpr};

/// An expression produced by an [`AlgebraEngine`].
pub trait EngineExpr: Clone + Debug + Display {
    /// Returns true if the expression has no free variables.
    fn is_numeric(&self) -> bool;

    /// Evaluates the expression to a real float, if it is numeric and real.
    fn eval_float(&self) -> Option<f64>;

    /// Evaluates the expression to the real and imaginary parts of a complex float, if it is
    /// numeric.
    fn eval_complex(&self) -> Option<(f64, f64)>;
}

/// A symbolic algebra engine.
///
/// Every operation reports failure through [`Error`], so callers can wrap the message with the
/// context of the operation that failed.
pub trait AlgebraEngine {
    /// The engine's expression type.
    type Expr: EngineExpr;

    /// Parses a normalized expression with the engine's strict grammar.
    fn parse(&self, input: &str) -> Result<Self::Expr, Error>;

    /// Interprets loosely formatted input as an expression. Used as a last resort when
    /// normalized input could not be parsed.
    fn interpret(&self, input: &str) -> Result<Self::Expr, Error>;

    /// Returns `lhs - rhs`, the expression whose roots are the solutions of `lhs = rhs`.
    fn difference(&self, lhs: &Self::Expr, rhs: &Self::Expr) -> Self::Expr;

    /// Finds the values of `var` for which `expr` is zero.
    fn solve(&self, expr: &Self::Expr, var: &str) -> Result<Vec<Self::Expr>, Error>;

    /// Computes an antiderivative of `expr` with respect to `var`.
    fn integrate(&self, expr: &Self::Expr, var: &str) -> Result<Self::Expr, Error>;

    /// Computes the derivative of `expr` with respect to `var`.
    fn differentiate(&self, expr: &Self::Expr, var: &str) -> Result<Self::Expr, Error>;

    /// Factors `expr`.
    fn factor(&self, expr: &Self::Expr) -> Result<Self::Expr, Error>;

    /// Simplifies `expr`.
    fn simplify(&self, expr: &Self::Expr) -> Result<Self::Expr, Error>;
}

impl EngineExpr for SymExpr {
    fn is_numeric(&self) -> bool {
        SymExpr::is_numeric(self)
    }

    fn eval_float(&self) -> Option<f64> {
        SymExpr::eval_float(self)
    }

    fn eval_complex(&self) -> Option<(f64, f64)> {
        SymExpr::eval_complex(self)
    }
}

/// Finds a division whose divisor is zero, or a power of zero with a negative exponent, returning
/// the span of the offending part. Divisors are checked after canonicalization, so `1/(x - x)` is
/// found too.
fn zero_divisor(ast: &Expr) -> Option<Range<usize>> {
    match ast {
        Expr::Literal(_) => None,
        Expr::Call(call) => call.args.iter().find_map(zero_divisor),
        Expr::Paren(paren) => zero_divisor(&paren.expr),
        Expr::Unary(unary) => zero_divisor(&unary.operand),
        Expr::Binary(binary) => zero_divisor(&binary.lhs)
            .or_else(|| zero_divisor(&binary.rhs))
            .or_else(|| match binary.op.kind {
                BinOpKind::Div if SymExpr::from(&*binary.rhs).is_zero() => Some(binary.rhs.span()),
                BinOpKind::Exp if SymExpr::from(&*binary.lhs).is_zero()
                    && SymExpr::from(&*binary.rhs).as_number().map_or(false, |n| *n < 0) => {
                    Some(binary.span())
                },
                _ => None,
            }),
    }
}

/// Rejects an expression that divides by zero.
fn check_defined(expr: SymExpr) -> Result<SymExpr, Error> {
    if expr.divides_by_zero() {
        return Err(Error::spanless(DivisionByZero));
    }
    Ok(expr)
}

/// The built-in algebra engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicEngine;

impl SymbolicEngine {
    fn parse_with(&self, input: &str, options: ParseOptions) -> Result<SymExpr, Error> {
        let ast = Parser::with_options(input, options).try_parse_full::<Expr>()?;
        if let Some(span) = zero_divisor(&ast) {
            return Err(Error::new(vec![span], DivisionByZero));
        }
        let expr = SymExpr::from(&ast);
        if expr.divides_by_zero() {
            return Err(Error::new(vec![ast.span()], DivisionByZero));
        }
        debug!(%input, %expr, "parsed expression");
        Ok(expr)
    }
}

impl AlgebraEngine for SymbolicEngine {
    type Expr = SymExpr;

    fn parse(&self, input: &str) -> Result<SymExpr, Error> {
        self.parse_with(input, ParseOptions::default())
    }

    fn interpret(&self, input: &str) -> Result<SymExpr, Error> {
        self.parse_with(input, ParseOptions::permissive())
    }

    fn difference(&self, lhs: &SymExpr, rhs: &SymExpr) -> SymExpr {
        lhs.clone() - rhs.clone()
    }

    fn solve(&self, expr: &SymExpr, var: &str) -> Result<Vec<SymExpr>, Error> {
        let expr = check_defined(expr.clone())?;
        let solutions = symbolic::solve(&expr, var)?
            .into_iter()
            .map(check_defined)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(%expr, var, count = solutions.len(), "solved equation");
        Ok(solutions)
    }

    fn integrate(&self, expr: &SymExpr, var: &str) -> Result<SymExpr, Error> {
        let expr = check_defined(expr.clone())?;
        check_defined(symbolic::integrate(&expr, var)?)
    }

    fn differentiate(&self, expr: &SymExpr, var: &str) -> Result<SymExpr, Error> {
        let expr = check_defined(expr.clone())?;
        check_defined(symbolic::derivative(&expr, var)?)
    }

    fn factor(&self, expr: &SymExpr) -> Result<SymExpr, Error> {
        let expr = check_defined(expr.clone())?;
        check_defined(symbolic::factor(&expr))
    }

    fn simplify(&self, expr: &SymExpr) -> Result<SymExpr, Error> {
        let simplified = check_defined(symbolic::simplify(expr))?;

        // a polynomial in one variable is shown expanded if that is shorter
        let symbols = simplified.free_symbols();
        if let Some(var) = symbols.iter().next().filter(|_| symbols.len() == 1) {
            if let Some(poly) = Poly::from_expr(&simplified, var) {
                let expanded = poly.to_expr(var);
                if expanded.complexity() < simplified.complexity() {
                    debug!(%simplified, %expanded, "expanded polynomial");
                    return Ok(expanded);
                }
            }
        }

        Ok(simplified)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    fn simplified(source: &str) -> String {
        let engine = SymbolicEngine;
        engine.simplify(&engine.parse(source).unwrap()).unwrap().to_string()
    }

    #[test]
    fn strict_and_permissive_grammar() {
        let engine = SymbolicEngine;
        assert!(engine.parse("x^2").is_err());
        assert_eq!(engine.interpret("x^2").unwrap().to_string(), "x**2");
    }

    #[test]
    fn difference_of_sides() {
        let engine = SymbolicEngine;
        let lhs = engine.parse("x**2").unwrap();
        let rhs = engine.parse("4").unwrap();
        let roots = engine.solve(&engine.difference(&lhs, &rhs), "x").unwrap();
        assert_eq!(roots, vec![SymExpr::number(-2), SymExpr::number(2)]);
    }

    #[test]
    fn simplify_expands_when_shorter() {
        assert_eq!(simplified("(x + 1)*(x - 1)"), "x**2 - 1");
        assert_eq!(simplified("(x + 1)**2"), "(x + 1)**2");
        assert_eq!(simplified("x + x + y"), "2*x + y");
    }

    #[test]
    fn numeric_results() {
        let engine = SymbolicEngine;
        let expr = engine.simplify(&engine.parse("sqrt(2)*pi").unwrap()).unwrap();
        assert!(EngineExpr::is_numeric(&expr));
        assert_float_absolute_eq!(EngineExpr::eval_float(&expr).unwrap(), 4.442882938158366, 1e-12);

        let expr = engine.parse("2*I").unwrap();
        assert!(EngineExpr::is_numeric(&expr));
        assert_eq!(EngineExpr::eval_float(&expr), None);
        assert_eq!(EngineExpr::eval_complex(&expr), Some((0.0, 2.0)));
    }

    #[test]
    fn division_by_zero() {
        let engine = SymbolicEngine;
        let err = engine.parse("x + 1/0").unwrap_err();
        assert_eq!(err.message(), "division by zero");
        assert_eq!(err.spans, vec![6..7]);

        let err = engine.parse("0/0").unwrap_err();
        assert_eq!(err.spans, vec![2..3]);
        let err = engine.parse("2*0**-1").unwrap_err();
        assert_eq!(err.spans, vec![2..7]);
        assert!(engine.parse("1/(x - x)").is_err());
        assert!(engine.parse("log(x, 1)").is_err());

        let expr = SymExpr::number(1) / SymExpr::zero();
        assert!(engine.simplify(&expr).is_err());
        assert!(engine.differentiate(&expr, "x").is_err());
        assert!(engine.integrate(&expr, "x").is_err());
        assert!(engine.solve(&expr, "x").is_err());
    }
}
