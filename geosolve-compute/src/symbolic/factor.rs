//! Factorization of univariate polynomials over the rationals.

use rug::{ops::Pow, Rational};
use std::cmp::Reverse;
use super::{
    expr::SymExpr,
    poly::Poly,
    simplify::{add, mul, pow, simplify},
};

/// Builds the integer linear factor `q*x - p` for the root `p/q`.
fn linear_factor(root: &Rational, var: &str) -> SymExpr {
    add(vec![
        mul(vec![SymExpr::number(root.denom().clone()), SymExpr::symbol(var)]),
        SymExpr::number(-root.numer().clone()),
    ])
}

/// Factors the given expression.
///
/// A polynomial in a single variable is written as its content times linear factors for each
/// rational root (with multiplicity) times the remaining primitive cofactor. Any other expression
/// is returned simplified.
pub fn factor(expr: &SymExpr) -> SymExpr {
    let expr = simplify(expr);
    let symbols = expr.free_symbols();
    let Some(var) = symbols.iter().next().filter(|_| symbols.len() == 1) else {
        return expr;
    };
    let Some(poly) = Poly::from_expr(&expr, var) else {
        return expr;
    };
    if poly.degree().map_or(true, |d| d == 0) {
        return expr;
    }

    let (content, primitive) = poly.primitive();
    let (mut roots, rest) = primitive.rational_roots();

    // `x - p/q = (q*x - p)/q`, so the denominators move into the cofactor
    let denominators = roots
        .iter()
        .fold(Rational::from(1), |acc, (root, multiplicity)| {
            acc * Rational::from(root.denom().clone().pow(*multiplicity as u32))
        });
    let (rest_content, rest) = rest.scale(&Rational::from(denominators.recip_ref())).primitive();
    let constant = content * rest_content;

    // the zero root first, then the others by descending value
    roots.sort_by_key(|(root, _)| (*root != 0, Reverse(root.clone())));

    let mut factors = Vec::new();
    if constant != 1 {
        factors.push(SymExpr::number(constant));
    }
    for (root, multiplicity) in &roots {
        let base = if *root == 0 {
            SymExpr::symbol(var)
        } else {
            linear_factor(root, var)
        };
        factors.push(pow(base, SymExpr::number(*multiplicity as u32)));
    }
    if rest.degree().map_or(false, |d| d > 0) {
        factors.push(rest.to_expr(var));
    }

    match factors.len() {
        1 => factors.remove(0),
        _ => SymExpr::Mul(factors),
    }
}
