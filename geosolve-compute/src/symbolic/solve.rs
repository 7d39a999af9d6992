//! Roots of univariate equations of the form `expr = 0`.

use geosolve_error::Error;
use super::{
    derivative::derivative,
    error::UnsupportedEquation,
    expr::SymExpr,
    poly::Poly,
    simplify::{add, mul, pow},
};

/// Solves `a*x**2 + b*x + c = 0` with the quadratic formula, returning the `-` root first.
fn quadratic(poly: &Poly) -> [SymExpr; 2] {
    let (a, b, c) = (poly.coeff(2), poly.coeff(1), poly.coeff(0));
    let discriminant = b.clone() * &b - a.clone() * &c * 4;
    let sqrt = pow(SymExpr::number(discriminant), SymExpr::number((1, 2)));
    let denom = SymExpr::number((a * 2u32).recip());
    let neg_b = SymExpr::number(-b);

    [
        mul(vec![denom.clone(), add(vec![neg_b.clone(), -sqrt.clone()])]),
        mul(vec![denom, add(vec![neg_b, sqrt])]),
    ]
}

/// Solves `a*x + b = 0` where `a` and `b` may contain other symbols.
fn linear(expr: &SymExpr, var: &str) -> Option<SymExpr> {
    let slope = derivative(expr, var).ok()?;
    if slope.is_zero() || slope.contains(var) {
        return None;
    }
    let intercept = add(vec![expr.clone(), -mul(vec![slope.clone(), SymExpr::symbol(var)])]);
    if intercept.contains(var) {
        return None;
    }
    Some(-mul(vec![intercept, pow(slope, SymExpr::number(-1))]))
}

/// Orders solutions with the real roots first in ascending order, and the complex roots last in
/// the order they were found.
fn sort_solutions(solutions: &mut [SymExpr]) {
    solutions.sort_by(|a, b| match (a.eval_float(), b.eval_float()) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Solves `expr = 0` for `var`, returning the distinct solutions.
///
/// Polynomial equations are solved exactly when every root is rational except for at most a
/// single quadratic factor. Equations that are linear in `var` are solved even when the
/// coefficients involve other symbols. Anything else is an [`UnsupportedEquation`] error.
pub fn solve(expr: &SymExpr, var: &str) -> Result<Vec<SymExpr>, Error> {
    let unsupported = |reason: String| {
        Error::spanless(UnsupportedEquation {
            variable: var.to_string(),
            reason,
        })
    };

    let Some(poly) = Poly::from_expr(expr, var) else {
        return match linear(expr, var) {
            Some(solution) => Ok(vec![solution]),
            None => Err(unsupported(format!("{} is not a polynomial in {}", expr, var))),
        };
    };

    if poly.degree().map_or(true, |d| d == 0) {
        return Ok(Vec::new());
    }

    let (roots, rest) = poly.rational_roots();
    let mut solutions = roots
        .into_iter()
        .map(|(root, _)| SymExpr::number(root))
        .collect::<Vec<_>>();

    match rest.degree() {
        None | Some(0) => {},
        Some(2) => solutions.extend(quadratic(&rest)),
        Some(degree) => {
            return Err(unsupported(format!(
                "the degree {} factor {} has no rational roots",
                degree,
                rest.to_expr(var),
            )));
        },
    }

    sort_solutions(&mut solutions);
    Ok(solutions)
}
