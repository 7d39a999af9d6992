//! Derivatives of the elementary functions.

use geosolve_error::Error;
use crate::symbolic::{
    error::CannotDifferentiate,
    expr::SymExpr,
    simplify::{add, call, mul, pow},
};
use super::derivative;

/// Computes the derivative of a call to a known function and applies the chain rule.
pub(super) fn function_derivative(name: &str, args: &[SymExpr], var: &str) -> Result<SymExpr, Error> {
    let unknown = || Error::spanless(CannotDifferentiate { name: name.to_string() });
    let [u] = args else {
        return Err(unknown());
    };

    let u_squared = || pow(u.clone(), SymExpr::number(2));
    let outer = match name {
        "sin" => call("cos", vec![u.clone()]),
        "cos" => mul(vec![SymExpr::number(-1), call("sin", vec![u.clone()])]),
        "tan" => add(vec![pow(call("tan", vec![u.clone()]), SymExpr::number(2)), SymExpr::one()]),
        "exp" => call("exp", vec![u.clone()]),
        "log" => pow(u.clone(), SymExpr::number(-1)),
        "asin" => pow(
            add(vec![SymExpr::one(), mul(vec![SymExpr::number(-1), u_squared()])]),
            SymExpr::number((-1, 2)),
        ),
        "acos" => mul(vec![
            SymExpr::number(-1),
            pow(
                add(vec![SymExpr::one(), mul(vec![SymExpr::number(-1), u_squared()])]),
                SymExpr::number((-1, 2)),
            ),
        ]),
        "atan" => pow(add(vec![u_squared(), SymExpr::one()]), SymExpr::number(-1)),
        "sinh" => call("cosh", vec![u.clone()]),
        "cosh" => call("sinh", vec![u.clone()]),
        "tanh" => add(vec![
            SymExpr::one(),
            mul(vec![SymExpr::number(-1), pow(call("tanh", vec![u.clone()]), SymExpr::number(2))]),
        ]),
        "abs" => call("sign", vec![u.clone()]),
        "sign" => SymExpr::zero(),
        _ => return Err(unknown()),
    };

    Ok(mul(vec![outer, derivative(u, var)?]))
}
