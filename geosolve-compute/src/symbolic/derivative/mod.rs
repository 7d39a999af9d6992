use geosolve_error::Error;
use super::{
    expr::{Primary, SymExpr},
    simplify::{add, call, mul, pow},
};

mod function;

/// `(f + g)' = f' + g'`
fn sum_rule(terms: &[SymExpr], var: &str) -> Result<SymExpr, Error> {
    Ok(add(terms.iter().map(|term| derivative(term, var)).collect::<Result<_, _>>()?))
}

/// `(f * g * h)' = f' * g * h + f * g' * h + f * g * h'`
fn product_rule(factors: &[SymExpr], var: &str) -> Result<SymExpr, Error> {
    let mut terms = Vec::with_capacity(factors.len());
    for derivative_index in 0..factors.len() {
        if !factors[derivative_index].contains(var) {
            continue;
        }

        let mut product = Vec::with_capacity(factors.len());
        for (term_index, factor) in factors.iter().enumerate() {
            if derivative_index == term_index {
                product.push(derivative(factor, var)?);
            } else {
                product.push(factor.clone());
            }
        }
        terms.push(mul(product));
    }
    Ok(add(terms))
}

/// Differentiates `base**exp`.
///
/// - `(u**n)' = n * u**(n - 1) * u'` when `n` is constant
/// - `(a**v)' = a**v * log(a) * v'` when `a` is constant
/// - `(u**v)' = u**v * (v' * log(u) + v * u' / u)` otherwise
fn power_rule(base: &SymExpr, exp: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    if !exp.contains(var) {
        return Ok(mul(vec![
            exp.clone(),
            pow(base.clone(), add(vec![exp.clone(), SymExpr::number(-1)])),
            derivative(base, var)?,
        ]));
    }

    let whole = pow(base.clone(), exp.clone());
    if !base.contains(var) {
        return Ok(mul(vec![whole, call("log", vec![base.clone()]), derivative(exp, var)?]));
    }

    let inner = add(vec![
        mul(vec![derivative(exp, var)?, call("log", vec![base.clone()])]),
        mul(vec![exp.clone(), derivative(base, var)?, pow(base.clone(), SymExpr::number(-1))]),
    ]);
    Ok(mul(vec![whole, inner]))
}

/// Computes the derivative of the given canonical expression with respect to `var`. Returns
/// [`Err`] if the expression calls a function whose derivative is not known.
pub fn derivative(f: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    if !f.contains(var) {
        return Ok(SymExpr::zero());
    }

    match f {
        SymExpr::Primary(Primary::Number(_)) => Ok(SymExpr::zero()),
        SymExpr::Primary(Primary::Symbol(sym)) => Ok(if sym == var {
            SymExpr::one()
        } else {
            SymExpr::zero()
        }),
        SymExpr::Primary(Primary::Call(name, args)) => function::function_derivative(name, args, var),
        SymExpr::Add(terms) => sum_rule(terms, var),
        SymExpr::Mul(factors) => product_rule(factors, var),
        SymExpr::Exp(base, exp) => power_rule(base, exp, var),
    }
}

#[cfg(test)]
mod tests {
    use crate::numerical::Eval;
    use crate::numerical::Namespace;
    use geosolve_parser::parser::{ast::Expr as AstExpr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn parse(source: &str) -> AstExpr {
        Parser::new(source).try_parse_full::<AstExpr>().unwrap()
    }

    fn sym(source: &str) -> SymExpr {
        SymExpr::from(&parse(source))
    }

    fn diff(source: &str) -> String {
        derivative(&sym(source), "x").unwrap().to_string()
    }

    /// Evaluates an expression with `x` substituted.
    fn eval_x(expr: &AstExpr, x: f64) -> f64 {
        let ns = Namespace::default().with_var("x", x);
        expr.eval(&ns).unwrap().as_scalar().unwrap()
    }

    /// Approximates the derivative of the expression with a central difference.
    fn finite_difference(expr: &AstExpr, x: f64) -> f64 {
        const DX: f64 = 1e-6;
        (eval_x(expr, x + DX) - eval_x(expr, x - DX)) / (2.0 * DX)
    }

    fn test_for_function(function: &str, points: impl IntoIterator<Item = f64>) {
        const TOL: f64 = 1e-4;

        let ast = parse(function);
        let symbolic = derivative(&SymExpr::from(&ast), "x").unwrap();
        // the derivative is printed in a form the parser reads back
        let symbolic_ast = parse(&symbolic.to_string());

        for point in points {
            let symbolically_computed = eval_x(&symbolic_ast, point);
            let numerically_computed = finite_difference(&ast, point);
            assert!(
                (symbolically_computed - numerically_computed).abs() < TOL,
                "for \"{function}\" at x={point}, symbolic derivative {symbolic} gave {symbolically_computed}, but the finite difference gave {numerically_computed}",
            );
        }
    }

    #[test]
    fn power_rule_output() {
        assert_eq!(diff("x**3"), "3*x**2");
        assert_eq!(diff("x**2 + x + 1"), "2*x + 1");
        assert_eq!(diff("1/x"), "-1/x**2");
        assert_eq!(diff("sqrt(x)"), "1/(2*sqrt(x))");
        assert_eq!(diff("5"), "0");
        assert_eq!(diff("y*x"), "y");
    }

    #[test]
    fn product_and_chain_rule_output() {
        assert_eq!(diff("x**3*cos(x)"), "-x**3*sin(x) + 3*x**2*cos(x)");
        assert_eq!(diff("sin(2x)"), "2*cos(2*x)");
        assert_eq!(diff("exp(x**2)"), "2*x*exp(x**2)");
        assert_eq!(diff("log(x)"), "1/x");
    }

    #[test]
    fn matches_finite_difference() {
        test_for_function("x**2 + x + 1", [0.0, 1.0, 2.0, 5.0, 8.0]);
        test_for_function("x**3*cos(x)", [-2.0, 0.5, 3.0]);
        test_for_function("tan(x) + atan(x)", [0.1, 0.7, 1.2]);
        test_for_function("asin(x/2) - acos(x/3)", [-0.5, 0.25, 0.9]);
        test_for_function("sinh(x)*cosh(x) + tanh(x)", [-1.0, 0.0, 1.5]);
        test_for_function("2**x + x**x", [0.5, 1.0, 2.0]);
        test_for_function("log(x**2 + 1)/x", [0.5, 1.0, 4.0]);
    }

    #[test]
    fn unknown_function() {
        let err = derivative(&sym("f(x)"), "x").unwrap_err();
        assert_eq!(err.message(), "cannot differentiate the unknown function `f`");
        assert_eq!(derivative(&sym("f(y)"), "x").unwrap(), SymExpr::zero());
    }
}
