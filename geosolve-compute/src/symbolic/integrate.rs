//! Antiderivatives of a narrow class of elementary expressions.

use geosolve_error::Error;
use super::{
    derivative::derivative,
    error::CannotIntegrate,
    expr::{Primary, SymExpr},
    poly::Poly,
    simplify::{add, call, mul, pow},
};

/// Functions whose repeated antiderivatives of a linear argument cycle through a fixed set of
/// functions. Only these are integrated by parts against a polynomial.
const CYCLIC: [&str; 5] = ["sin", "cos", "exp", "sinh", "cosh"];

/// Returns `F(u)` such that `dF/du = name(u)`.
fn call_antiderivative(name: &str, u: &SymExpr) -> Option<SymExpr> {
    let neg = |e: SymExpr| mul(vec![SymExpr::number(-1), e]);
    Some(match name {
        "sin" => neg(call("cos", vec![u.clone()])),
        "cos" => call("sin", vec![u.clone()]),
        "tan" => neg(call("log", vec![call("cos", vec![u.clone()])])),
        "exp" => call("exp", vec![u.clone()]),
        "sinh" => call("cosh", vec![u.clone()]),
        "cosh" => call("sinh", vec![u.clone()]),
        "tanh" => call("log", vec![call("cosh", vec![u.clone()])]),
        "log" => add(vec![mul(vec![u.clone(), call("log", vec![u.clone()])]), neg(u.clone())]),
        _ => return None,
    })
}

/// Integrates `f * others` by the substitution `u = inner(f)`, where `f` is a function call or a
/// power. Succeeds when `others / u'` does not depend on `var`, which covers linear arguments
/// (`others` is empty and `u'` is constant) as well as the reverse chain rule.
fn substitution(f: &SymExpr, others: &[SymExpr], var: &str) -> Option<SymExpr> {
    let (u, antiderivative) = match f {
        SymExpr::Primary(Primary::Call(name, args)) if args.len() == 1 => {
            (&args[0], call_antiderivative(name, &args[0])?)
        },
        SymExpr::Exp(base, exp) if !exp.contains(var) => {
            let antiderivative = if exp.as_number().map_or(false, |n| *n == -1) {
                call("log", vec![(**base).clone()])
            } else {
                let raised = add(vec![(**exp).clone(), SymExpr::one()]);
                mul(vec![
                    pow((**base).clone(), raised.clone()),
                    pow(raised, SymExpr::number(-1)),
                ])
            };
            (&**base, antiderivative)
        },
        SymExpr::Exp(base, exp) if !base.contains(var) => {
            let antiderivative = mul(vec![
                f.clone(),
                pow(call("log", vec![(**base).clone()]), SymExpr::number(-1)),
            ]);
            (&**exp, antiderivative)
        },
        _ => return None,
    };

    let du = derivative(u, var).ok()?;
    if du.is_zero() {
        return None;
    }

    let mut ratio = others.to_vec();
    ratio.push(pow(du, SymExpr::number(-1)));
    let ratio = mul(ratio);
    (!ratio.contains(var)).then(|| mul(vec![ratio, antiderivative]))
}

/// Returns true if `f` is a cyclic function of a linear argument, or an exponential with a
/// constant base and linear exponent.
fn is_cyclic(f: &SymExpr, var: &str) -> bool {
    let linear = |u: &SymExpr| derivative(u, var).map_or(false, |du| !du.contains(var));
    match f {
        SymExpr::Primary(Primary::Call(name, args)) => {
            CYCLIC.contains(&name.as_str()) && args.len() == 1 && linear(&args[0])
        },
        SymExpr::Exp(base, exp) => !base.contains(var) && linear(exp),
        _ => false,
    }
}

/// Integrates `P * G` for a polynomial `P` and a cyclic `G`, by repeated integration by parts:
///
/// `∫P*G = P*G₁ - P'*G₂ + P''*G₃ - …`
///
/// where `Gₖ` is the `k`-th antiderivative of `G`.
fn by_parts(factors: &[SymExpr], var: &str) -> Option<SymExpr> {
    let (polys, rest): (Vec<_>, Vec<_>) = factors
        .iter()
        .cloned()
        .partition(|factor| Poly::from_expr(factor, var).is_some());
    let [g] = rest.as_slice() else {
        return None;
    };
    if !is_cyclic(g, var) {
        return None;
    }

    let mut p = Poly::from_expr(&mul(polys), var)?;
    let degree = p.degree()?;
    let mut g = g.clone();
    let mut terms = Vec::with_capacity(degree + 1);
    for k in 0..=degree {
        g = try_integrate(&g, var)?;
        let sign = if k % 2 == 0 { 1 } else { -1 };
        terms.push(mul(vec![SymExpr::number(sign), p.to_expr(var), g.clone()]));
        p = p.derivative();
    }
    Some(add(terms))
}

fn try_integrate(f: &SymExpr, var: &str) -> Option<SymExpr> {
    if !f.contains(var) {
        return Some(mul(vec![f.clone(), SymExpr::symbol(var)]));
    }
    if let Some(poly) = Poly::from_expr(f, var) {
        return Some(poly.antiderivative().to_expr(var));
    }

    match f {
        SymExpr::Add(terms) => terms
            .iter()
            .map(|term| try_integrate(term, var))
            .collect::<Option<Vec<_>>>()
            .map(add),
        SymExpr::Mul(factors) => {
            let (constant, variable): (Vec<_>, Vec<_>) = factors
                .iter()
                .cloned()
                .partition(|factor| !factor.contains(var));
            if !constant.is_empty() {
                let inner = try_integrate(&mul(variable), var)?;
                return Some(mul(vec![mul(constant), inner]));
            }

            (0..variable.len())
                .find_map(|i| {
                    let others = variable
                        .iter()
                        .enumerate()
                        .filter(|(j, _)| *j != i)
                        .map(|(_, factor)| factor.clone())
                        .collect::<Vec<_>>();
                    substitution(&variable[i], &others, var)
                })
                .or_else(|| by_parts(&variable, var))
        },
        f => substitution(f, &[], var),
    }
}

/// Computes an antiderivative of the given canonical expression with respect to `var`, without
/// the constant of integration. Returns [`Err`] if no antiderivative could be found.
pub fn integrate(f: &SymExpr, var: &str) -> Result<SymExpr, Error> {
    try_integrate(f, var).ok_or_else(|| {
        Error::spanless(CannotIntegrate {
            expr: f.to_string(),
            variable: var.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use geosolve_parser::parser::{ast::Expr, Parser};
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(source: &str) -> SymExpr {
        let ast = Parser::new(source).try_parse_full::<Expr>().unwrap();
        SymExpr::from(&ast)
    }

    fn integral(source: &str) -> String {
        integrate(&sym(source), "x").unwrap().to_string()
    }

    #[test]
    fn polynomials() {
        assert_eq!(integral("x"), "x**2/2");
        assert_eq!(integral("3x**2 + 1"), "x**3 + x");
        assert_eq!(integral("5"), "5*x");
        assert_eq!(integral("y"), "x*y");
    }

    #[test]
    fn power_rule() {
        assert_eq!(integral("1/x"), "log(x)");
        assert_eq!(integral("x**(1/2)"), "2*x**(3/2)/3");
        assert_eq!(integral("1/(2x + 1)"), "log(2*x + 1)/2");
    }

    #[test]
    fn linear_arguments() {
        assert_eq!(integral("sin(x)"), "-cos(x)");
        assert_eq!(integral("cos(3x)"), "sin(3*x)/3");
        assert_eq!(integral("exp(2x)"), "exp(2*x)/2");
        assert_eq!(integral("tan(x)"), "-log(cos(x))");
        assert_eq!(integral("log(x)"), "-x + x*log(x)");
        assert_eq!(integral("2**x"), "2**x/log(2)");
    }

    #[test]
    fn constant_factors_and_sums() {
        assert_eq!(integral("2sin(x)"), "-2*cos(x)");
        assert_eq!(integral("x + cos(x)"), "x**2/2 + sin(x)");
    }

    #[test]
    fn reverse_chain_rule() {
        assert_eq!(integral("2x*exp(x**2)"), "exp(x**2)");
        assert_eq!(integral("cos(x)*sin(x)**2"), "sin(x)**3/3");
    }

    #[test]
    fn integration_by_parts() {
        assert_eq!(integral("x**2*sin(x)"), "-x**2*cos(x) + 2*x*sin(x) + 2*cos(x)");
        assert_eq!(integral("x*exp(x)"), "x*exp(x) - exp(x)");
    }

    #[test]
    fn unsupported() {
        let err = integrate(&sym("exp(x**2)"), "x").unwrap_err();
        assert_eq!(err.message(), "cannot find an antiderivative of exp(x**2) with respect to x");
        assert!(integrate(&sym("sin(x)*cos(x**2)"), "x").is_err());
    }
}
