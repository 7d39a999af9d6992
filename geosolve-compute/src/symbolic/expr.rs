//! A representation of mathematical expressions that is easier to manipulate than an AST.
//!
//! The [`Expr`](geosolve_parser::parser::ast::expr::Expr) type from `geosolve_parser` is a
//! recursive `enum` that mirrors the source text. It's convenient for parsing, but not for
//! algebraic manipulation. [`SymExpr`] instead flattens the tree into lists of terms and factors,
//! stores numbers as exact rationals, and rewrites subtraction, division and square roots into
//! sums, products and powers:
//!
//! - `a - b` becomes `a + (-1)*b`
//! - `a / b` becomes `a * b**(-1)`
//! - `sqrt(a)` becomes `a**(1/2)`
//!
//! Every constructor in [`super::simplify`] returns expressions in canonical form, so the derived
//! [`PartialEq`] is a useful (if strict) notion of equality: two canonical expressions are equal
//! when they have the same terms and factors in the same canonical order.

use geosolve_parser::parser::{
    ast::{expr::Expr as AstExpr, literal::Literal},
    op::{BinOpKind, UnaryOpKind},
};
use rug::{float::Constant, ops::Pow, Assign, Complex, Float, Integer, Rational};
use std::{collections::BTreeSet, fmt};
use super::simplify::{add, call, mul, pow};

/// The name of the constant `π`.
pub const PI: &str = "pi";

/// The name of Euler's number.
pub const E: &str = "E";

/// The name of the imaginary unit.
pub const I: &str = "I";

/// Precision, in bits, of the complex numbers used by [`SymExpr::eval_complex`]. Matches `f64`.
const COMPLEX_PRECISION: u32 = 53;

/// Creates a [`Complex`] with the given value.
fn complex<T>(n: T) -> Complex
where
    Complex: Assign<T>,
{
    Complex::with_val(COMPLEX_PRECISION, n)
}

/// A single term / factor, such as a number, variable, or function call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primary {
    /// An exact rational number, such as `2` or `-1/2`.
    Number(Rational),

    /// A variable or named constant, such as `x` or `pi`.
    Symbol(String),

    /// A function call, such as `sin(x)`.
    Call(String, Vec<SymExpr>),
}

/// A mathematical expression in flattened sum-of-products form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymExpr {
    /// A single term or factor.
    Primary(Primary),

    /// A sum of terms.
    Add(Vec<SymExpr>),

    /// A product of factors. A numeric coefficient, if any, is the first factor.
    Mul(Vec<SymExpr>),

    /// A base raised to an exponent.
    Exp(Box<SymExpr>, Box<SymExpr>),
}

impl SymExpr {
    /// Creates a number.
    pub fn number(n: impl Into<Rational>) -> Self {
        SymExpr::Primary(Primary::Number(n.into()))
    }

    /// Creates the number `0`.
    pub fn zero() -> Self {
        Self::number(0)
    }

    /// Creates the number `1`.
    pub fn one() -> Self {
        Self::number(1)
    }

    /// Creates a symbol.
    pub fn symbol(name: &str) -> Self {
        SymExpr::Primary(Primary::Symbol(name.to_string()))
    }

    /// Returns the number this expression is, if it is one.
    pub fn as_number(&self) -> Option<&Rational> {
        match self {
            SymExpr::Primary(Primary::Number(n)) => Some(n),
            _ => None,
        }
    }

    /// Returns the integer this expression is, if it is one.
    pub fn as_integer(&self) -> Option<&Integer> {
        self.as_number().filter(|n| *n.denom() == 1).map(|n| n.numer())
    }

    /// Returns true if this expression is the number `0`.
    pub fn is_zero(&self) -> bool {
        self.as_number().map_or(false, |n| *n == 0)
    }

    /// Returns true if this expression is the number `1`.
    pub fn is_one(&self) -> bool {
        self.as_number().map_or(false, |n| *n == 1)
    }

    /// Returns true if this expression is the symbol `name`.
    pub fn is_symbol(&self, name: &str) -> bool {
        matches!(self, SymExpr::Primary(Primary::Symbol(s)) if s == name)
    }

    /// Returns true if `name` occurs anywhere in this expression.
    pub fn contains(&self, name: &str) -> bool {
        match self {
            SymExpr::Primary(Primary::Number(_)) => false,
            SymExpr::Primary(Primary::Symbol(s)) => s == name,
            SymExpr::Primary(Primary::Call(_, args)) => args.iter().any(|arg| arg.contains(name)),
            SymExpr::Add(items) | SymExpr::Mul(items) => items.iter().any(|item| item.contains(name)),
            SymExpr::Exp(base, exp) => base.contains(name) || exp.contains(name),
        }
    }

    /// Returns the free symbols of this expression: every symbol except `pi`, `E` and `I`.
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut symbols = BTreeSet::new();
        self.collect_symbols(&mut symbols);
        symbols
    }

    fn collect_symbols(&self, symbols: &mut BTreeSet<String>) {
        match self {
            SymExpr::Primary(Primary::Number(_)) => {},
            SymExpr::Primary(Primary::Symbol(s)) => {
                if ![PI, E, I].contains(&s.as_str()) {
                    symbols.insert(s.clone());
                }
            },
            SymExpr::Primary(Primary::Call(_, args)) => {
                args.iter().for_each(|arg| arg.collect_symbols(symbols));
            },
            SymExpr::Add(items) | SymExpr::Mul(items) => {
                items.iter().for_each(|item| item.collect_symbols(symbols));
            },
            SymExpr::Exp(base, exp) => {
                base.collect_symbols(symbols);
                exp.collect_symbols(symbols);
            },
        }
    }

    /// Returns true if this expression has no free symbols. It may still be complex.
    pub fn is_numeric(&self) -> bool {
        self.free_symbols().is_empty()
    }

    /// Evaluates this expression to a real float. Returns [`None`] if it has free symbols, is
    /// complex, or is not finite.
    pub fn eval_float(&self) -> Option<f64> {
        let value = match self {
            SymExpr::Primary(Primary::Number(n)) => n.to_f64(),
            SymExpr::Primary(Primary::Symbol(s)) => match s.as_str() {
                PI => std::f64::consts::PI,
                E => std::f64::consts::E,
                _ => return None,
            },
            SymExpr::Primary(Primary::Call(name, args)) => {
                let [arg] = args.as_slice() else {
                    return None;
                };
                let arg = arg.eval_float()?;
                match name.as_str() {
                    "sin" => arg.sin(),
                    "cos" => arg.cos(),
                    "tan" => arg.tan(),
                    "asin" => arg.asin(),
                    "acos" => arg.acos(),
                    "atan" => arg.atan(),
                    "sinh" => arg.sinh(),
                    "cosh" => arg.cosh(),
                    "tanh" => arg.tanh(),
                    "exp" => arg.exp(),
                    "log" => arg.ln(),
                    "abs" => arg.abs(),
                    "sign" => if arg == 0.0 { 0.0 } else { arg.signum() },
                    _ => return None,
                }
            },
            SymExpr::Add(terms) => terms.iter().map(SymExpr::eval_float).sum::<Option<f64>>()?,
            SymExpr::Mul(factors) => factors.iter().map(SymExpr::eval_float).product::<Option<f64>>()?,
            SymExpr::Exp(base, exp) => base.eval_float()?.powf(exp.eval_float()?),
        };
        value.is_finite().then_some(value)
    }

    /// Evaluates this expression to a complex float, returning the real and imaginary parts.
    /// Returns [`None`] if it has free symbols or either part is not finite.
    pub fn eval_complex(&self) -> Option<(f64, f64)> {
        let value = self.complex_value()?;
        let (re, im) = (value.real().to_f64(), value.imag().to_f64());
        (re.is_finite() && im.is_finite()).then_some((re, im))
    }

    fn complex_value(&self) -> Option<Complex> {
        Some(match self {
            SymExpr::Primary(Primary::Number(n)) => complex((n, 0)),
            SymExpr::Primary(Primary::Symbol(s)) => match s.as_str() {
                PI => complex((Constant::Pi, 0)),
                E => complex((Float::with_val(COMPLEX_PRECISION, 1).exp(), 0)),
                I => complex((0, 1)),
                _ => return None,
            },
            SymExpr::Primary(Primary::Call(name, args)) => {
                let [arg] = args.as_slice() else {
                    return None;
                };
                let arg = arg.complex_value()?;
                match name.as_str() {
                    "sin" => arg.sin(),
                    "cos" => arg.cos(),
                    "tan" => arg.tan(),
                    "asin" => arg.asin(),
                    "acos" => arg.acos(),
                    "atan" => arg.atan(),
                    "sinh" => arg.sinh(),
                    "cosh" => arg.cosh(),
                    "tanh" => arg.tanh(),
                    "exp" => arg.exp(),
                    "log" => arg.ln(),
                    "abs" => arg.abs(),
                    _ => return None,
                }
            },
            SymExpr::Add(terms) => {
                let mut sum = complex((0, 0));
                for term in terms {
                    sum += term.complex_value()?;
                }
                sum
            },
            SymExpr::Mul(factors) => {
                let mut product = complex((1, 0));
                for factor in factors {
                    product *= factor.complex_value()?;
                }
                product
            },
            SymExpr::Exp(base, exp) => base.complex_value()?.pow(exp.complex_value()?),
        })
    }

    /// Returns true if the expression contains zero raised to a negative power, which is how a
    /// division by zero survives canonicalization.
    pub fn divides_by_zero(&self) -> bool {
        match self {
            SymExpr::Primary(Primary::Call(_, args)) => args.iter().any(SymExpr::divides_by_zero),
            SymExpr::Primary(_) => false,
            SymExpr::Add(items) | SymExpr::Mul(items) => items.iter().any(SymExpr::divides_by_zero),
            SymExpr::Exp(base, exp) => {
                (base.is_zero() && exp.as_number().map_or(false, |n| *n < 0))
                    || base.divides_by_zero()
                    || exp.divides_by_zero()
            },
        }
    }

    /// Returns the number of nodes in the expression tree, a rough measure of how complicated the
    /// expression is to read.
    pub fn complexity(&self) -> usize {
        match self {
            SymExpr::Primary(Primary::Call(_, args)) => 1 + args.iter().map(SymExpr::complexity).sum::<usize>(),
            SymExpr::Primary(_) => 1,
            SymExpr::Add(items) | SymExpr::Mul(items) => {
                1 + items.iter().map(SymExpr::complexity).sum::<usize>()
            },
            SymExpr::Exp(base, exp) => 1 + base.complexity() + exp.complexity(),
        }
    }

    /// Splits the expression into its numeric coefficient and the remaining factors.
    ///
    /// `3*x*y` splits into `(3, x*y)`, `x` into `(1, x)`, and `5` into `(5, 1)`.
    pub fn split_coefficient(&self) -> (Rational, SymExpr) {
        match self {
            SymExpr::Primary(Primary::Number(n)) => (n.clone(), SymExpr::one()),
            SymExpr::Mul(factors) => match factors.split_first() {
                Some((SymExpr::Primary(Primary::Number(n)), rest)) => {
                    let rest = match rest {
                        [single] => single.clone(),
                        rest => SymExpr::Mul(rest.to_vec()),
                    };
                    (n.clone(), rest)
                },
                _ => (Rational::from(1), self.clone()),
            },
            _ => (Rational::from(1), self.clone()),
        }
    }

    /// Returns true if the numeric coefficient of this expression is negative.
    pub fn is_negative(&self) -> bool {
        self.split_coefficient().0 < 0
    }
}

/// Multiplies `rest` by `coeff` without further simplification. `rest` must not itself have a
/// numeric coefficient.
pub(crate) fn with_coefficient(coeff: Rational, rest: SymExpr) -> SymExpr {
    if rest.is_one() {
        return SymExpr::number(coeff);
    }
    if coeff == 1 {
        return rest;
    }
    match rest {
        SymExpr::Mul(mut factors) => {
            factors.insert(0, SymExpr::number(coeff));
            SymExpr::Mul(factors)
        },
        rest => SymExpr::Mul(vec![SymExpr::number(coeff), rest]),
    }
}

/// Parses a decimal literal such as `4.5` or `.25` into an exact rational.
fn parse_decimal(literal: &str) -> Rational {
    let (int, frac) = literal.split_once('.').unwrap_or((literal, ""));
    let digits = format!("{}{}", int, frac);
    let numer = parse_integer(&digits);
    let denom = Integer::from(Integer::u_pow_u(10, frac.len() as u32));
    Rational::from((numer, denom))
}

/// Parses a string of decimal digits. An empty string is zero.
fn parse_integer(digits: &str) -> Integer {
    Integer::parse(digits).map(Integer::from).unwrap_or_default()
}

impl From<&AstExpr> for SymExpr {
    fn from(expr: &AstExpr) -> Self {
        match expr {
            AstExpr::Literal(Literal::Integer(int)) => SymExpr::number(parse_integer(&int.value)),
            AstExpr::Literal(Literal::Float(float)) => SymExpr::number(parse_decimal(&float.value)),
            AstExpr::Literal(Literal::Symbol(sym)) => SymExpr::symbol(&sym.name),
            AstExpr::Call(c) => call(&c.name.name, c.args.iter().map(SymExpr::from).collect()),
            AstExpr::Paren(paren) => SymExpr::from(&*paren.expr),
            AstExpr::Unary(unary) => {
                let operand = SymExpr::from(&*unary.operand);
                match unary.op.kind {
                    UnaryOpKind::Neg => mul(vec![SymExpr::number(-1), operand]),
                    UnaryOpKind::Pos => operand,
                }
            },
            AstExpr::Binary(binary) => {
                let lhs = SymExpr::from(&*binary.lhs);
                let rhs = SymExpr::from(&*binary.rhs);
                match binary.op.kind {
                    BinOpKind::Add => add(vec![lhs, rhs]),
                    BinOpKind::Sub => add(vec![lhs, mul(vec![SymExpr::number(-1), rhs])]),
                    BinOpKind::Mul => mul(vec![lhs, rhs]),
                    BinOpKind::Div => mul(vec![lhs, pow(rhs, SymExpr::number(-1))]),
                    BinOpKind::Exp => pow(lhs, rhs),
                }
            },
        }
    }
}

impl std::ops::Add for SymExpr {
    type Output = SymExpr;

    fn add(self, rhs: Self) -> Self::Output {
        add(vec![self, rhs])
    }
}

impl std::ops::Sub for SymExpr {
    type Output = SymExpr;

    fn sub(self, rhs: Self) -> Self::Output {
        add(vec![self, -rhs])
    }
}

impl std::ops::Mul for SymExpr {
    type Output = SymExpr;

    fn mul(self, rhs: Self) -> Self::Output {
        mul(vec![self, rhs])
    }
}

impl std::ops::Div for SymExpr {
    type Output = SymExpr;

    fn div(self, rhs: Self) -> Self::Output {
        mul(vec![self, pow(rhs, SymExpr::number(-1))])
    }
}

impl std::ops::Neg for SymExpr {
    type Output = SymExpr;

    fn neg(self) -> Self::Output {
        mul(vec![SymExpr::number(-1), self])
    }
}

/// Returns true if the number must be parenthesized when used as a base or exponent.
fn number_needs_parens(n: &Rational) -> bool {
    *n < 0 || *n.denom() != 1
}

/// Formats a base of a power, parenthesizing it if needed.
fn fmt_base(f: &mut fmt::Formatter<'_>, base: &SymExpr) -> fmt::Result {
    match base {
        SymExpr::Add(_) | SymExpr::Mul(_) | SymExpr::Exp(..) => write!(f, "({})", base),
        SymExpr::Primary(Primary::Number(n)) if number_needs_parens(n) => write!(f, "({})", base),
        _ => write!(f, "{}", base),
    }
}

/// Formats `base**exp` where `exp` is known to be positive, or `sqrt(base)`.
fn fmt_power(f: &mut fmt::Formatter<'_>, base: &SymExpr, exp: &SymExpr) -> fmt::Result {
    if exp.is_one() {
        return fmt_factor(f, base);
    }
    if exp.as_number().map_or(false, |n| *n == Rational::from((1, 2))) {
        return write!(f, "sqrt({})", base);
    }

    fmt_base(f, base)?;
    write!(f, "**")?;
    match exp {
        SymExpr::Add(_) | SymExpr::Mul(_) | SymExpr::Exp(..) => write!(f, "({})", exp),
        SymExpr::Primary(Primary::Number(n)) if number_needs_parens(n) => write!(f, "({})", exp),
        _ => write!(f, "{}", exp),
    }
}

/// Formats a factor of a product, parenthesizing sums.
fn fmt_factor(f: &mut fmt::Formatter<'_>, factor: &SymExpr) -> fmt::Result {
    match factor {
        SymExpr::Add(_) => write!(f, "({})", factor),
        _ => write!(f, "{}", factor),
    }
}

/// Adapter to format a factor with [`fmt_factor`] through `to_string`.
struct Factor<'a>(&'a SymExpr);

impl fmt::Display for Factor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_factor(f, self.0)
    }
}

/// Adapter to format a positive power with [`fmt_power`] through `to_string`.
struct Power<'a>(&'a SymExpr, &'a SymExpr);

impl fmt::Display for Power<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_power(f, self.0, self.1)
    }
}

/// Formats a product as `[-]numerator[/denominator]`, moving factors with negative exponents
/// into the denominator.
fn fmt_product(f: &mut fmt::Formatter<'_>, coeff: &Rational, factors: &[SymExpr]) -> fmt::Result {
    let mut numer = Vec::new();
    let mut denom = Vec::new();

    if *coeff.numer().as_abs() != 1 {
        numer.push(coeff.numer().as_abs().to_string());
    }
    if *coeff.denom() != 1 {
        denom.push(coeff.denom().to_string());
    }

    for factor in factors {
        match factor {
            SymExpr::Exp(base, exp) if exp.as_number().map_or(false, |n| *n < 0) => {
                let positive = SymExpr::number(-exp.as_number().cloned().unwrap_or_default());
                denom.push(Power(base, &positive).to_string());
            },
            factor => numer.push(Factor(factor).to_string()),
        }
    }

    if *coeff < 0 {
        write!(f, "-")?;
    }
    if numer.is_empty() {
        write!(f, "1")?;
    } else {
        write!(f, "{}", numer.join("*"))?;
    }
    match denom.as_slice() {
        [] => Ok(()),
        [single] => write!(f, "/{}", single),
        many => write!(f, "/({})", many.join("*")),
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primary::Number(n) => write!(f, "{}", n),
            Primary::Symbol(s) => write!(f, "{}", s),
            Primary::Call(name, args) => {
                write!(f, "{}(", name)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            },
        }
    }
}

impl fmt::Display for SymExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymExpr::Primary(primary) => write!(f, "{}", primary),
            SymExpr::Add(terms) => {
                for (i, term) in terms.iter().enumerate() {
                    let (coeff, rest) = term.split_coefficient();
                    if coeff < 0 {
                        write!(f, "{}", if i == 0 { "-" } else { " - " })?;
                        write!(f, "{}", with_coefficient(-coeff, rest))?;
                    } else {
                        if i > 0 {
                            write!(f, " + ")?;
                        }
                        write!(f, "{}", term)?;
                    }
                }
                Ok(())
            },
            SymExpr::Mul(_) => {
                let (coeff, rest) = self.split_coefficient();
                match rest {
                    SymExpr::Mul(factors) => fmt_product(f, &coeff, &factors),
                    single => fmt_product(f, &coeff, std::slice::from_ref(&single)),
                }
            },
            SymExpr::Exp(base, exp) => match exp.as_number() {
                Some(n) if *n < 0 => fmt_product(f, &Rational::from(1), std::slice::from_ref(self)),
                _ => fmt_power(f, base, exp),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use geosolve_parser::parser::Parser;
    use pretty_assertions::assert_eq;
    use super::*;

    fn sym(source: &str) -> SymExpr {
        let ast = Parser::new(source).try_parse_full::<AstExpr>().unwrap();
        SymExpr::from(&ast)
    }

    #[test]
    fn display_conventions() {
        assert_eq!(sym("x**2/2").to_string(), "x**2/2");
        assert_eq!(sym("x**2 - 5*x + 6").to_string(), "x**2 - 5*x + 6");
        assert_eq!(sym("-x*cos(x)").to_string(), "-x*cos(x)");
        assert_eq!(sym("1/x").to_string(), "1/x");
        assert_eq!(sym("3/(2*y)").to_string(), "3/(2*y)");
        assert_eq!(sym("sqrt(x + 1)").to_string(), "sqrt(x + 1)");
        assert_eq!(sym("x**(1/3)").to_string(), "x**(1/3)");
        assert_eq!(sym("2*(x + 1)**2").to_string(), "2*(x + 1)**2");
    }

    #[test]
    fn decimals_are_exact() {
        assert_eq!(sym("0.5"), SymExpr::number((1, 2)));
        assert_eq!(sym("4.5*x").to_string(), "9*x/2");
        assert_eq!(sym(".25").to_string(), "1/4");
    }

    #[test]
    fn subtraction_and_division_are_rewritten() {
        assert_eq!(sym("x - x"), SymExpr::zero());
        assert_eq!(sym("x/x"), SymExpr::one());
        assert_eq!(sym("2*x + 3*x").to_string(), "5*x");
    }

    #[test]
    fn free_symbols_exclude_constants() {
        let expr = sym("pi*x + E*y + I");
        assert_eq!(expr.free_symbols().into_iter().collect::<Vec<_>>(), ["x", "y"]);
        assert!(sym("sqrt(2)*pi").is_numeric());
    }

    #[test]
    fn float_evaluation() {
        assert_eq!(sym("sqrt(16) + 1/2").eval_float(), Some(4.5));
        assert_eq!(sym("x + 1").eval_float(), None);
        assert_eq!(sym("1 + I").eval_float(), None);
    }

    #[test]
    fn complex_evaluation() {
        assert_eq!(sym("2 + 3*I").eval_complex(), Some((2.0, 3.0)));
        assert_eq!(sym("-I").eval_complex().map(|(_, im)| im), Some(-1.0));
        assert_eq!(sym("sqrt(4)").eval_complex(), Some((2.0, 0.0)));
        assert_eq!(sym("x*I").eval_complex(), None);

        let (re, im) = sym("-1/2 + sqrt(3)*I/2").eval_complex().unwrap();
        assert_eq!(re, -0.5);
        assert!((im - 0.8660254037844386).abs() < 1e-15);
    }

    #[test]
    fn zero_divisors() {
        assert!(sym("1/0").divides_by_zero());
        assert!(sym("x + sin(2/(x - x))").divides_by_zero());
        assert!(sym("log(x, 1)").divides_by_zero());
        assert!(!sym("0**2 + 1/x").divides_by_zero());
    }
}
