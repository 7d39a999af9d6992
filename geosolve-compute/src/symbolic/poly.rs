//! Univariate polynomials with rational coefficients.

use rug::{Integer, Rational};
use super::{expr::{Primary, SymExpr}, simplify::{add, mul, pow}};

/// Largest exponent accepted when converting an expression to a polynomial.
const MAX_DEGREE: u32 = 64;

/// Largest constant term whose divisors are enumerated when searching for rational roots.
const MAX_DIVISOR_SEARCH: u64 = 1 << 40;

/// A polynomial in a single variable. `coeffs[i]` is the coefficient of `x**i`; the last
/// coefficient is never zero, so the zero polynomial has no coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<Rational>,
}

impl Poly {
    /// Creates a polynomial from its coefficients, lowest degree first.
    pub fn new(coeffs: Vec<Rational>) -> Self {
        let mut poly = Self { coeffs };
        poly.trim();
        poly
    }

    /// The constant polynomial `c`.
    pub fn constant(c: Rational) -> Self {
        Self::new(vec![c])
    }

    /// The polynomial `x`.
    pub fn x() -> Self {
        Self::new(vec![Rational::new(), Rational::from(1)])
    }

    fn trim(&mut self) {
        while self.coeffs.last().map_or(false, |c| *c == 0) {
            self.coeffs.pop();
        }
    }

    /// The coefficients, lowest degree first.
    pub fn coeffs(&self) -> &[Rational] {
        &self.coeffs
    }

    /// Returns the coefficient of `x**i`.
    pub fn coeff(&self, i: usize) -> Rational {
        self.coeffs.get(i).cloned().unwrap_or_default()
    }

    /// The degree of the polynomial, or [`None`] for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Returns true if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// The leading coefficient. Zero for the zero polynomial.
    pub fn leading(&self) -> Rational {
        self.coeffs.last().cloned().unwrap_or_default()
    }

    /// Converts an expression to a polynomial in `var`. Returns [`None`] if the expression
    /// involves anything other than rational numbers, `var`, sums, products and non-negative
    /// integer powers.
    pub fn from_expr(expr: &SymExpr, var: &str) -> Option<Self> {
        match expr {
            SymExpr::Primary(Primary::Number(n)) => Some(Self::constant(n.clone())),
            SymExpr::Primary(Primary::Symbol(s)) if s == var => Some(Self::x()),
            SymExpr::Primary(_) => None,
            SymExpr::Add(terms) => terms
                .iter()
                .try_fold(Self::constant(Rational::new()), |acc, term| Some(acc.add(&Self::from_expr(term, var)?))),
            SymExpr::Mul(factors) => factors
                .iter()
                .try_fold(Self::constant(Rational::from(1)), |acc, factor| Some(acc.mul(&Self::from_expr(factor, var)?))),
            SymExpr::Exp(base, exp) => {
                let n = exp.as_integer()?.to_u32().filter(|n| *n <= MAX_DEGREE)?;
                let base = Self::from_expr(base, var)?;
                Some((0..n).fold(Self::constant(Rational::from(1)), |acc, _| acc.mul(&base)))
            },
        }
    }

    /// Converts the polynomial back to a canonical expression in `var`.
    pub fn to_expr(&self, var: &str) -> SymExpr {
        let terms = self.coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| **c != 0)
            .map(|(i, c)| mul(vec![
                SymExpr::number(c.clone()),
                pow(SymExpr::symbol(var), SymExpr::number(i as u32)),
            ]))
            .collect();
        add(terms)
    }

    /// Adds two polynomials.
    pub fn add(&self, other: &Self) -> Self {
        let len = self.coeffs.len().max(other.coeffs.len());
        Self::new((0..len).map(|i| self.coeff(i) + other.coeff(i)).collect())
    }

    /// Multiplies two polynomials.
    pub fn mul(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::new(Vec::new());
        }
        let mut coeffs = vec![Rational::new(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            for (j, b) in other.coeffs.iter().enumerate() {
                coeffs[i + j] += Rational::from(a * b);
            }
        }
        Self::new(coeffs)
    }

    /// Multiplies every coefficient by `c`.
    pub fn scale(&self, c: &Rational) -> Self {
        Self::new(self.coeffs.iter().map(|a| Rational::from(a * c)).collect())
    }

    /// The derivative of the polynomial.
    pub fn derivative(&self) -> Self {
        Self::new(
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, c)| c.clone() * Rational::from(i))
                .collect(),
        )
    }

    /// The antiderivative of the polynomial with zero constant term.
    pub fn antiderivative(&self) -> Self {
        let mut coeffs = vec![Rational::new()];
        coeffs.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c.clone() / Rational::from(i + 1)),
        );
        Self::new(coeffs)
    }

    /// Evaluates the polynomial at `x`, using Horner's method.
    pub fn eval(&self, x: &Rational) -> Rational {
        self.coeffs
            .iter()
            .rev()
            .fold(Rational::new(), |acc, c| acc * x + c)
    }

    /// Divides by `x - root`, returning the quotient and the remainder.
    pub fn div_linear(&self, root: &Rational) -> (Self, Rational) {
        let mut quotient = vec![Rational::new(); self.coeffs.len().saturating_sub(1)];
        let mut carry = Rational::new();
        for i in (0..self.coeffs.len()).rev() {
            let value = Rational::from(&self.coeffs[i] + &carry);
            if i == 0 {
                return (Self::new(quotient), value);
            }
            carry = Rational::from(&value * root);
            quotient[i - 1] = value;
        }
        (Self::new(quotient), Rational::new())
    }

    /// Splits the polynomial into `content * primitive`, where `primitive` has coprime integer
    /// coefficients and a positive leading coefficient.
    pub fn primitive(&self) -> (Rational, Self) {
        if self.is_zero() {
            return (Rational::new(), self.clone());
        }
        let lcm = self.coeffs.iter().fold(Integer::from(1), |acc, c| acc.lcm(c.denom()));
        let ints = self.coeffs
            .iter()
            .map(|c| Integer::from(c.numer() * &lcm) / c.denom())
            .collect::<Vec<Integer>>();
        let mut gcd = ints.iter().fold(Integer::new(), |acc, n| acc.gcd(n));
        if self.leading() < 0 {
            gcd = -gcd;
        }
        let content = Rational::from((gcd.clone(), lcm));
        let primitive = Self::new(ints.into_iter().map(|n| Rational::from(n / &gcd)).collect());
        (content, primitive)
    }

    /// The candidate rational roots `±p/q` of the primitive form, where `p` divides the constant
    /// term and `q` divides the leading coefficient. Returns [`None`] if the coefficients are too
    /// large to enumerate.
    fn root_candidates(&self) -> Option<Vec<Rational>> {
        let (_, primitive) = self.primitive();
        let constant = primitive.coeff(0).numer().clone().abs().to_u64()?;
        let leading = primitive.leading().numer().clone().abs().to_u64()?;
        if constant > MAX_DIVISOR_SEARCH || leading > MAX_DIVISOR_SEARCH {
            return None;
        }

        let mut candidates = Vec::new();
        for p in divisors(constant) {
            for q in divisors(leading) {
                let r = Rational::from((p, q));
                candidates.push(Rational::from(-&r));
                candidates.push(r);
            }
        }
        candidates.sort();
        candidates.dedup();
        Some(candidates)
    }

    /// Finds the rational roots of the polynomial with their multiplicities, in ascending order,
    /// and returns them with the cofactor left after dividing them out.
    pub fn rational_roots(&self) -> (Vec<(Rational, usize)>, Self) {
        let mut rest = self.clone();
        let mut roots = Vec::new();

        // zero roots first, so the constant term of the rest is nonzero
        let zeros = rest.coeffs.iter().take_while(|c| **c == 0).count();
        if zeros > 0 && rest.degree().map_or(false, |d| d >= zeros) {
            rest = Self::new(rest.coeffs[zeros..].to_vec());
            roots.push((Rational::new(), zeros));
        }

        if rest.degree().map_or(true, |d| d == 0) {
            return (roots, rest);
        }

        for candidate in rest.root_candidates().unwrap_or_default() {
            let mut multiplicity = 0;
            loop {
                let (quotient, remainder) = rest.div_linear(&candidate);
                if remainder != 0 {
                    break;
                }
                rest = quotient;
                multiplicity += 1;
            }
            if multiplicity > 0 {
                roots.push((candidate, multiplicity));
            }
            if rest.degree().map_or(true, |d| d == 0) {
                break;
            }
        }

        roots.sort_by(|(a, _), (b, _)| a.cmp(b));
        (roots, rest)
    }
}

/// The positive divisors of `n`, in ascending order. Zero has only the divisor `1` here, which is
/// all the rational root search needs.
fn divisors(n: u64) -> Vec<u64> {
    if n == 0 {
        return vec![1];
    }
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d != n / d {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}
