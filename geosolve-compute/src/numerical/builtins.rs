//! The fixed set of functions available to numeric evaluation.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// The implementation of a builtin function.
#[derive(Debug, Clone, Copy)]
pub enum BuiltinFn {
    /// A function of one argument.
    Unary(fn(f64) -> f64),

    /// A function of one required and one optional argument.
    UnaryOrBinary(fn(f64, Option<f64>) -> f64),
}

/// A builtin function.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    /// The name of the function.
    pub name: &'static str,

    /// Whether the first argument is an angle. In degrees mode, such arguments are converted to
    /// radians before the function is applied.
    pub angle_input: bool,

    /// The implementation.
    pub func: BuiltinFn,
}

impl Builtin {
    fn unary(name: &'static str, func: fn(f64) -> f64) -> Self {
        Self { name, angle_input: false, func: BuiltinFn::Unary(func) }
    }

    fn angle(name: &'static str, func: fn(f64) -> f64) -> Self {
        Self { name, angle_input: true, func: BuiltinFn::Unary(func) }
    }

    /// The smallest number of arguments the function accepts.
    pub fn min_args(&self) -> usize {
        1
    }

    /// The largest number of arguments the function accepts.
    pub fn max_args(&self) -> usize {
        match self.func {
            BuiltinFn::Unary(_) => 1,
            BuiltinFn::UnaryOrBinary(_) => 2,
        }
    }
}

/// Natural logarithm, or the logarithm in the given base.
fn log(n: f64, base: Option<f64>) -> f64 {
    match base {
        Some(base) => n.ln() / base.ln(),
        None => n.ln(),
    }
}

/// The builtin functions, keyed by name.
pub static BUILTINS: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    [
        Builtin::angle("sin", f64::sin),
        Builtin::angle("cos", f64::cos),
        Builtin::angle("tan", f64::tan),
        Builtin::unary("asin", f64::asin),
        Builtin::unary("acos", f64::acos),
        Builtin::unary("atan", f64::atan),
        Builtin::unary("sinh", f64::sinh),
        Builtin::unary("cosh", f64::cosh),
        Builtin::unary("tanh", f64::tanh),
        Builtin::unary("sqrt", f64::sqrt),
        Builtin::unary("exp", f64::exp),
        Builtin::unary("abs", f64::abs),
        Builtin { name: "log", angle_input: false, func: BuiltinFn::UnaryOrBinary(log) },
    ]
    .into_iter()
    .map(|builtin| (builtin.name, builtin))
    .collect()
});

/// The named constants available to numeric evaluation.
pub const CONSTANTS: [(&str, f64); 2] = [
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
];

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use super::*;

    #[test]
    fn log_bases() {
        assert_float_absolute_eq!(log(8.0, Some(2.0)), 3.0);
        assert_float_absolute_eq!(log(std::f64::consts::E, None), 1.0);
    }

    #[test]
    fn only_trig_takes_angles() {
        let angled = BUILTINS.values().filter(|b| b.angle_input).map(|b| b.name).collect::<std::collections::HashSet<_>>();
        assert_eq!(angled, ["sin", "cos", "tan"].into_iter().collect());
        assert_eq!(BUILTINS["log"].max_args(), 2);
    }
}
