mod binary;
mod call;
mod expr;
mod literal;
mod unary;

use geosolve_error::Error;
use std::ops::Range;
use super::{error::MathDomain, namespace::Namespace, value::Value};

/// Any type that can be evaluated to produce a value.
pub trait Eval {
    /// Evaluate the expression to produce a value, using the given namespace.
    fn eval(&self, ns: &Namespace) -> Result<Value, Error>;

    /// Evaluate the expression to produce a value, using the default namespace.
    fn eval_default(&self) -> Result<Value, Error> {
        self.eval(&Namespace::default())
    }
}

/// Reports an error if `output` has a non-finite element where every input is finite.
fn check_finite(output: Value, inputs: &[&Value], span: Range<usize>) -> Result<Value, Error> {
    match output.first_invalid(inputs) {
        Some(index) => {
            let input = inputs
                .iter()
                .map(|value| value.get(index).to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Err(Error::new(vec![span], MathDomain { input }))
        },
        None => Ok(output),
    }
}
