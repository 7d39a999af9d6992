use geosolve_error::Error;
use geosolve_parser::parser::{ast::binary::Binary, op::BinOpKind};
use crate::numerical::{
    error::DivisionByZero,
    eval::{check_finite, Eval},
    namespace::Namespace,
    value::Value,
};

impl Eval for Binary {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        let left = self.lhs.eval(ns)?;
        let right = self.rhs.eval(ns)?;

        let output = match self.op.kind {
            BinOpKind::Add => left.zip_with(&right, |a, b| a + b),
            BinOpKind::Sub => left.zip_with(&right, |a, b| a - b),
            BinOpKind::Mul => left.zip_with(&right, |a, b| a * b),
            BinOpKind::Div => {
                if right.as_slice().iter().any(|n| *n == 0.0) {
                    return Err(Error::new(vec![self.op.span.clone(), self.rhs.span()], DivisionByZero));
                }
                left.zip_with(&right, |a, b| a / b)
            },
            BinOpKind::Exp => {
                let zero_to_negative = (0..left.len().max(right.len()))
                    .any(|i| left.get(i) == 0.0 && right.get(i) < 0.0);
                if zero_to_negative {
                    return Err(Error::new(vec![self.span()], DivisionByZero));
                }
                left.zip_with(&right, f64::powf)
            },
        };

        check_finite(output, &[&left, &right], self.span())
    }
}
