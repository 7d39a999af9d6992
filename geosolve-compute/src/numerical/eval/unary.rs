use geosolve_error::Error;
use geosolve_parser::parser::{ast::unary::Unary, op::UnaryOpKind};
use crate::numerical::{eval::Eval, namespace::Namespace, value::Value};

impl Eval for Unary {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        let operand = self.operand.eval(ns)?;
        Ok(match self.op.kind {
            UnaryOpKind::Neg => operand.map(|n| -n),
            UnaryOpKind::Pos => operand,
        })
    }
}
