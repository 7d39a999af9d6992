use geosolve_error::Error;
use geosolve_parser::parser::ast::expr::Expr;
use crate::numerical::{eval::Eval, namespace::Namespace, value::Value};

impl Eval for Expr {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        match self {
            Expr::Literal(literal) => literal.eval(ns),
            Expr::Call(call) => call.eval(ns),
            Expr::Paren(paren) => paren.expr.eval(ns),
            Expr::Unary(unary) => unary.eval(ns),
            Expr::Binary(binary) => binary.eval(ns),
        }
    }
}
