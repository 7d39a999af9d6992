use geosolve_error::Error;
use geosolve_parser::parser::ast::literal::Literal;
use crate::numerical::{
    error::{InvalidNumber, UndefinedVariable},
    eval::Eval,
    namespace::Namespace,
    value::Value,
};

impl Eval for Literal {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        match self {
            Literal::Integer(int) => parse_number(&int.value, int.span.clone()),
            Literal::Float(float) => parse_number(&float.value, float.span.clone()),
            Literal::Symbol(sym) => ns
                .get_var(&sym.name)
                .cloned()
                .ok_or_else(|| Error::new(vec![sym.span.clone()], UndefinedVariable {
                    name: sym.name.clone(),
                })),
        }
    }
}

fn parse_number(literal: &str, span: std::ops::Range<usize>) -> Result<Value, Error> {
    literal
        .parse::<f64>()
        .map(Value::Scalar)
        .map_err(|_| Error::new(vec![span], InvalidNumber { literal: literal.to_string() }))
}
