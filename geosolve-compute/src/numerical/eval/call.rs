use geosolve_error::Error;
use geosolve_parser::parser::ast::call::Call;
use crate::numerical::{
    builtins::BuiltinFn,
    error::{UndefinedFunction, WrongArgumentCount},
    eval::{check_finite, Eval},
    namespace::Namespace,
    value::Value,
};

impl Eval for Call {
    fn eval(&self, ns: &Namespace) -> Result<Value, Error> {
        let name = &self.name.name;
        let builtin = ns.get_func(name).ok_or_else(|| {
            Error::new(vec![self.name.span.clone()], UndefinedFunction {
                name: name.clone(),
                suggestions: ns.similar_funcs(name),
            })
        })?;

        let (min, max) = (builtin.min_args(), builtin.max_args());
        if !(min..=max).contains(&self.args.len()) {
            let expected = if min == max { min.to_string() } else { format!("{} or {}", min, max) };
            return Err(Error::new(self.outer_span().to_vec(), WrongArgumentCount {
                name: name.clone(),
                expected,
                given: self.args.len(),
            }));
        }

        let args = self.args
            .iter()
            .map(|arg| arg.eval(ns))
            .collect::<Result<Vec<_>, _>>()?;
        let [first, rest @ ..] = args.as_slice() else {
            unreachable!("argument count is checked above")
        };

        let first = if builtin.angle_input {
            let mode = ns.trig_mode();
            first.map(|angle| mode.to_radians(angle))
        } else {
            first.clone()
        };

        let output = match (builtin.func, rest.first()) {
            (BuiltinFn::Unary(f), _) => first.map(f),
            (BuiltinFn::UnaryOrBinary(f), None) => first.map(|n| f(n, None)),
            (BuiltinFn::UnaryOrBinary(f), Some(second)) => first.zip_with(second, |a, b| f(a, Some(b))),
        };

        let mut inputs = vec![&first];
        inputs.extend(rest.iter());
        check_finite(output, &inputs, self.span())
    }
}
