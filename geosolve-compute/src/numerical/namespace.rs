use levenshtein::levenshtein;
use std::collections::HashMap;
use super::{builtins::{Builtin, BUILTINS, CONSTANTS}, trig_mode::TrigMode, value::Value};

/// The names visible to numeric evaluation: the builtin functions, the constants `pi` and `e`,
/// and any variables bound by the caller.
#[derive(Debug, Clone)]
pub struct Namespace {
    /// Bound values, including the constants.
    vars: HashMap<String, Value>,

    /// How angle arguments of `sin`, `cos` and `tan` are interpreted.
    trig_mode: TrigMode,
}

impl Default for Namespace {
    fn default() -> Self {
        Self {
            vars: CONSTANTS
                .iter()
                .map(|(name, value)| (name.to_string(), Value::Scalar(*value)))
                .collect(),
            trig_mode: TrigMode::default(),
        }
    }
}

impl Namespace {
    /// Creates the standard namespace, with angles in radians.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the trigonometric mode.
    pub fn with_trig_mode(mut self, trig_mode: TrigMode) -> Self {
        self.trig_mode = trig_mode;
        self
    }

    /// Binds `name` to `value`, shadowing any constant of the same name.
    pub fn with_var(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.vars.insert(name.to_string(), value.into());
        self
    }

    /// The trigonometric mode of this namespace.
    pub fn trig_mode(&self) -> TrigMode {
        self.trig_mode
    }

    /// Returns the value bound to `name`.
    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Returns the builtin function named `name`.
    pub fn get_func(&self, name: &str) -> Option<&'static Builtin> {
        BUILTINS.get(name)
    }

    /// Returns the names of builtin functions that are similar to `name`, for use in error
    /// messages.
    pub fn similar_funcs(&self, name: &str) -> Vec<String> {
        let mut names = BUILTINS
            .keys()
            .filter(|n| levenshtein(n, name) < 2)
            .map(|n| n.to_string())
            .collect::<Vec<_>>();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn suggestions() {
        let ns = Namespace::new();
        assert_eq!(ns.similar_funcs("sinn"), vec!["sin", "sinh"]);
        assert!(ns.similar_funcs("frobnicate").is_empty());
    }

    #[test]
    fn variables_shadow_constants() {
        let ns = Namespace::new().with_var("e", 2.0);
        assert_eq!(ns.get_var("e"), Some(&Value::Scalar(2.0)));
        assert!(ns.get_var("x").is_none());
    }
}
