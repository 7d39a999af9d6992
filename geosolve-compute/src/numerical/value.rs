use std::fmt::{self, Display, Formatter};

/// A value produced by numeric evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A single floating-point number.
    Scalar(f64),

    /// A vector of floating-point numbers, such as the samples of a plot.
    Vector(Vec<f64>),
}

impl Value {
    /// Returns the typename of this value.
    pub fn typename(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "Scalar",
            Value::Vector(_) => "Vector",
        }
    }

    /// Returns the number of elements in this value. A scalar has one element.
    pub fn len(&self) -> usize {
        match self {
            Value::Scalar(_) => 1,
            Value::Vector(values) => values.len(),
        }
    }

    /// Returns true if this value is an empty vector.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the element at `index`. A scalar broadcasts to every index.
    pub fn get(&self, index: usize) -> f64 {
        match self {
            Value::Scalar(n) => *n,
            Value::Vector(values) => values.get(index).copied().unwrap_or(f64::NAN),
        }
    }

    /// Returns the elements of this value as a slice.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Value::Scalar(n) => std::slice::from_ref(n),
            Value::Vector(values) => values,
        }
    }

    /// Returns the value as a scalar, if it is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(n) => Some(*n),
            Value::Vector(_) => None,
        }
    }

    /// Applies `f` to every element.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(n) => Value::Scalar(f(*n)),
            Value::Vector(values) => Value::Vector(values.iter().copied().map(f).collect()),
        }
    }

    /// Combines two values element-wise, broadcasting a scalar against a vector. Two vectors are
    /// combined up to the length of the shorter one.
    pub fn zip_with(&self, other: &Value, f: impl Fn(f64, f64) -> f64) -> Value {
        match (self, other) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(f(*a, *b)),
            (Value::Scalar(a), Value::Vector(b)) => Value::Vector(b.iter().map(|b| f(*a, *b)).collect()),
            (Value::Vector(a), Value::Scalar(b)) => Value::Vector(a.iter().map(|a| f(*a, *b)).collect()),
            (Value::Vector(a), Value::Vector(b)) => {
                Value::Vector(a.iter().zip(b.iter()).map(|(a, b)| f(*a, *b)).collect())
            },
        }
    }

    /// Returns the index of the first element that is not finite even though every element of
    /// `inputs` at that index is finite.
    pub fn first_invalid(&self, inputs: &[&Value]) -> Option<usize> {
        self.as_slice()
            .iter()
            .enumerate()
            .position(|(i, out)| !out.is_finite() && inputs.iter().all(|input| input.get(i).is_finite()))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Scalar(n)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Value::Vector(values)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(n) => write!(f, "{}", n),
            Value::Vector(values) => {
                write!(f, "[")?;
                for (i, n) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", n)?;
                }
                write!(f, "]")
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use super::*;

    #[test]
    fn broadcasting() {
        let v = Value::from(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.zip_with(&Value::Scalar(2.0), |a, b| a * b), Value::from(vec![2.0, 4.0, 6.0]));
        assert_eq!(Value::Scalar(1.0).zip_with(&v, |a, b| a - b), Value::from(vec![0.0, -1.0, -2.0]));
    }

    #[test]
    fn invalid_elements() {
        let input = Value::from(vec![1.0, -1.0, f64::NAN]);
        let output = input.map(f64::sqrt);
        assert_eq!(output.first_invalid(&[&input]), Some(1));

        let input = Value::from(vec![4.0, f64::NAN]);
        assert_eq!(input.map(f64::sqrt).first_invalid(&[&input]), None);
    }
}
