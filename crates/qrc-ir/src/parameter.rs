//! Parameter expressions for parameterized circuits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, Range};

/// A symbolic or concrete gate angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterExpression {
    /// A constant numeric value.
    Constant(f64),
    /// A symbolic parameter, bound to a value before execution.
    Symbol(String),
}

impl ParameterExpression {
    /// Create a constant parameter.
    pub fn constant(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }

    /// Create a symbolic parameter.
    pub fn symbol(name: impl Into<String>) -> Self {
        ParameterExpression::Symbol(name.into())
    }

    /// Check if this expression is still unbound.
    pub fn is_symbolic(&self) -> bool {
        matches!(self, ParameterExpression::Symbol(_))
    }

    /// Try to evaluate as a concrete f64 value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParameterExpression::Constant(v) => Some(*v),
            ParameterExpression::Symbol(_) => None,
        }
    }

    /// Name of the symbol, if this expression is symbolic.
    pub fn symbol_name(&self) -> Option<&str> {
        match self {
            ParameterExpression::Symbol(name) => Some(name),
            ParameterExpression::Constant(_) => None,
        }
    }

    /// Bind a symbol to a value, returning a new expression.
    pub fn bind(&self, name: &str, value: f64) -> Self {
        match self {
            ParameterExpression::Symbol(n) if n == name => ParameterExpression::Constant(value),
            _ => self.clone(),
        }
    }
}

impl fmt::Display for ParameterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterExpression::Constant(v) => write!(f, "{v}"),
            ParameterExpression::Symbol(name) => write!(f, "{name}"),
        }
    }
}

impl From<f64> for ParameterExpression {
    fn from(value: f64) -> Self {
        ParameterExpression::Constant(value)
    }
}

impl From<&ParameterExpression> for ParameterExpression {
    fn from(value: &ParameterExpression) -> Self {
        value.clone()
    }
}

/// An ordered family of symbolic parameters sharing a prefix.
///
/// Element `i` of a vector named `theta` is the symbol `theta[i]`, so every
/// element is addressable by name when binding values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterVector {
    name: String,
    params: Vec<ParameterExpression>,
}

impl ParameterVector {
    /// Allocate `len` symbols named `{name}[0]` .. `{name}[len-1]`.
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        let name = name.into();
        let params = (0..len)
            .map(|i| ParameterExpression::symbol(format!("{name}[{i}]")))
            .collect();
        Self { name, params }
    }

    /// Prefix shared by all elements.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the vector has no elements.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Element at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&ParameterExpression> {
        self.params.get(index)
    }

    /// Contiguous slice of elements.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> &[ParameterExpression] {
        &self.params[range]
    }

    /// Iterate over all elements in order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterExpression> {
        self.params.iter()
    }
}

impl Index<usize> for ParameterVector {
    type Output = ParameterExpression;

    fn index(&self, index: usize) -> &ParameterExpression {
        &self.params[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_constant() {
        let p = ParameterExpression::constant(1.5);
        assert!(!p.is_symbolic());
        assert_eq!(p.as_f64(), Some(1.5));
        assert_eq!(p.symbol_name(), None);
    }

    #[test]
    fn test_symbol() {
        let p = ParameterExpression::symbol("theta");
        assert!(p.is_symbolic());
        assert_eq!(p.as_f64(), None);
        assert_eq!(p.symbol_name(), Some("theta"));
    }

    #[test]
    fn test_bind() {
        let p = ParameterExpression::symbol("theta");
        let bound = p.bind("theta", PI / 2.0);
        assert!(!bound.is_symbolic());
        assert!((bound.as_f64().unwrap() - PI / 2.0).abs() < 1e-10);

        let untouched = p.bind("phi", 1.0);
        assert_eq!(untouched, p);
    }

    #[test]
    fn test_vector_naming() {
        let v = ParameterVector::new("theta", 3);
        assert_eq!(v.name(), "theta");
        assert_eq!(v.len(), 3);
        assert_eq!(v[0].symbol_name(), Some("theta[0]"));
        assert_eq!(v[2].to_string(), "theta[2]");
        assert!(v.get(3).is_none());
    }

    #[test]
    fn test_vector_slice() {
        let v = ParameterVector::new("theta", 6);
        let names: Vec<_> = v
            .slice(2..4)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["theta[2]", "theta[3]"]);
    }
}
