//! Argument lists for dynamic calls

use std::ops::Index;

use super::Value;

/// Ordered, fixed-length list of actual arguments for one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Vec<Value>,
}

impl Args {
    /// Create an argument list from values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Empty argument list
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of arguments
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no arguments
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Argument at a position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Iterate over the arguments in order
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Arguments as a slice
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl Index<usize> for Args {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        &self.values[index]
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        Self::new(values)
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Args {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Build an [`Args`] list from expressions convertible into [`Value`].
///
/// ```ignore
/// let args = args![1.0, 2.0, "label"];
/// assert_eq!(args.count(), 3);
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::empty()
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Args::new(vec![$($crate::Value::from($arg)),+])
    };
}
