//! Dynamic value container
//!
//! `Value` holds exactly one of a closed set of kinds. Conversions to native
//! types go through [`FromValue`] and follow a fixed coercion table (see
//! `convert.rs`); generic code branches on the stored kind through
//! [`ValueVisitor`].

mod args;
mod convert;
mod visitor;

pub use args::Args;
pub use convert::{FromValue, IntoValue, MapType, NativeEnum, Param};
pub use visitor::{TypeNameVisitor, ValueVisitor};

#[doc(hidden)]
pub use convert::{enum_from_value, enum_into_value, user_from_value};

use std::cmp::Ordering;
use std::fmt;

use crate::error::ReflectResult;
use crate::object::{EnumObject, UserObject};

/// Payload-free tag of a [`Value`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    /// No value
    None,
    /// `bool`
    Boolean,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float
    Real,
    /// UTF-8 string
    String,
    /// Instance of a registered enum
    Enum,
    /// Instance of a registered class
    User,
    /// Ordered list of values
    Array,
}

impl ValueKind {
    /// Stable lowercase name
    pub const fn name(self) -> &'static str {
        match self {
            ValueKind::None => "none",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::String => "string",
            ValueKind::Enum => "enum",
            ValueKind::User => "user",
            ValueKind::Array => "array",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-erased dynamic value.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value
    #[default]
    None,
    /// Boolean
    Boolean(bool),
    /// Integer
    Integer(i64),
    /// Real number
    Real(f64),
    /// String
    String(String),
    /// Enum instance
    Enum(EnumObject),
    /// User object instance
    User(UserObject),
    /// Array of values
    Array(Vec<Value>),
}

impl Value {
    /// The none value
    pub const NONE: Value = Value::None;

    /// Kind of the stored payload
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::None => ValueKind::None,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::String(_) => ValueKind::String,
            Value::Enum(_) => ValueKind::Enum,
            Value::User(_) => ValueKind::User,
            Value::Array(_) => ValueKind::Array,
        }
    }

    /// Check if this is the none value
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Get as bool if this is a boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as i64 if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as f64 if this is a real
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Get as str if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the enum object if this is an enum instance
    pub fn as_enum(&self) -> Option<&EnumObject> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }

    /// Get the user object if this is a user object instance
    pub fn as_user(&self) -> Option<&UserObject> {
        match self {
            Value::User(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get the user object mutably if this is a user object instance
    pub fn as_user_mut(&mut self) -> Option<&mut UserObject> {
        match self {
            Value::User(obj) => Some(obj),
            _ => None,
        }
    }

    /// Get the elements if this is an array
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Dispatch to the visitor method matching the stored kind
    pub fn visit<V: ValueVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            Value::None => visitor.visit_none(),
            Value::Boolean(b) => visitor.visit_bool(*b),
            Value::Integer(i) => visitor.visit_integer(*i),
            Value::Real(r) => visitor.visit_real(*r),
            Value::String(s) => visitor.visit_string(s),
            Value::Enum(e) => visitor.visit_enum(e),
            Value::User(obj) => visitor.visit_user(obj),
            Value::Array(items) => visitor.visit_array(items),
        }
    }

    /// Convert to a native type following the coercion table
    pub fn to<T: FromValue>(&self) -> ReflectResult<T> {
        T::from_value(self)
    }

    /// Human-readable type of the stored value.
    ///
    /// Enum and user objects report their descriptor's name.
    pub fn type_name(&self) -> String {
        self.visit(&mut TypeNameVisitor)
    }
}

// ============================================================================
// Construction
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(i: $ty) -> Self {
                    Value::Integer(i64::from(i))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(r: f32) -> Self {
        Value::Real(f64::from(r))
    }
}

impl From<f64> for Value {
    fn from(r: f64) -> Self {
        Value::Real(r)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<EnumObject> for Value {
    fn from(e: EnumObject) -> Self {
        Value::Enum(e)
    }
}

impl From<UserObject> for Value {
    fn from(obj: UserObject) -> Self {
        Value::User(obj)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

// ============================================================================
// Comparison
// ============================================================================

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Real(a), Value::Real(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::User(a), Value::User(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::None, Value::None) => Some(Ordering::Equal),
            (Value::Boolean(a), Value::Boolean(b)) => a.partial_cmp(b),
            (Value::Integer(a), Value::Integer(b)) => a.partial_cmp(b),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Enum(a), Value::Enum(b)) => a.partial_cmp(b),
            (Value::User(a), Value::User(b)) => a.partial_cmp(b),
            (Value::Array(a), Value::Array(b)) => a.partial_cmp(b),
            _ => self.kind().partial_cmp(&other.kind()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, "none"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Real(r) => write!(f, "{}", convert::format_real(*r)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Enum(e) => write!(f, "{}", e),
            Value::User(obj) => write!(f, "{}", obj.describe()),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind() {
        assert_eq!(Value::None.kind(), ValueKind::None);
        assert_eq!(Value::from(true).kind(), ValueKind::Boolean);
        assert_eq!(Value::from(42u8).kind(), ValueKind::Integer);
        assert_eq!(Value::from(1.5f32).kind(), ValueKind::Real);
        assert_eq!(Value::from("abc").kind(), ValueKind::String);
        assert_eq!(Value::from(vec![Value::None]).kind(), ValueKind::Array);
        assert_eq!(Value::from(()).kind(), ValueKind::None);
    }

    #[test]
    fn test_accessors_do_not_coerce() {
        let v = Value::from(5);
        assert_eq!(v.as_integer(), Some(5));
        assert_eq!(v.as_real(), None);
        assert_eq!(v.as_bool(), None);
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert!(Value::default().is_none());
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(Value::from(1), Value::from(1i64));
        assert_ne!(Value::from(1), Value::from(1.0));
        assert_ne!(Value::from("1"), Value::from(1));

        let a = Value::from(vec![Value::from(1), Value::from("two")]);
        let b = Value::from(vec![Value::from(1), Value::from("two")]);
        let c = Value::from(vec![Value::from(1)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_ordering() {
        assert!(Value::from(1) < Value::from(2));
        assert!(Value::from("a") < Value::from("b"));
        // Different kinds order by kind
        assert!(Value::None < Value::from(false));
        assert!(Value::from(100) < Value::from(0.5));
        assert_eq!(
            Value::from(f64::NAN).partial_cmp(&Value::from(f64::NAN)),
            None
        );
        let short = Value::from(vec![Value::from(1)]);
        let long = Value::from(vec![Value::from(1), Value::from(0)]);
        assert!(short < long);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::None.to_string(), "none");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        let arr = Value::from(vec![Value::from(1), Value::from(true)]);
        assert_eq!(arr.to_string(), "[1, true]");
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ValueKind::Integer.to_string(), "integer");
        assert_eq!(ValueKind::User.name(), "user");
    }
}
