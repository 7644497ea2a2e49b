//! Conversion traits between [`Value`] and native Rust types
//!
//! # Coercion table
//!
//! ```text
//! from \ to   bool        integers        reals     String          enum      class    Vec<T>
//! None        -           -               -         -               -         -        -
//! Boolean     yes         0 / 1           0 / 1     "true"/"false"  -         -        -
//! Integer     != 0        range-checked   widen     decimal         declared  -        -
//! Real        != 0        truncate        checked   shortest        -         -        -
//! String      lexicon     parse           parse     yes             -         -        -
//! Enum        -           -               -         -               same      -        -
//! User        -           -               -         -               -         same     -
//! Array       -           -               -         -               -         -        per item
//! ```
//!
//! Enum and user objects are never coerced to primitives. Reals render as
//! the shortest decimal that parses back to the same value, in exponent form
//! below 1e-5 and from 1e16 upward. Narrowing a real to `f32` fails when the
//! result would overflow.

use std::any::{Any, TypeId};

use super::{Value, ValueKind};
use crate::defaults::{FALSE_WORDS, TRUE_WORDS};
use crate::error::{ReflectError, ReflectResult};
use crate::meta::check_arg;
use crate::object::{EnumObject, UserObject};
use crate::registry::Registry;

/// Maps a native type to the value kind it is stored as.
pub trait MapType: 'static {
    /// Storage kind of `Self`
    fn map_type() -> ValueKind;

    /// Check the items of an array value against the element type.
    ///
    /// Only collection types inspect their items.
    fn check_items(_items: &[Value], _registry: &Registry) -> bool {
        true
    }
}

/// Convert from a [`Value`] to a native type.
pub trait FromValue: Sized {
    /// Convert, returning `TypeConversion` if no coercion rule applies
    fn from_value(value: &Value) -> ReflectResult<Self>;
}

/// Convert from a native type to a [`Value`].
///
/// Enum and user types need the registry to find their descriptor.
pub trait IntoValue {
    /// Convert into a value
    fn into_value(self, registry: &Registry) -> ReflectResult<Value>;
}

/// A type usable as a constructor or function parameter.
pub trait Param: MapType + FromValue {}

impl<T: MapType + FromValue> Param for T {}

/// Fieldless native enum with an integer representation.
///
/// Implemented through [`enum_type!`](crate::enum_type).
pub trait NativeEnum: Copy + 'static {
    /// Integer value of the variant
    fn to_i64(self) -> i64;

    /// Variant with the given integer value
    fn from_i64(value: i64) -> Option<Self>;
}

// ============================================================================
// Coercion rules
// ============================================================================

fn coerce_bool(value: &Value) -> ReflectResult<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::Integer(i) => Ok(*i != 0),
        Value::Real(r) => Ok(*r != 0.0),
        Value::String(s) if TRUE_WORDS.contains(&s.as_str()) => Ok(true),
        Value::String(s) if FALSE_WORDS.contains(&s.as_str()) => Ok(false),
        other => Err(ReflectError::conversion(describe(other), "bool")),
    }
}

fn coerce_integer(value: &Value, target: &str) -> ReflectResult<i64> {
    match value {
        Value::Boolean(b) => Ok(i64::from(*b)),
        Value::Integer(i) => Ok(*i),
        // i64::MAX as f64 rounds up to 2^63, hence the strict upper bound
        Value::Real(r) if r.is_finite() && *r >= i64::MIN as f64 && *r < i64::MAX as f64 => {
            Ok(r.trunc() as i64)
        }
        Value::String(s) => s
            .parse::<i64>()
            .map_err(|_| ReflectError::conversion(describe(value), target)),
        other => Err(ReflectError::conversion(describe(other), target)),
    }
}

fn coerce_real(value: &Value, target: &str) -> ReflectResult<f64> {
    match value {
        Value::Boolean(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Integer(i) => Ok(*i as f64),
        Value::Real(r) => Ok(*r),
        Value::String(s) => s
            .parse::<f64>()
            .map_err(|_| ReflectError::conversion(describe(value), target)),
        other => Err(ReflectError::conversion(describe(other), target)),
    }
}

fn coerce_string(value: &Value) -> ReflectResult<String> {
    match value {
        Value::Boolean(b) => Ok(b.to_string()),
        Value::Integer(i) => Ok(i.to_string()),
        Value::Real(r) => Ok(format_real(*r)),
        Value::String(s) => Ok(s.clone()),
        other => Err(ReflectError::conversion(describe(other), "String")),
    }
}

/// Shortest round-trip rendering of a real, in exponent form for extreme magnitudes
pub(super) fn format_real(r: f64) -> String {
    let magnitude = r.abs();
    if r.is_finite() && magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        format!("{:e}", r)
    } else {
        r.to_string()
    }
}

/// Describe a value for conversion errors
fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("string {:?}", s),
        Value::Integer(i) => format!("integer {}", i),
        Value::Real(r) => format!("real {}", r),
        other => other.type_name(),
    }
}

// ============================================================================
// Primitive implementations
// ============================================================================

impl MapType for bool {
    fn map_type() -> ValueKind {
        ValueKind::Boolean
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        coerce_bool(value)
    }
}

impl IntoValue for bool {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::Boolean(self))
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl MapType for $ty {
                fn map_type() -> ValueKind {
                    ValueKind::Integer
                }
            }

            impl FromValue for $ty {
                fn from_value(value: &Value) -> ReflectResult<Self> {
                    let i = coerce_integer(value, stringify!($ty))?;
                    <$ty>::try_from(i).map_err(|_| {
                        ReflectError::conversion(format!("integer {}", i), stringify!($ty))
                    })
                }
            }

            impl IntoValue for $ty {
                #[allow(clippy::useless_conversion)]
                fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
                    i64::try_from(self).map(Value::Integer).map_err(|_| {
                        ReflectError::conversion(format!("{} {}", stringify!($ty), self), "integer")
                    })
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl MapType for f64 {
    fn map_type() -> ValueKind {
        ValueKind::Real
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        coerce_real(value, "f64")
    }
}

impl IntoValue for f64 {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::Real(self))
    }
}

impl MapType for f32 {
    fn map_type() -> ValueKind {
        ValueKind::Real
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        let r = coerce_real(value, "f32")?;
        let narrowed = r as f32;
        if r.is_finite() && !narrowed.is_finite() {
            return Err(ReflectError::conversion(describe(value), "f32"));
        }
        Ok(narrowed)
    }
}

impl IntoValue for f32 {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::Real(f64::from(self)))
    }
}

impl MapType for String {
    fn map_type() -> ValueKind {
        ValueKind::String
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        coerce_string(value)
    }
}

impl IntoValue for String {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::String(self))
    }
}

impl IntoValue for &str {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::String(self.to_string()))
    }
}

impl IntoValue for () {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::None)
    }
}

// ============================================================================
// Dynamic and composite implementations
// ============================================================================

impl FromValue for Value {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        Ok(value.clone())
    }
}

impl IntoValue for Value {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(self)
    }
}

impl FromValue for UserObject {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        match value {
            Value::User(obj) => Ok(obj.clone()),
            other => Err(ReflectError::conversion(describe(other), "UserObject")),
        }
    }
}

impl IntoValue for UserObject {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::User(self))
    }
}

impl FromValue for EnumObject {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        match value {
            Value::Enum(e) => Ok(e.clone()),
            other => Err(ReflectError::conversion(describe(other), "EnumObject")),
        }
    }
}

impl IntoValue for EnumObject {
    fn into_value(self, _registry: &Registry) -> ReflectResult<Value> {
        Ok(Value::Enum(self))
    }
}

impl<T: MapType> MapType for Vec<T> {
    fn map_type() -> ValueKind {
        ValueKind::Array
    }

    fn check_items(items: &[Value], registry: &Registry) -> bool {
        items.iter().all(|item| check_arg::<T>(item, registry))
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        match value {
            Value::Array(items) => items.iter().map(T::from_value).collect(),
            other => Err(ReflectError::conversion(
                describe(other),
                std::any::type_name::<Self>(),
            )),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self, registry: &Registry) -> ReflectResult<Value> {
        self.into_iter()
            .map(|item| item.into_value(registry))
            .collect::<ReflectResult<Vec<_>>>()
            .map(Value::Array)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> ReflectResult<Self> {
        match value {
            Value::None => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self, registry: &Registry) -> ReflectResult<Value> {
        match self {
            Some(inner) => inner.into_value(registry),
            None => Ok(Value::None),
        }
    }
}

// Fallible native functions propagate their error
impl<T: IntoValue> IntoValue for ReflectResult<T> {
    fn into_value(self, registry: &Registry) -> ReflectResult<Value> {
        self?.into_value(registry)
    }
}

// ============================================================================
// Helpers for user and enum types (used by `user_type!` / `enum_type!`)
// ============================================================================

/// Extract a copy of a native class instance from a user object value
pub fn user_from_value<T: Any + Clone>(value: &Value) -> ReflectResult<T> {
    match value {
        Value::User(obj) => obj.get::<T>().cloned(),
        other => Err(ReflectError::conversion(
            describe(other),
            std::any::type_name::<T>(),
        )),
    }
}

/// Extract a native enum variant from an enum object or integer value
pub fn enum_from_value<E: NativeEnum>(value: &Value) -> ReflectResult<E> {
    let target = std::any::type_name::<E>();
    match value {
        Value::Enum(e) if e.descriptor().native_type_id() == TypeId::of::<E>() => E::from_i64(e.value())
            .ok_or_else(|| ReflectError::conversion(e.to_string(), target)),
        Value::Integer(i) => {
            E::from_i64(*i).ok_or_else(|| ReflectError::conversion(describe(value), target))
        }
        other => Err(ReflectError::conversion(describe(other), target)),
    }
}

/// Wrap a native enum variant into an enum object value
pub fn enum_into_value<E: NativeEnum>(variant: E, registry: &Registry) -> ReflectResult<Value> {
    registry.enum_object(variant).map(Value::Enum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_widens_to_real() {
        assert_eq!(Value::from(5).to::<f64>().unwrap(), 5.0);
        assert_eq!(Value::from(-2).to::<f32>().unwrap(), -2.0);
    }

    #[test]
    fn test_string_to_integer_fails() {
        let err = Value::from("abc").to::<i32>().unwrap_err();
        assert!(matches!(err, ReflectError::TypeConversion { .. }));
        assert_eq!(Value::from("42").to::<i32>().unwrap(), 42);
        assert_eq!(Value::from("-7").to::<i64>().unwrap(), -7);
    }

    #[test]
    fn test_integer_narrowing_is_range_checked() {
        assert_eq!(Value::from(200).to::<u8>().unwrap(), 200);
        assert!(Value::from(300).to::<u8>().is_err());
        assert!(Value::from(-1).to::<u32>().is_err());
        assert_eq!(Value::from(-1).to::<i8>().unwrap(), -1);
    }

    #[test]
    fn test_real_to_integer_truncates() {
        assert_eq!(Value::from(3.9).to::<i64>().unwrap(), 3);
        assert_eq!(Value::from(-3.9).to::<i64>().unwrap(), -3);
        assert!(Value::from(f64::NAN).to::<i64>().is_err());
        assert!(Value::from(f64::INFINITY).to::<i64>().is_err());
        assert!(Value::from(1e30).to::<i64>().is_err());
    }

    #[test]
    fn test_bool_lexicon() {
        assert!(Value::from("true").to::<bool>().unwrap());
        assert!(Value::from("1").to::<bool>().unwrap());
        assert!(!Value::from("false").to::<bool>().unwrap());
        assert!(!Value::from("0").to::<bool>().unwrap());
        assert!(Value::from("yes").to::<bool>().is_err());
        assert!(Value::from(2).to::<bool>().unwrap());
        assert!(!Value::from(0.0).to::<bool>().unwrap());
    }

    #[test]
    fn test_to_string() {
        assert_eq!(Value::from(true).to::<String>().unwrap(), "true");
        assert_eq!(Value::from(12).to::<String>().unwrap(), "12");
        assert_eq!(Value::from(2.5).to::<String>().unwrap(), "2.5");
        assert!(Value::None.to::<String>().is_err());
        assert!(Value::from(vec![]).to::<String>().is_err());
    }

    #[test]
    fn test_real_formatting() {
        assert_eq!(Value::from(1e300).to::<String>().unwrap(), "1e300");
        assert_eq!(Value::from(-1.5e-7).to::<String>().unwrap(), "-1.5e-7");
        assert_eq!(Value::from(123456.5).to::<String>().unwrap(), "123456.5");
        assert_eq!(Value::from(0.0).to::<String>().unwrap(), "0");
        assert_eq!(Value::from(1e16).to::<String>().unwrap(), "1e16");
        assert_eq!(Value::from(1e300).to_string(), "1e300");
        assert_eq!(Value::from(f64::INFINITY).to::<String>().unwrap(), "inf");
    }

    #[test]
    fn test_real_narrowing_to_f32() {
        assert_eq!(Value::from(1.5).to::<f32>().unwrap(), 1.5);
        assert!(Value::from(1e300).to::<f32>().is_err());
        assert!(Value::from(-1e300).to::<f32>().is_err());
        assert!(Value::from("1e40").to::<f32>().is_err());
        assert_eq!(Value::from(f64::INFINITY).to::<f32>().unwrap(), f32::INFINITY);
        assert!(Value::from(f64::NAN).to::<f32>().unwrap().is_nan());
    }

    #[test]
    fn test_none_converts_to_nothing_primitive() {
        assert!(Value::None.to::<bool>().is_err());
        assert!(Value::None.to::<i64>().is_err());
        assert!(Value::None.to::<f64>().is_err());
        assert_eq!(Value::None.to::<Option<i64>>().unwrap(), None);
        assert_eq!(Value::from(4).to::<Option<i64>>().unwrap(), Some(4));
    }

    #[test]
    fn test_array_conversion() {
        let arr = Value::from(vec![Value::from(1), Value::from(2.0), Value::from("3")]);
        assert_eq!(arr.to::<Vec<i64>>().unwrap(), vec![1, 2, 3]);
        assert!(arr.to::<i64>().is_err());
        assert!(Value::from(1).to::<Vec<i64>>().is_err());

        let bad = Value::from(vec![Value::from("x")]);
        assert!(bad.to::<Vec<i64>>().is_err());
    }

    #[test]
    fn test_into_value_primitives() {
        let registry = Registry::new();
        assert_eq!(7u16.into_value(&registry).unwrap(), Value::from(7));
        assert_eq!("s".into_value(&registry).unwrap(), Value::from("s"));
        assert_eq!(().into_value(&registry).unwrap(), Value::None);
        assert!(u64::MAX.into_value(&registry).is_err());
        assert_eq!(
            vec![1, 2].into_value(&registry).unwrap(),
            Value::from(vec![Value::from(1), Value::from(2)])
        );
        let failing: ReflectResult<i32> = Err(ReflectError::registration("boom"));
        assert!(failing.into_value(&registry).is_err());
    }

    #[test]
    fn test_map_type() {
        assert_eq!(i16::map_type(), ValueKind::Integer);
        assert_eq!(f32::map_type(), ValueKind::Real);
        assert_eq!(String::map_type(), ValueKind::String);
        assert_eq!(<Vec<bool>>::map_type(), ValueKind::Array);
    }
}
