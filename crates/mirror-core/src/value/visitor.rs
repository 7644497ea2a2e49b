//! Double-dispatch over the kinds of a [`Value`]
//!
//! A visitor implements the methods for the kinds it cares about; every
//! other kind lands in [`ValueVisitor::visit_other`].

use super::{Value, ValueKind};
use crate::object::{EnumObject, UserObject};

/// Visitor over the closed set of value kinds.
///
/// Passed to [`Value::visit`], which calls exactly one method.
pub trait ValueVisitor {
    /// Result produced for every kind
    type Output;

    /// Fallback for kinds the visitor does not specialize
    fn visit_other(&mut self, kind: ValueKind) -> Self::Output;

    /// None
    fn visit_none(&mut self) -> Self::Output {
        self.visit_other(ValueKind::None)
    }

    /// Boolean
    fn visit_bool(&mut self, _value: bool) -> Self::Output {
        self.visit_other(ValueKind::Boolean)
    }

    /// Integer
    fn visit_integer(&mut self, _value: i64) -> Self::Output {
        self.visit_other(ValueKind::Integer)
    }

    /// Real
    fn visit_real(&mut self, _value: f64) -> Self::Output {
        self.visit_other(ValueKind::Real)
    }

    /// String
    fn visit_string(&mut self, _value: &str) -> Self::Output {
        self.visit_other(ValueKind::String)
    }

    /// Enum instance
    fn visit_enum(&mut self, _value: &EnumObject) -> Self::Output {
        self.visit_other(ValueKind::Enum)
    }

    /// User object
    fn visit_user(&mut self, _value: &UserObject) -> Self::Output {
        self.visit_other(ValueKind::User)
    }

    /// Array
    fn visit_array(&mut self, _items: &[Value]) -> Self::Output {
        self.visit_other(ValueKind::Array)
    }
}

/// Names the type of a value, using descriptor names for enum and user objects.
pub struct TypeNameVisitor;

impl ValueVisitor for TypeNameVisitor {
    type Output = String;

    fn visit_other(&mut self, kind: ValueKind) -> String {
        kind.name().to_string()
    }

    fn visit_enum(&mut self, value: &EnumObject) -> String {
        value.descriptor().name().to_string()
    }

    fn visit_user(&mut self, value: &UserObject) -> String {
        match value.class() {
            Some(class) => class.name().to_string(),
            None => "null object".to_string(),
        }
    }

    fn visit_array(&mut self, items: &[Value]) -> String {
        format!("array[{}]", items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts numeric payloads, everything else is zero
    struct NumericVisitor;

    impl ValueVisitor for NumericVisitor {
        type Output = f64;

        fn visit_other(&mut self, _kind: ValueKind) -> f64 {
            0.0
        }

        fn visit_integer(&mut self, value: i64) -> f64 {
            value as f64
        }

        fn visit_real(&mut self, value: f64) -> f64 {
            value
        }

        fn visit_array(&mut self, items: &[Value]) -> f64 {
            items.iter().map(|item| item.visit(self)).sum()
        }
    }

    #[test]
    fn test_visitor_dispatch() {
        let mut visitor = NumericVisitor;
        assert_eq!(Value::from(3).visit(&mut visitor), 3.0);
        assert_eq!(Value::from(1.5).visit(&mut visitor), 1.5);
        assert_eq!(Value::from("x").visit(&mut visitor), 0.0);

        let nested = Value::from(vec![
            Value::from(1),
            Value::from(vec![Value::from(2), Value::from(0.5)]),
            Value::from(true),
        ]);
        assert_eq!(nested.visit(&mut visitor), 3.5);
    }

    #[test]
    fn test_type_name_visitor() {
        assert_eq!(Value::None.type_name(), "none");
        assert_eq!(Value::from(1).type_name(), "integer");
        assert_eq!(Value::from(vec![Value::None]).type_name(), "array[1]");
        assert_eq!(Value::from(UserObject::nothing()).type_name(), "null object");
    }
}
