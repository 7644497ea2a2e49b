//! Argument compatibility checks
//!
//! A value is compatible with a native type when it is directly mappable to
//! it, not merely convertible. Enum and user objects are matched by
//! descriptor identity, since many native types share their storage kind.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::object::{EnumObject, UserObject};
use crate::registry::Registry;
use crate::value::{MapType, Value, ValueKind, ValueVisitor};

/// Checks the kind of the visited value against the native type `T`.
pub struct CheckTypeVisitor<'r, T> {
    registry: &'r Registry,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: MapType> CheckTypeVisitor<'r, T> {
    /// Create a visitor resolving descriptors through `registry`
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            _marker: PhantomData,
        }
    }
}

impl<T: MapType> ValueVisitor for CheckTypeVisitor<'_, T> {
    type Output = bool;

    fn visit_other(&mut self, kind: ValueKind) -> bool {
        T::map_type() == kind
    }

    fn visit_array(&mut self, items: &[Value]) -> bool {
        T::map_type() == ValueKind::Array && T::check_items(items, self.registry)
    }

    fn visit_enum(&mut self, value: &EnumObject) -> bool {
        self.registry
            .enum_by_type_safe::<T>()
            .is_some_and(|target| Arc::ptr_eq(target, value.descriptor()))
    }

    fn visit_user(&mut self, value: &UserObject) -> bool {
        match value.class() {
            Some(class) => self
                .registry
                .class_by_type_safe::<T>()
                .is_some_and(|target| Arc::ptr_eq(target, class)),
            None => false,
        }
    }
}

/// Check if `value` is compatible with the native type `T`
pub fn check_arg<T: MapType>(value: &Value, registry: &Registry) -> bool {
    value.visit(&mut CheckTypeVisitor::<T>::new(registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Meters(f64);

    #[derive(Clone)]
    struct Seconds(f64);

    crate::user_type!(Meters, Seconds);

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Axis {
        X,
        Y,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Channel {
        Left,
        Right,
    }

    crate::enum_type!(Axis { X, Y });
    crate::enum_type!(Channel { Left, Right });

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.declare_class::<Meters>("Meters").register().unwrap();
        registry.declare_class::<Seconds>("Seconds").register().unwrap();
        registry
            .declare_enum::<Axis>("Axis")
            .value("X", Axis::X)
            .value("Y", Axis::Y)
            .register()
            .unwrap();
        registry
            .declare_enum::<Channel>("Channel")
            .value("Left", Channel::Left)
            .value("Right", Channel::Right)
            .register()
            .unwrap();
        registry
    }

    #[test]
    fn test_primitive_kinds() {
        let registry = registry();
        assert!(check_arg::<i32>(&Value::from(1), &registry));
        assert!(check_arg::<u8>(&Value::from(1), &registry));
        assert!(!check_arg::<f64>(&Value::from(1), &registry));
        assert!(check_arg::<f64>(&Value::from(1.0), &registry));
        assert!(check_arg::<String>(&Value::from("s"), &registry));
        assert!(!check_arg::<String>(&Value::None, &registry));
        assert!(check_arg::<Vec<i64>>(&Value::from(vec![]), &registry));
    }

    #[test]
    fn test_user_objects_checked_by_class_identity() {
        let registry = registry();
        let meters = Value::User(registry.user_object(Meters(1.0)).unwrap());
        let seconds = Value::User(registry.user_object(Seconds(1.0)).unwrap());

        assert!(check_arg::<Meters>(&meters, &registry));
        assert!(!check_arg::<Seconds>(&meters, &registry));
        assert!(check_arg::<Seconds>(&seconds, &registry));
        assert!(!check_arg::<f64>(&meters, &registry));
        assert!(!check_arg::<Meters>(&Value::User(UserObject::nothing()), &registry));
    }

    #[test]
    fn test_enum_objects_checked_by_descriptor_identity() {
        let registry = registry();
        let axis = Value::Enum(registry.enum_object(Axis::Y).unwrap());
        let channel = Value::Enum(registry.enum_object(Channel::Left).unwrap());

        assert!(check_arg::<Axis>(&axis, &registry));
        assert!(!check_arg::<Channel>(&axis, &registry));
        assert!(check_arg::<Channel>(&channel, &registry));
        assert!(!check_arg::<i64>(&axis, &registry));
        // Plain integers are not enum objects
        assert!(!check_arg::<Axis>(&Value::from(0), &registry));
    }

    #[test]
    fn test_array_items_checked_against_element_type() {
        let registry = registry();
        let words = Value::from(vec![Value::from("a"), Value::from("b")]);
        assert!(!check_arg::<Vec<i64>>(&words, &registry));
        assert!(check_arg::<Vec<String>>(&words, &registry));

        let mixed = Value::from(vec![Value::from(1), Value::from(2.0)]);
        assert!(!check_arg::<Vec<i64>>(&mixed, &registry));
        assert!(!check_arg::<Vec<f64>>(&mixed, &registry));

        let nested = Value::from(vec![Value::from(vec![Value::from(1)])]);
        assert!(check_arg::<Vec<Vec<i64>>>(&nested, &registry));
        assert!(!check_arg::<Vec<Vec<String>>>(&nested, &registry));

        let axes = Value::from(vec![Value::Enum(registry.enum_object(Axis::X).unwrap())]);
        assert!(check_arg::<Vec<Axis>>(&axes, &registry));
        assert!(!check_arg::<Vec<Channel>>(&axes, &registry));
    }

    #[test]
    fn test_unregistered_type_never_matches() {
        let populated = registry();
        let empty = Registry::new();
        let meters = Value::User(populated.user_object(Meters(2.0)).unwrap());
        assert!(!check_arg::<Meters>(&meters, &empty));
    }
}
