//! Parameter descriptors shared by constructors and functions

use std::any::TypeId;
use std::fmt;
use std::slice;

use super::check::check_arg;
use crate::error::{ReflectError, ReflectResult};
use crate::registry::Registry;
use crate::value::{Args, FromValue, Param, Value, ValueKind};

/// Per-argument compatibility test
pub type ArgCheck = fn(&Value, &Registry) -> bool;

/// Expected native type of one positional parameter.
#[derive(Clone, Copy)]
pub struct ParamInfo {
    kind: ValueKind,
    type_id: TypeId,
    type_name: &'static str,
    check: ArgCheck,
}

impl ParamInfo {
    /// Describe a parameter of native type `T`
    pub fn of<T: Param>() -> Self {
        Self {
            kind: T::map_type(),
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            check: check_arg::<T>,
        }
    }

    /// Storage kind the parameter expects
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Native type of the parameter
    pub fn native_type_id(&self) -> TypeId {
        self.type_id
    }

    /// Native type name of the parameter
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Check whether a value is directly mappable to this parameter
    pub fn accepts(&self, value: &Value, registry: &Registry) -> bool {
        (self.check)(value, registry)
    }
}

impl fmt::Debug for ParamInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParamInfo")
            .field("kind", &self.kind)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// Arity first, then each position in order, stopping at the first failure
pub(crate) fn matches_params(params: &[ParamInfo], args: &Args, registry: &Registry) -> bool {
    args.count() == params.len()
        && params
            .iter()
            .zip(args.iter())
            .all(|(param, value)| param.accepts(value, registry))
}

/// Convert the next positional argument
pub(crate) fn next_arg<A: FromValue>(values: &mut slice::Iter<'_, Value>) -> ReflectResult<A> {
    match values.next() {
        Some(value) => value.to::<A>(),
        None => Err(ReflectError::conversion(
            "missing argument",
            std::any::type_name::<A>(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_info() {
        let param = ParamInfo::of::<f64>();
        assert_eq!(param.kind(), ValueKind::Real);
        assert_eq!(param.native_type_id(), TypeId::of::<f64>());
        assert_eq!(param.type_name(), "f64");
    }

    #[test]
    fn test_matches_params_checks_arity_then_types() {
        let registry = Registry::new();
        let params = [ParamInfo::of::<f64>(), ParamInfo::of::<String>()];

        assert!(matches_params(&params, &crate::args![1.0, "a"], &registry));
        assert!(!matches_params(&params, &crate::args![1.0], &registry));
        assert!(!matches_params(&params, &crate::args!["a", 1.0], &registry));
        // Strong test: an integer is not a real parameter
        assert!(!matches_params(&params, &crate::args![1, "a"], &registry));
        assert!(matches_params(&[], &Args::empty(), &registry));
    }

    #[test]
    fn test_next_arg() {
        let args = crate::args![3, "4"];
        let mut values = args.iter();
        assert_eq!(next_arg::<i64>(&mut values).unwrap(), 3);
        assert_eq!(next_arg::<i64>(&mut values).unwrap(), 4);
        assert!(next_arg::<i64>(&mut values).is_err());
    }
}
