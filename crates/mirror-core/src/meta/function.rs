//! Function descriptors and overload resolution
//!
//! A function is a named set of overloads. A call picks the first overload,
//! in declaration order, whose parameters accept the arguments.

use std::any::{Any, TypeId};
use std::fmt;

use super::param::{matches_params, next_arg, ParamInfo};
use crate::error::{ReflectError, ReflectResult};
use crate::object::UserObject;
use crate::registry::Registry;
use crate::value::{Args, IntoValue, Param, Value};

type Invoker = Box<dyn Fn(&mut dyn Any, &Args, &Registry) -> ReflectResult<Value> + Send + Sync>;

/// How an overload receives the instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// `&T`
    Shared,
    /// `&mut T`
    Exclusive,
}

/// One signature of a function.
pub struct Overload {
    receiver: Receiver,
    params: Vec<ParamInfo>,
    return_type: &'static str,
    invoke: Invoker,
}

impl Overload {
    /// Receiver of the native method
    pub fn receiver(&self) -> Receiver {
        self.receiver
    }

    /// Number of parameters, not counting the receiver
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameters in positional order
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    /// Native return type name
    pub fn return_type(&self) -> &'static str {
        self.return_type
    }

    /// Check whether the argument list can be passed to this overload
    pub fn matches(&self, args: &Args, registry: &Registry) -> bool {
        matches_params(&self.params, args, registry)
    }
}

impl fmt::Debug for Overload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overload")
            .field("receiver", &self.receiver)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .finish()
    }
}

/// Named callable on instances of a class.
pub struct Function {
    name: String,
    owner: TypeId,
    overloads: Vec<Overload>,
}

impl Function {
    pub(crate) fn new(name: &str, owner: TypeId) -> Self {
        Self {
            name: name.to_string(),
            owner,
            overloads: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, overload: Overload) {
        self.overloads.push(overload);
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Overloads in declaration order
    pub fn overloads(&self) -> &[Overload] {
        &self.overloads
    }

    /// First overload accepting the arguments
    pub fn resolve(&self, args: &Args, registry: &Registry) -> Option<&Overload> {
        let found = self
            .overloads
            .iter()
            .position(|overload| overload.matches(args, registry));
        log::trace!(
            "function '{}': {} overload(s), {} argument(s), selected {:?}",
            self.name,
            self.overloads.len(),
            args.count(),
            found
        );
        found.map(|index| &self.overloads[index])
    }

    /// Call the function on an object of the declaring class or a class
    /// derived from it
    pub fn call(
        &self,
        object: &mut UserObject,
        args: &Args,
        registry: &Registry,
    ) -> ReflectResult<Value> {
        let (class, instance) = object.parts_mut()?;
        let overload = self
            .resolve(args, registry)
            .ok_or_else(|| ReflectError::ArgumentMismatch {
                function: self.name.clone(),
                arg_count: args.count(),
            })?;
        let target = class
            .upcast_mut_to(instance, self.owner)
            .ok_or_else(|| ReflectError::FunctionNotFound {
                class: class.name().to_string(),
                function: self.name.clone(),
            })?;
        (overload.invoke)(target, args, registry)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("overloads", &self.overloads)
            .finish()
    }
}

// ============================================================================
// Native methods
// ============================================================================

/// Marker for methods taking `&T`
#[doc(hidden)]
pub struct ByRef;

/// Marker for methods taking `&mut T`
#[doc(hidden)]
pub struct ByMut;

/// Native methods usable as overloads of a function on `T`.
///
/// `Marker` encodes the receiver, parameter tuple and return type, and is
/// inferred from the closure.
pub trait IntoMethod<T, Marker> {
    /// Wrap into a type-erased overload
    fn into_overload(self) -> Overload;
}

fn receiver<T: Any>(instance: &mut dyn Any) -> ReflectResult<&mut T> {
    instance
        .downcast_mut::<T>()
        .ok_or_else(|| ReflectError::conversion("instance", std::any::type_name::<T>()))
}

macro_rules! impl_into_method {
    ($($arg:ident),*) => {
        impl<T, F, R, $($arg,)*> IntoMethod<T, (ByRef, ($($arg,)*), R)> for F
        where
            T: Any,
            F: Fn(&T, $($arg),*) -> R + Send + Sync + 'static,
            R: IntoValue + 'static,
            $($arg: Param,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_overload(self) -> Overload {
                Overload {
                    receiver: Receiver::Shared,
                    params: vec![$(ParamInfo::of::<$arg>()),*],
                    return_type: std::any::type_name::<R>(),
                    invoke: Box::new(move |instance: &mut dyn Any, args: &Args, registry: &Registry| -> ReflectResult<Value> {
                        let target: &T = receiver::<T>(instance)?;
                        let mut values = args.iter();
                        $(let $arg = next_arg::<$arg>(&mut values)?;)*
                        self(target, $($arg),*).into_value(registry)
                    }),
                }
            }
        }

        impl<T, F, R, $($arg,)*> IntoMethod<T, (ByMut, ($($arg,)*), R)> for F
        where
            T: Any,
            F: Fn(&mut T, $($arg),*) -> R + Send + Sync + 'static,
            R: IntoValue + 'static,
            $($arg: Param,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_overload(self) -> Overload {
                Overload {
                    receiver: Receiver::Exclusive,
                    params: vec![$(ParamInfo::of::<$arg>()),*],
                    return_type: std::any::type_name::<R>(),
                    invoke: Box::new(move |instance: &mut dyn Any, args: &Args, registry: &Registry| -> ReflectResult<Value> {
                        let target = receiver::<T>(instance)?;
                        let mut values = args.iter();
                        $(let $arg = next_arg::<$arg>(&mut values)?;)*
                        self(target, $($arg),*).into_value(registry)
                    }),
                }
            }
        }
    };
}

impl_into_method!();
impl_into_method!(A0);
impl_into_method!(A0, A1);
impl_into_method!(A0, A1, A2);
impl_into_method!(A0, A1, A2, A3);
impl_into_method!(A0, A1, A2, A3, A4);
impl_into_method!(A0, A1, A2, A3, A4, A5);
impl_into_method!(A0, A1, A2, A3, A4, A5, A6);
impl_into_method!(A0, A1, A2, A3, A4, A5, A6, A7);
