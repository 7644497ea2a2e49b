//! Constructor descriptors
//!
//! A constructor wraps a native factory closure of up to eight parameters.
//! It matches an argument list when the count equals its arity and every
//! argument is directly compatible with the parameter at the same position.

use std::any::Any;
use std::fmt;

use super::param::{matches_params, next_arg, ParamInfo};
use crate::error::ReflectResult;
use crate::object::Instance;
use crate::registry::Registry;
use crate::value::{Args, Param};

type CreateFn = Box<dyn Fn(&Args) -> ReflectResult<Box<dyn Instance>> + Send + Sync>;

/// One way of creating instances of a class.
pub struct Constructor {
    params: Vec<ParamInfo>,
    create: CreateFn,
}

impl Constructor {
    /// Number of parameters
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Parameters in positional order
    pub fn params(&self) -> &[ParamInfo] {
        &self.params
    }

    /// Check whether the argument list can be passed to this constructor
    pub fn matches(&self, args: &Args, registry: &Registry) -> bool {
        matches_params(&self.params, args, registry)
    }

    /// Run the factory. Callers check [`matches`](Self::matches) first.
    pub(crate) fn create(&self, args: &Args) -> ReflectResult<Box<dyn Instance>> {
        (self.create)(args)
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("params", &self.params)
            .finish()
    }
}

/// Native factories usable as constructors of `T`.
///
/// `Params` is the tuple of parameter types, inferred from the closure.
pub trait IntoConstructor<T, Params> {
    /// Wrap into a type-erased constructor
    fn into_constructor(self) -> Constructor;
}

macro_rules! impl_into_constructor {
    ($($arg:ident),*) => {
        impl<T, F, $($arg,)*> IntoConstructor<T, ($($arg,)*)> for F
        where
            T: Any + Clone,
            F: Fn($($arg),*) -> T + Send + Sync + 'static,
            $($arg: Param,)*
        {
            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn into_constructor(self) -> Constructor {
                Constructor {
                    params: vec![$(ParamInfo::of::<$arg>()),*],
                    create: Box::new(move |args: &Args| -> ReflectResult<Box<dyn Instance>> {
                        let mut values = args.iter();
                        $(let $arg = next_arg::<$arg>(&mut values)?;)*
                        let instance: Box<dyn Instance> = Box::new(self($($arg),*));
                        Ok(instance)
                    }),
                }
            }
        }
    };
}

impl_into_constructor!();
impl_into_constructor!(A0);
impl_into_constructor!(A0, A1);
impl_into_constructor!(A0, A1, A2);
impl_into_constructor!(A0, A1, A2, A3);
impl_into_constructor!(A0, A1, A2, A3, A4);
impl_into_constructor!(A0, A1, A2, A3, A4, A5);
impl_into_constructor!(A0, A1, A2, A3, A4, A5, A6);
impl_into_constructor!(A0, A1, A2, A3, A4, A5, A6, A7);
