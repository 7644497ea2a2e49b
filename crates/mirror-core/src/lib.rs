//! Mirror Core
//!
//! Runtime reflection for native Rust types: a dynamic [`Value`] container,
//! a [`Registry`] of class and enum descriptors, owned and borrowed
//! [`UserObject`] handles, and constructor and function dispatch over
//! dynamic argument lists.
//!
//! # Example
//!
//! ```ignore
//! use mirror_core::{args, Registry};
//!
//! #[derive(Clone)]
//! struct Point { x: f64, y: f64 }
//!
//! let mut registry = Registry::new();
//! registry
//!     .declare_class::<Point>("Point")
//!     .constructor(|| Point { x: 0.0, y: 0.0 })
//!     .constructor(|x: f64, y: f64| Point { x, y })
//!     .property("x", |p: &Point| p.x)
//!     .register()?;
//!
//! let point = registry.construct("Point", &args![1.0, 2.0])?;
//! assert_eq!(registry.get(&point, "x")?.to::<f64>()?, 1.0);
//! ```

#![warn(missing_docs)]

pub mod defaults;
pub mod error;
pub mod meta;
pub mod object;
pub mod options;
pub mod registry;
pub mod value;

mod macros;

pub use error::{InvalidObject, ObjectDescription, ReflectError, ReflectResult};
pub use meta::{
    check_arg, CheckTypeVisitor, Class, ClassBuilder, Constructor, Enum, EnumBuilder, Function,
    Overload, ParamInfo, Property, Receiver, Type, UserData,
};
pub use object::{EnumObject, Ownership, UserObject};
pub use options::RegistryOptions;
pub use registry::Registry;
pub use value::{
    Args, FromValue, IntoValue, MapType, NativeEnum, Param, TypeNameVisitor, Value, ValueKind,
    ValueVisitor,
};

#[doc(hidden)]
pub use value::{enum_from_value, enum_into_value, user_from_value};
