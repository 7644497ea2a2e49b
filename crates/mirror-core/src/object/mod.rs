//! Runtime instances: user objects and enum objects

mod enum_object;
mod user_object;

pub use enum_object::EnumObject;
pub use user_object::{Ownership, UserObject};

pub(crate) use user_object::Instance;
