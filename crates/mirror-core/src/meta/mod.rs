//! Metadata descriptors: classes, enums and their members

mod check;
mod class;
mod constructor;
mod enumeration;
mod function;
mod param;
mod property;
mod types;
mod user_data;

pub use check::{check_arg, CheckTypeVisitor};
pub use class::{Class, ClassBuilder};
pub use constructor::{Constructor, IntoConstructor};
pub use enumeration::{Enum, EnumBuilder};
pub use function::{ByMut, ByRef, Function, IntoMethod, Overload, Receiver};
pub use param::{ArgCheck, ParamInfo};
pub use property::Property;
pub use types::Type;
pub use user_data::UserData;
