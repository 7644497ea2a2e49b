//! Common interface of class and enum descriptors

use std::any::TypeId;

use super::class::Class;
use super::enumeration::Enum;
use super::user_data::UserData;
use crate::value::ValueKind;

/// A registered type, either a [`Class`] or an [`Enum`].
pub trait Type: Send + Sync {
    /// Registered name
    fn name(&self) -> &str;

    /// Native type described
    fn native_type_id(&self) -> TypeId;

    /// Native type name
    fn type_name(&self) -> &'static str;

    /// Kind of the values holding instances of this type
    fn kind(&self) -> ValueKind;

    /// Data attached at registration
    fn user_data(&self) -> &UserData;
}

impl Type for Class {
    fn name(&self) -> &str {
        Class::name(self)
    }

    fn native_type_id(&self) -> TypeId {
        Class::native_type_id(self)
    }

    fn type_name(&self) -> &'static str {
        Class::type_name(self)
    }

    fn kind(&self) -> ValueKind {
        ValueKind::User
    }

    fn user_data(&self) -> &UserData {
        Class::user_data(self)
    }
}

impl Type for Enum {
    fn name(&self) -> &str {
        Enum::name(self)
    }

    fn native_type_id(&self) -> TypeId {
        Enum::native_type_id(self)
    }

    fn type_name(&self) -> &'static str {
        Enum::type_name(self)
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Enum
    }

    fn user_data(&self) -> &UserData {
        Enum::user_data(self)
    }
}
