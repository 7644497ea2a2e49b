//! Error types for the reflection core

use thiserror::Error;

use crate::object::{Ownership, UserObject};

/// Result type for reflection operations
pub type ReflectResult<T> = Result<T, ReflectError>;

/// Reflection error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReflectError {
    /// A value has no coercion rule to the requested type
    #[error("Cannot convert {from} to {to}")]
    TypeConversion {
        /// Source type name
        from: String,
        /// Requested type name
        to: String,
    },

    /// Class lookup miss
    #[error("Class not found: {name}")]
    ClassNotFound {
        /// Class name or native type name
        name: String,
    },

    /// Enum lookup miss
    #[error("Enum not found: {name}")]
    EnumNotFound {
        /// Enum name or native type name
        name: String,
    },

    /// Rejected registration (duplicate name, duplicate native type, bad member)
    #[error("Registration error: {0}")]
    Registration(String),

    /// No constructor accepted the argument list
    #[error("No constructor of class '{class}' matches {arg_count} argument(s)")]
    NoMatchingConstructor {
        /// Class name
        class: String,
        /// Number of arguments supplied
        arg_count: usize,
    },

    /// Operation attempted on a handle whose referent cannot be resolved
    #[error("{0}")]
    InvalidObject(InvalidObject),

    /// No overload accepted the argument count or types
    #[error("No overload of function '{function}' matches {arg_count} argument(s)")]
    ArgumentMismatch {
        /// Function name
        function: String,
        /// Number of arguments supplied
        arg_count: usize,
    },

    /// Property lookup miss
    #[error("Property '{property}' not found in class '{class}'")]
    PropertyNotFound {
        /// Class name
        class: String,
        /// Property name
        property: String,
    },

    /// Function lookup miss
    #[error("Function '{function}' not found in class '{class}'")]
    FunctionNotFound {
        /// Class name
        class: String,
        /// Function name
        function: String,
    },

    /// Write attempted on a property without a setter
    #[error("Property '{property}' of class '{class}' is read-only")]
    ReadOnlyProperty {
        /// Class name
        class: String,
        /// Property name
        property: String,
    },

    /// Enum has no constant with the given name
    #[error("Enum '{enumeration}' has no value named '{name}'")]
    EnumNameNotFound {
        /// Enum name
        enumeration: String,
        /// Constant name
        name: String,
    },

    /// Enum has no constant with the given value
    #[error("Enum '{enumeration}' has no value {value}")]
    EnumValueNotFound {
        /// Enum name
        enumeration: String,
        /// Constant value
        value: i64,
    },
}

impl ReflectError {
    /// Build a `TypeConversion` error
    pub fn conversion(from: impl Into<String>, to: impl Into<String>) -> Self {
        ReflectError::TypeConversion {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Build a `Registration` error
    pub fn registration(message: impl Into<String>) -> Self {
        ReflectError::Registration(message.into())
    }
}

impl From<InvalidObject> for ReflectError {
    fn from(err: InvalidObject) -> Self {
        ReflectError::InvalidObject(err)
    }
}

// ============================================================================
// InvalidObject
// ============================================================================

/// Snapshot of a user object handle, kept for error reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectDescription {
    /// Name of the handle's class (`None` for the null handle)
    pub class_name: Option<String>,
    /// Address of the referenced instance (0 for the null handle)
    pub address: usize,
    /// Ownership of the handle (`None` for the null handle)
    pub ownership: Option<Ownership>,
}

impl std::fmt::Display for ObjectDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.class_name, self.ownership) {
            (Some(class), Some(ownership)) => {
                write!(f, "{}@{:#x} ({})", class, self.address, ownership)
            }
            _ => write!(f, "<null object>"),
        }
    }
}

/// Raised when an operation targets a handle that points to no valid instance.
///
/// Distinct from the null handle itself: the handle is a state, this is the
/// reported failure. It carries a description of the handle that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid object")]
pub struct InvalidObject {
    object: ObjectDescription,
}

impl InvalidObject {
    /// Create the error for the given handle
    pub fn new(object: &UserObject) -> Self {
        Self {
            object: object.describe(),
        }
    }

    /// The error for the null handle
    pub fn null() -> Self {
        Self {
            object: ObjectDescription {
                class_name: None,
                address: 0,
                ownership: None,
            },
        }
    }

    /// Fixed human-readable message
    pub fn what(&self) -> &'static str {
        "Invalid object"
    }

    /// The offending handle
    pub fn object(&self) -> &ObjectDescription {
        &self.object
    }
}
