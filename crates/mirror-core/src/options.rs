//! Registry configuration

use crate::defaults::{DEFAULT_INHERIT_MEMBERS, DEFAULT_VALIDATE_NAMES};

/// Options fixed when a [`Registry`](crate::Registry) is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Resolve properties and functions through base classes
    pub inherit_members: bool,

    /// Reject empty names and names containing whitespace or control
    /// characters
    pub validate_names: bool,
}

impl RegistryOptions {
    /// Options with member inheritance disabled
    pub fn flat() -> Self {
        Self {
            inherit_members: false,
            ..Self::default()
        }
    }

    /// Check a declared name against these options
    pub(crate) fn is_valid_name(&self, name: &str) -> bool {
        !self.validate_names
            || (!name.is_empty()
                && !name
                    .chars()
                    .any(|c| c.is_whitespace() || c.is_control()))
    }
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            inherit_members: DEFAULT_INHERIT_MEMBERS,
            validate_names: DEFAULT_VALIDATE_NAMES,
        }
    }
}
