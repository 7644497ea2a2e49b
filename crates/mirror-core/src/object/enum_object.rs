//! Runtime enum instances

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::error::{ReflectError, ReflectResult};
use crate::meta::Enum;

/// One constant of a registered enum, bound to its descriptor.
#[derive(Clone)]
pub struct EnumObject {
    value: i64,
    descriptor: Arc<Enum>,
}

impl EnumObject {
    /// Bind a value to its enum.
    ///
    /// Fails with `EnumValueNotFound` if the enum declares no such value.
    pub fn new(descriptor: Arc<Enum>, value: i64) -> ReflectResult<Self> {
        if !descriptor.has_value(value) {
            return Err(ReflectError::EnumValueNotFound {
                enumeration: descriptor.name().to_string(),
                value,
            });
        }
        Ok(Self { value, descriptor })
    }

    /// Look up a constant by name
    pub fn from_name(descriptor: Arc<Enum>, name: &str) -> ReflectResult<Self> {
        let value = descriptor.value_of(name)?;
        Ok(Self { value, descriptor })
    }

    /// Integer value
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Constant name
    pub fn name(&self) -> &str {
        // Construction guarantees the value is declared
        self.descriptor.name_of(self.value).unwrap_or_default()
    }

    /// Enum descriptor
    pub fn descriptor(&self) -> &Arc<Enum> {
        &self.descriptor
    }
}

impl PartialEq for EnumObject {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.descriptor, &other.descriptor) && self.value == other.value
    }
}

impl PartialOrd for EnumObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if Arc::ptr_eq(&self.descriptor, &other.descriptor) {
            self.value.partial_cmp(&other.value)
        } else {
            self.descriptor.name().partial_cmp(other.descriptor.name())
        }
    }
}

impl fmt::Debug for EnumObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnumObject")
            .field("enum", &self.descriptor.name())
            .field("name", &self.name())
            .field("value", &self.value)
            .finish()
    }
}

impl fmt::Display for EnumObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.descriptor.name(), self.name())
    }
}
