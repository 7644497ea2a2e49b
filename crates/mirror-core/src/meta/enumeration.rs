//! Enum descriptors
//!
//! An enum maps constant names to integer values. Names and values are both
//! unique within one enum, so the mapping can be walked in either direction.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use super::user_data::UserData;
use crate::error::{ReflectError, ReflectResult};
use crate::registry::Registry;
use crate::value::NativeEnum;

/// Descriptor of a registered native enum.
pub struct Enum {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    pairs: Vec<(String, i64)>,
    names: FxHashMap<String, usize>,
    values: FxHashMap<i64, usize>,
    user_data: UserData,
}

impl Enum {
    /// Enum name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native type described by this enum
    pub fn native_type_id(&self) -> TypeId {
        self.type_id
    }

    /// Native type name
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Data attached at registration
    pub fn user_data(&self) -> &UserData {
        &self.user_data
    }

    /// Number of constants
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if the enum declares no constants
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Constants in declaration order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.pairs.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Check if a constant with the given name exists
    pub fn has_name(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Check if a constant with the given value exists
    pub fn has_value(&self, value: i64) -> bool {
        self.values.contains_key(&value)
    }

    /// Value of the constant with the given name
    pub fn value_of(&self, name: &str) -> ReflectResult<i64> {
        self.names
            .get(name)
            .map(|&index| self.pairs[index].1)
            .ok_or_else(|| ReflectError::EnumNameNotFound {
                enumeration: self.name.clone(),
                name: name.to_string(),
            })
    }

    /// Name of the constant with the given value, if any
    pub fn name_of(&self, value: i64) -> Option<&str> {
        self.values
            .get(&value)
            .map(|&index| self.pairs[index].0.as_str())
    }

    /// Name of the constant with the given value, failing with `EnumValueNotFound`
    pub fn name_by_value(&self, value: i64) -> ReflectResult<&str> {
        self.name_of(value)
            .ok_or_else(|| ReflectError::EnumValueNotFound {
                enumeration: self.name.clone(),
                value,
            })
    }
}

impl fmt::Debug for Enum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enum")
            .field("name", &self.name)
            .field("pairs", &self.pairs)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Declares the constants of an enum, then registers it.
///
/// Errors are kept until [`register`](Self::register), which reports the
/// first one.
pub struct EnumBuilder<'r, E> {
    registry: &'r mut Registry,
    descriptor: Enum,
    error: Option<ReflectError>,
    _marker: PhantomData<fn() -> E>,
}

impl<'r, E: NativeEnum> EnumBuilder<'r, E> {
    pub(crate) fn new(registry: &'r mut Registry, name: &str) -> Self {
        let error = if registry.options().is_valid_name(name) {
            None
        } else {
            Some(ReflectError::registration(format!(
                "invalid enum name {:?}",
                name
            )))
        };
        Self {
            registry,
            descriptor: Enum {
                name: name.to_string(),
                type_id: TypeId::of::<E>(),
                type_name: std::any::type_name::<E>(),
                pairs: Vec::new(),
                names: FxHashMap::default(),
                values: FxHashMap::default(),
                user_data: UserData::new(),
            },
            error,
            _marker: PhantomData,
        }
    }

    /// Declare a constant
    pub fn value(mut self, name: &str, variant: E) -> Self {
        if self.error.is_some() {
            return self;
        }
        let value = variant.to_i64();
        let descriptor = &mut self.descriptor;
        if !self.registry.options().is_valid_name(name) {
            self.error = Some(ReflectError::registration(format!(
                "invalid constant name {:?} in enum '{}'",
                name, descriptor.name
            )));
        } else if descriptor.names.contains_key(name) {
            self.error = Some(ReflectError::registration(format!(
                "duplicate constant name '{}' in enum '{}'",
                name, descriptor.name
            )));
        } else if descriptor.values.contains_key(&value) {
            self.error = Some(ReflectError::registration(format!(
                "duplicate constant value {} in enum '{}'",
                value, descriptor.name
            )));
        } else {
            let index = descriptor.pairs.len();
            descriptor.pairs.push((name.to_string(), value));
            descriptor.names.insert(name.to_string(), index);
            descriptor.values.insert(value, index);
        }
        self
    }

    /// Attach a value under `key`, replacing any previous one
    pub fn user_data<V: Any + Send + Sync>(mut self, key: &str, value: V) -> Self {
        self.descriptor.user_data.insert(key, value);
        self
    }

    /// Register the enum, returning its shared descriptor
    pub fn register(self) -> ReflectResult<std::sync::Arc<Enum>> {
        match self.error {
            Some(err) => {
                log::warn!("rejected enum '{}': {}", self.descriptor.name, err);
                Err(err)
            }
            None => self.registry.insert_enum(self.descriptor),
        }
    }
}
