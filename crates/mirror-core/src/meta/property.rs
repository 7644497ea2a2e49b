//! Property descriptors

use std::any::{Any, TypeId};
use std::fmt;

use crate::error::{ReflectError, ReflectResult};
use crate::object::UserObject;
use crate::registry::Registry;
use crate::value::{IntoValue, MapType, Param, Value, ValueKind};

type Getter = Box<dyn Fn(&dyn Any, &Registry) -> ReflectResult<Value> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Any, &Value) -> ReflectResult<()> + Send + Sync>;

/// Named, typed accessor on instances of a class.
///
/// Every property is readable. It is writable when declared with a setter.
pub struct Property {
    name: String,
    owner: TypeId,
    kind: ValueKind,
    type_name: &'static str,
    getter: Getter,
    setter: Option<Setter>,
}

impl Property {
    pub(crate) fn read_only<T, V, G>(name: &str, getter: G) -> Self
    where
        T: Any,
        V: MapType + IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            owner: TypeId::of::<T>(),
            kind: V::map_type(),
            type_name: std::any::type_name::<V>(),
            getter: Box::new(move |instance: &dyn Any, registry: &Registry| -> ReflectResult<Value> {
                getter(downcast::<T>(instance)?).into_value(registry)
            }),
            setter: None,
        }
    }

    pub(crate) fn read_write<T, V, G, S>(name: &str, getter: G, setter: S) -> Self
    where
        T: Any,
        V: Param + IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let mut property = Self::read_only::<T, V, G>(name, getter);
        let write: Setter = Box::new(
            move |instance: &mut dyn Any, value: &Value| -> ReflectResult<()> {
                let converted = value.to::<V>()?;
                let target = instance.downcast_mut::<T>().ok_or_else(|| {
                    ReflectError::conversion("instance", std::any::type_name::<T>())
                })?;
                setter(target, converted);
                Ok(())
            },
        );
        property.setter = Some(write);
        property
    }

    /// Property name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Storage kind of the property value
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Native type name of the property value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Always true
    pub fn is_readable(&self) -> bool {
        true
    }

    /// Check if the property has a setter
    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Read the property of an object of the declaring class or a class
    /// derived from it
    pub fn get(&self, object: &UserObject, registry: &Registry) -> ReflectResult<Value> {
        let (class, instance) = object.parts()?;
        let target = class
            .upcast_to(instance, self.owner)
            .ok_or_else(|| self.not_found(class.name()))?;
        (self.getter)(target, registry)
    }

    /// Write the property, converting `value` to the property type first
    pub fn set(&self, object: &mut UserObject, value: &Value) -> ReflectResult<()> {
        let (class, instance) = object.parts_mut()?;
        let setter = self.setter.as_ref().ok_or_else(|| ReflectError::ReadOnlyProperty {
            class: class.name().to_string(),
            property: self.name.clone(),
        })?;
        let target = class
            .upcast_mut_to(instance, self.owner)
            .ok_or_else(|| self.not_found(class.name()))?;
        setter(target, value)
    }

    fn not_found(&self, class: &str) -> ReflectError {
        ReflectError::PropertyNotFound {
            class: class.to_string(),
            property: self.name.clone(),
        }
    }
}

fn downcast<T: Any>(instance: &dyn Any) -> ReflectResult<&T> {
    instance
        .downcast_ref::<T>()
        .ok_or_else(|| ReflectError::conversion("instance", std::any::type_name::<T>()))
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("writable", &self.is_writable())
            .finish()
    }
}
