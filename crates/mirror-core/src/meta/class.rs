//! Class descriptors
//!
//! A class describes one native type: its constructors, properties,
//! functions and optional base class. Descriptors are immutable once
//! registered and shared through `Arc`.

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::constructor::{Constructor, IntoConstructor};
use super::function::{Function, IntoMethod};
use super::property::Property;
use super::user_data::UserData;
use crate::error::{ReflectError, ReflectResult};
use crate::object::UserObject;
use crate::registry::Registry;
use crate::value::{Args, IntoValue, MapType, Param};

// ============================================================================
// Base class links
// ============================================================================

trait Upcast: Send + Sync {
    fn upcast<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any>;
    fn upcast_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct UpcastFns<T, B> {
    to_base: fn(&T) -> &B,
    to_base_mut: fn(&mut T) -> &mut B,
}

impl<T: Any, B: Any> Upcast for UpcastFns<T, B> {
    fn upcast<'a>(&self, instance: &'a dyn Any) -> Option<&'a dyn Any> {
        let derived = instance.downcast_ref::<T>()?;
        let base: &'a dyn Any = (self.to_base)(derived);
        Some(base)
    }

    fn upcast_mut<'a>(&self, instance: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let derived = instance.downcast_mut::<T>()?;
        let base: &'a mut dyn Any = (self.to_base_mut)(derived);
        Some(base)
    }
}

struct BaseLink {
    class: Arc<Class>,
    cast: Box<dyn Upcast>,
}

// ============================================================================
// Class
// ============================================================================

/// Descriptor of a registered native class.
pub struct Class {
    name: String,
    type_id: TypeId,
    type_name: &'static str,
    inherit_members: bool,
    base: Option<BaseLink>,
    constructors: Vec<Constructor>,
    properties: Vec<Property>,
    property_names: FxHashMap<String, usize>,
    functions: Vec<Function>,
    function_names: FxHashMap<String, usize>,
    user_data: UserData,
}

impl Class {
    /// Class name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Native type described by this class
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

    /// Direct base class
    pub fn base(&self) -> Option<&Arc<Class>> {
        self.base.as_ref().map(|link| &link.class)
    }

    /// Check if `other` is a direct or indirect base of this class
    pub fn is_derived_from(&self, other: &Class) -> bool {
        let mut current = self.base();
        while let Some(class) = current {
            if std::ptr::eq(class.as_ref(), other) {
                return true;
            }
            current = class.base();
        }
        false
    }

    /// Constructors in declaration order
    pub fn constructors(&self) -> &[Constructor] {
        &self.constructors
    }

    /// Properties declared by this class (base properties excluded)
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Functions declared by this class (base functions excluded)
    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    /// Find a property, looking through base classes when members are inherited
    pub fn find_property(&self, name: &str) -> Option<&Property> {
        match self.property_names.get(name) {
            Some(&index) => Some(&self.properties[index]),
            None if self.inherit_members => self.base()?.find_property(name),
            None => None,
        }
    }

    /// Property by name, failing with `PropertyNotFound`
    pub fn property(&self, name: &str) -> ReflectResult<&Property> {
        self.find_property(name)
            .ok_or_else(|| ReflectError::PropertyNotFound {
                class: self.name.clone(),
                property: name.to_string(),
            })
    }

    /// Check if a property is reachable from this class
    pub fn has_property(&self, name: &str) -> bool {
        self.find_property(name).is_some()
    }

    /// Find a function, looking through base classes when members are inherited
    pub fn find_function(&self, name: &str) -> Option<&Function> {
        match self.function_names.get(name) {
            Some(&index) => Some(&self.functions[index]),
            None if self.inherit_members => self.base()?.find_function(name),
            None => None,
        }
    }

    /// Function by name, failing with `FunctionNotFound`
    pub fn function(&self, name: &str) -> ReflectResult<&Function> {
        self.find_function(name)
            .ok_or_else(|| ReflectError::FunctionNotFound {
                class: self.name.clone(),
                function: name.to_string(),
            })
    }

    /// Check if a function is reachable from this class
    pub fn has_function(&self, name: &str) -> bool {
        self.find_function(name).is_some()
    }

    /// Create an owned instance with the first constructor matching `args`.
    ///
    /// Constructors are tried in declaration order. Fails with
    /// `NoMatchingConstructor` when none matches.
    pub fn construct(self: &Arc<Self>, args: &Args, registry: &Registry) -> ReflectResult<UserObject> {
        for (index, constructor) in self.constructors.iter().enumerate() {
            if constructor.matches(args, registry) {
                log::trace!(
                    "class '{}': constructor #{} matches {} argument(s)",
                    self.name,
                    index,
                    args.count()
                );
                let instance = constructor.create(args)?;
                return Ok(UserObject::from_boxed(Arc::clone(self), instance));
            }
        }
        log::trace!(
            "class '{}': none of {} constructor(s) matches {} argument(s)",
            self.name,
            self.constructors.len(),
            args.count()
        );
        Err(ReflectError::NoMatchingConstructor {
            class: self.name.clone(),
            arg_count: args.count(),
        })
    }

    /// View an instance of this class as the ancestor type `target`
    pub(crate) fn upcast_to<'a>(&self, instance: &'a dyn Any, target: TypeId) -> Option<&'a dyn Any> {
        if self.type_id == target {
            return Some(instance);
        }
        let link = self.base.as_ref()?;
        let base = link.cast.upcast(instance)?;
        link.class.upcast_to(base, target)
    }

    /// Mutable counterpart of [`upcast_to`](Self::upcast_to)
    pub(crate) fn upcast_mut_to<'a>(
        &self,
        instance: &'a mut dyn Any,
        target: TypeId,
    ) -> Option<&'a mut dyn Any> {
        if self.type_id == target {
            return Some(instance);
        }
        let link = self.base.as_ref()?;
        let base = link.cast.upcast_mut(instance)?;
        link.class.upcast_mut_to(base, target)
    }
}

impl fmt::Debug for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Class")
            .field("name", &self.name)
            .field("base", &self.base().map(|base| base.name()))
            .field("constructors", &self.constructors.len())
            .field("properties", &self.properties)
            .field("functions", &self.functions)
            .finish()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Declares the members of a class, then registers it.
///
/// Errors are kept until [`register`](Self::register), which reports the
/// first one.
pub struct ClassBuilder<'r, T> {
    registry: &'r mut Registry,
    class: Class,
    error: Option<ReflectError>,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T: Any + Clone> ClassBuilder<'r, T> {
    pub(crate) fn new(registry: &'r mut Registry, name: &str) -> Self {
        let options = *registry.options();
        let mut builder = Self {
            registry,
            class: Class {
                name: name.to_string(),
                type_id: TypeId::of::<T>(),
                type_name: std::any::type_name::<T>(),
                inherit_members: options.inherit_members,
                base: None,
                constructors: Vec::new(),
                properties: Vec::new(),
                property_names: FxHashMap::default(),
                functions: Vec::new(),
                function_names: FxHashMap::default(),
                user_data: UserData::new(),
            },
            error: None,
            _marker: PhantomData,
        };
        if !options.is_valid_name(name) {
            builder.fail(format!("invalid class name {:?}", name));
        }
        builder
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(ReflectError::registration(message));
        }
    }

    fn check_member_name(&mut self, kind: &str, name: &str) -> bool {
        if !self.registry.options().is_valid_name(name) {
            let message = format!("invalid {} name {:?} in class '{}'", kind, name, self.class.name);
            self.fail(message);
            return false;
        }
        true
    }

    /// Declare the base class, which must already be registered.
    ///
    /// The two functions project an instance onto its base part.
    pub fn base<B: Any + Clone>(mut self, to_base: fn(&T) -> &B, to_base_mut: fn(&mut T) -> &mut B) -> Self {
        if self.class.base.is_some() {
            let message = format!("class '{}' already has a base class", self.class.name);
            self.fail(message);
            return self;
        }
        match self.registry.class_by_type_safe::<B>() {
            Some(base) => {
                self.class.base = Some(BaseLink {
                    class: Arc::clone(base),
                    cast: Box::new(UpcastFns { to_base, to_base_mut }),
                });
            }
            None => {
                let message = format!(
                    "base type {} of class '{}' is not registered",
                    std::any::type_name::<B>(),
                    self.class.name
                );
                self.fail(message);
            }
        }
        self
    }

    /// Declare a constructor. Earlier declarations take priority.
    pub fn constructor<P, F>(mut self, factory: F) -> Self
    where
        F: IntoConstructor<T, P>,
    {
        self.class.constructors.push(factory.into_constructor());
        self
    }

    /// Declare a read-only property
    pub fn property<V, G>(mut self, name: &str, getter: G) -> Self
    where
        V: MapType + IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.add_property(Property::read_only::<T, V, G>(name, getter));
        self
    }

    /// Declare a read-write property
    pub fn property_rw<V, G, S>(mut self, name: &str, getter: G, setter: S) -> Self
    where
        V: Param + IntoValue,
        G: Fn(&T) -> V + Send + Sync + 'static,
        S: Fn(&mut T, V) + Send + Sync + 'static,
    {
        self.add_property(Property::read_write::<T, V, G, S>(name, getter, setter));
        self
    }

    fn add_property(&mut self, property: Property) {
        if !self.check_member_name("property", property.name()) {
            return;
        }
        if self.class.property_names.contains_key(property.name()) {
            let message = format!(
                "duplicate property '{}' in class '{}'",
                property.name(),
                self.class.name
            );
            self.fail(message);
            return;
        }
        let index = self.class.properties.len();
        self.class
            .property_names
            .insert(property.name().to_string(), index);
        self.class.properties.push(property);
    }

    /// Declare a function, or add an overload to a function of the same name.
    ///
    /// Overloads are tried in declaration order.
    pub fn function<M, F>(mut self, name: &str, method: F) -> Self
    where
        F: IntoMethod<T, M>,
    {
        if !self.check_member_name("function", name) {
            return self;
        }
        let overload = method.into_overload();
        match self.class.function_names.get(name) {
            Some(&index) => self.class.functions[index].push(overload),
            None => {
                let mut function = Function::new(name, TypeId::of::<T>());
                function.push(overload);
                let index = self.class.functions.len();
                self.class.function_names.insert(name.to_string(), index);
                self.class.functions.push(function);
            }
        }
        self
    }

    /// Attach a value under `key`, replacing any previous one
    pub fn user_data<V: Any + Send + Sync>(mut self, key: &str, value: V) -> Self {
        self.class.user_data.insert(key, value);
        self
    }

    /// Register the class, returning its shared descriptor
    pub fn register(self) -> ReflectResult<Arc<Class>> {
        match self.error {
            Some(err) => {
                log::warn!("rejected class '{}': {}", self.class.name, err);
                Err(err)
            }
            None => self.registry.insert_class(self.class),
        }
    }
}
