//! Registry of class and enum descriptors
//!
//! Descriptors are declared through builders while the registry is mutably
//! borrowed, then shared immutably. Every lookup has a safe form returning
//! `Option` and a failing form returning `ClassNotFound` / `EnumNotFound`.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::error::{InvalidObject, ReflectError, ReflectResult};
use crate::meta::{Class, ClassBuilder, Enum, EnumBuilder, Type};
use crate::object::{EnumObject, UserObject};
use crate::options::RegistryOptions;
use crate::value::{Args, NativeEnum, Value};

/// Registry of reflected classes and enums
pub struct Registry {
    options: RegistryOptions,
    /// Classes in registration order
    classes: Vec<Arc<Class>>,
    class_names: FxHashMap<String, usize>,
    class_types: FxHashMap<TypeId, usize>,
    /// Enums in registration order
    enums: Vec<Arc<Enum>>,
    enum_names: FxHashMap<String, usize>,
    enum_types: FxHashMap<TypeId, usize>,
}

impl Registry {
    /// Create an empty registry with default options
    pub fn new() -> Self {
        Self::with_options(RegistryOptions::default())
    }

    /// Create an empty registry with custom options
    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            classes: Vec::new(),
            class_names: FxHashMap::default(),
            class_types: FxHashMap::default(),
            enums: Vec::new(),
            enum_names: FxHashMap::default(),
            enum_types: FxHashMap::default(),
        }
    }

    /// Options this registry was created with
    pub fn options(&self) -> &RegistryOptions {
        &self.options
    }

    // ========================================================================
    // Declaration
    // ========================================================================

    /// Start declaring the class of native type `T`
    pub fn declare_class<T: Any + Clone>(&mut self, name: &str) -> ClassBuilder<'_, T> {
        ClassBuilder::new(self, name)
    }

    /// Start declaring the enum of native type `E`
    pub fn declare_enum<E: NativeEnum>(&mut self, name: &str) -> EnumBuilder<'_, E> {
        EnumBuilder::new(self, name)
    }

    pub(crate) fn insert_class(&mut self, class: Class) -> ReflectResult<Arc<Class>> {
        if self.class_names.contains_key(class.name()) {
            return Err(self.reject(format!("class '{}' is already registered", class.name())));
        }
        if let Some(&index) = self.class_types.get(&class.native_type_id()) {
            return Err(self.reject(format!(
                "type {} is already registered as class '{}'",
                class.type_name(),
                self.classes[index].name()
            )));
        }

        log::debug!(
            "registered class '{}' ({}): {} constructor(s), {} property(ies), {} function(s)",
            class.name(),
            class.type_name(),
            class.constructors().len(),
            class.properties().len(),
            class.functions().len()
        );

        let index = self.classes.len();
        let class = Arc::new(class);
        self.class_names.insert(class.name().to_string(), index);
        self.class_types.insert(class.native_type_id(), index);
        self.classes.push(Arc::clone(&class));
        Ok(class)
    }

    pub(crate) fn insert_enum(&mut self, descriptor: Enum) -> ReflectResult<Arc<Enum>> {
        if self.enum_names.contains_key(descriptor.name()) {
            return Err(self.reject(format!("enum '{}' is already registered", descriptor.name())));
        }
        if let Some(&index) = self.enum_types.get(&descriptor.native_type_id()) {
            return Err(self.reject(format!(
                "type {} is already registered as enum '{}'",
                descriptor.type_name(),
                self.enums[index].name()
            )));
        }

        log::debug!(
            "registered enum '{}' ({}): {} value(s)",
            descriptor.name(),
            descriptor.type_name(),
            descriptor.len()
        );

        let index = self.enums.len();
        let descriptor = Arc::new(descriptor);
        self.enum_names.insert(descriptor.name().to_string(), index);
        self.enum_types.insert(descriptor.native_type_id(), index);
        self.enums.push(Arc::clone(&descriptor));
        Ok(descriptor)
    }

    fn reject(&self, message: String) -> ReflectError {
        log::warn!("registration rejected: {}", message);
        ReflectError::registration(message)
    }

    // ========================================================================
    // Class lookup
    // ========================================================================

    /// Class by name, failing with `ClassNotFound`
    pub fn class_by_name(&self, name: &str) -> ReflectResult<&Arc<Class>> {
        self.class_by_name_safe(name)
            .ok_or_else(|| ReflectError::ClassNotFound {
                name: name.to_string(),
            })
    }

    /// Class by name
    pub fn class_by_name_safe(&self, name: &str) -> Option<&Arc<Class>> {
        self.class_names.get(name).map(|&index| &self.classes[index])
    }

    /// Class of native type `T`, failing with `ClassNotFound`
    pub fn class_by_type<T: ?Sized + 'static>(&self) -> ReflectResult<&Arc<Class>> {
        self.class_by_type_safe::<T>()
            .ok_or_else(|| ReflectError::ClassNotFound {
                name: std::any::type_name::<T>().to_string(),
            })
    }

    /// Class of native type `T`
    pub fn class_by_type_safe<T: ?Sized + 'static>(&self) -> Option<&Arc<Class>> {
        self.class_by_type_id(TypeId::of::<T>())
    }

    /// Class of the native type with the given id
    pub fn class_by_type_id(&self, type_id: TypeId) -> Option<&Arc<Class>> {
        self.class_types.get(&type_id).map(|&index| &self.classes[index])
    }

    /// Classes in registration order
    pub fn classes(&self) -> impl Iterator<Item = &Arc<Class>> {
        self.classes.iter()
    }

    /// Number of registered classes
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Check if a descriptor belongs to this registry
    pub fn contains_class(&self, class: &Arc<Class>) -> bool {
        self.class_types
            .get(&class.native_type_id())
            .is_some_and(|&index| Arc::ptr_eq(&self.classes[index], class))
    }

    // ========================================================================
    // Enum lookup
    // ========================================================================

    /// Enum by name, failing with `EnumNotFound`
    pub fn enum_by_name(&self, name: &str) -> ReflectResult<&Arc<Enum>> {
        self.enum_by_name_safe(name)
            .ok_or_else(|| ReflectError::EnumNotFound {
                name: name.to_string(),
            })
    }

    /// Enum by name
    pub fn enum_by_name_safe(&self, name: &str) -> Option<&Arc<Enum>> {
        self.enum_names.get(name).map(|&index| &self.enums[index])
    }

    /// Enum of native type `E`, failing with `EnumNotFound`
    pub fn enum_by_type<E: ?Sized + 'static>(&self) -> ReflectResult<&Arc<Enum>> {
        self.enum_by_type_safe::<E>()
            .ok_or_else(|| ReflectError::EnumNotFound {
                name: std::any::type_name::<E>().to_string(),
            })
    }

    /// Enum of native type `E`
    pub fn enum_by_type_safe<E: ?Sized + 'static>(&self) -> Option<&Arc<Enum>> {
        self.enum_types
            .get(&TypeId::of::<E>())
            .map(|&index| &self.enums[index])
    }

    /// Enums in registration order
    pub fn enums(&self) -> impl Iterator<Item = &Arc<Enum>> {
        self.enums.iter()
    }

    /// Number of registered enums
    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    // ========================================================================
    // Type lookup
    // ========================================================================

    /// Class or enum describing the native type `T`
    pub fn type_of<T: ?Sized + 'static>(&self) -> Option<&dyn Type> {
        self.type_by_id(TypeId::of::<T>())
    }

    /// Class or enum describing the native type with the given id
    pub fn type_by_id(&self, type_id: TypeId) -> Option<&dyn Type> {
        if let Some(class) = self.class_by_type_id(type_id) {
            return Some(&**class as &dyn Type);
        }
        self.enum_types
            .get(&type_id)
            .map(|&index| &*self.enums[index] as &dyn Type)
    }

    /// All classes in registration order, then all enums
    pub fn types(&self) -> impl Iterator<Item = &dyn Type> {
        let classes = self.classes.iter().map(|class| &**class as &dyn Type);
        let enums = self.enums.iter().map(|descriptor| &**descriptor as &dyn Type);
        classes.chain(enums)
    }

    // ========================================================================
    // Objects
    // ========================================================================

    /// Wrap a native instance into an owning handle
    pub fn user_object<T: Any + Clone>(&self, instance: T) -> ReflectResult<UserObject> {
        let class = self.class_by_type::<T>()?;
        UserObject::owned(Arc::clone(class), instance)
    }

    /// Wrap a native reference into a non-owning handle.
    ///
    /// # Safety
    /// Same contract as [`UserObject::borrowed`].
    pub unsafe fn user_ref<T: Any + Clone>(&self, instance: &mut T) -> ReflectResult<UserObject> {
        let class = self.class_by_type::<T>()?;
        UserObject::borrowed(Arc::clone(class), instance)
    }

    /// Wrap a native enum variant into an enum object
    pub fn enum_object<E: NativeEnum>(&self, variant: E) -> ReflectResult<EnumObject> {
        let descriptor = self.enum_by_type::<E>()?;
        EnumObject::new(Arc::clone(descriptor), variant.to_i64())
    }

    // ========================================================================
    // Dynamic access
    // ========================================================================

    /// Construct an instance of the named class from dynamic arguments
    pub fn construct(&self, class: &str, args: &Args) -> ReflectResult<UserObject> {
        self.class_by_name(class)?.construct(args, self)
    }

    /// Construct an instance of the class of `T` from dynamic arguments
    pub fn construct_type<T: ?Sized + 'static>(&self, args: &Args) -> ReflectResult<UserObject> {
        self.class_by_type::<T>()?.construct(args, self)
    }

    /// Read a property
    pub fn get(&self, object: &UserObject, property: &str) -> ReflectResult<Value> {
        let class = self.resolve(object)?;
        class.property(property)?.get(object, self)
    }

    /// Write a property
    pub fn set(&self, object: &mut UserObject, property: &str, value: impl Into<Value>) -> ReflectResult<()> {
        let class = Arc::clone(self.resolve(object)?);
        class.property(property)?.set(object, &value.into())
    }

    /// Call a function
    pub fn call(&self, object: &mut UserObject, function: &str, args: &Args) -> ReflectResult<Value> {
        let class = Arc::clone(self.resolve(object)?);
        class.function(function)?.call(object, args, self)
    }

    /// Class of a handle, or `InvalidObject` if the handle is null or its
    /// class is not part of this registry
    fn resolve<'o>(&self, object: &'o UserObject) -> ReflectResult<&'o Arc<Class>> {
        match object.class() {
            Some(class) if !object.is_null() && self.contains_class(class) => Ok(class),
            _ => Err(InvalidObject::new(object).into()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.options)
            .field("classes", &self.classes.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("enums", &self.enums.iter().map(|e| e.name()).collect::<Vec<_>>())
            .finish()
    }
}
