//! Type-erased handle to a native class instance
//!
//! A handle either owns its instance (freed exactly once, when the handle
//! drops) or borrows one whose lifetime the caller guarantees. Copying an
//! owned handle deep-copies the instance, so an instance never has more than
//! one owner.

use std::any::{Any, TypeId};
use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::error::{InvalidObject, ObjectDescription, ReflectError, ReflectResult};
use crate::meta::Class;

/// Ownership of a [`UserObject`]'s instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// The handle references an instance owned elsewhere and never frees it
    Borrowed,
    /// The handle owns its instance and frees it on drop
    Owned,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ownership::Borrowed => write!(f, "borrowed"),
            Ownership::Owned => write!(f, "owned"),
        }
    }
}

/// Object-safe view of a registered native instance.
pub(crate) trait Instance: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn clone_boxed(&self) -> Box<dyn Instance>;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any + Clone> Instance for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn clone_boxed(&self) -> Box<dyn Instance> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

static NEXT_OWNED_ID: AtomicU64 = AtomicU64::new(1);

fn next_owned_id() -> u64 {
    NEXT_OWNED_ID.fetch_add(1, AtomicOrdering::Relaxed)
}

enum Holder {
    Empty,
    // Zero-sized instances share an address, so owned ones compare by id
    Owned { instance: Box<dyn Instance>, id: u64 },
    Borrowed(NonNull<dyn Instance>),
}

/// Instance identity used for comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Identity {
    Null,
    Owned(u64),
    Borrowed(usize),
}

/// Handle to a native class instance plus its class descriptor.
pub struct UserObject {
    class: Option<Arc<Class>>,
    holder: Holder,
}

impl UserObject {
    /// The null handle: points to no instance and has no class
    pub fn nothing() -> Self {
        Self {
            class: None,
            holder: Holder::Empty,
        }
    }

    /// Wrap an instance into an owning handle.
    ///
    /// Fails with `TypeConversion` if `class` does not describe `T`.
    pub fn owned<T: Any + Clone>(class: Arc<Class>, instance: T) -> ReflectResult<Self> {
        check_class::<T>(&class)?;
        Ok(Self::from_boxed(class, Box::new(instance)))
    }

    /// Wrap a reference into a non-owning handle.
    ///
    /// Fails with `TypeConversion` if `class` does not describe `T`.
    ///
    /// # Safety
    /// `instance` must outlive the returned handle and every copy of it, and
    /// must not be accessed through any other path while a handle is used.
    pub unsafe fn borrowed<T: Any + Clone>(
        class: Arc<Class>,
        instance: &mut T,
    ) -> ReflectResult<Self> {
        check_class::<T>(&class)?;
        let instance: &mut (dyn Instance + 'static) = instance;
        Ok(Self {
            class: Some(class),
            holder: Holder::Borrowed(NonNull::from(instance)),
        })
    }

    pub(crate) fn from_boxed(class: Arc<Class>, instance: Box<dyn Instance>) -> Self {
        Self {
            class: Some(class),
            holder: Holder::Owned {
                instance,
                id: next_owned_id(),
            },
        }
    }

    /// Class of the instance (`None` for the null handle)
    pub fn class(&self) -> Option<&Arc<Class>> {
        self.class.as_ref()
    }

    /// Ownership of the instance (`None` for the null handle)
    pub fn ownership(&self) -> Option<Ownership> {
        match self.holder {
            Holder::Empty => None,
            Holder::Owned { .. } => Some(Ownership::Owned),
            Holder::Borrowed(_) => Some(Ownership::Borrowed),
        }
    }

    /// Check if this is the null handle
    pub fn is_null(&self) -> bool {
        matches!(self.holder, Holder::Empty)
    }

    /// Address of the instance, 0 for the null handle
    pub fn address(&self) -> usize {
        match self.instance_ref() {
            Some(instance) => instance.as_any() as *const dyn Any as *const () as usize,
            None => 0,
        }
    }

    fn identity(&self) -> Identity {
        match &self.holder {
            Holder::Empty => Identity::Null,
            Holder::Owned { id, .. } => Identity::Owned(*id),
            Holder::Borrowed(_) => Identity::Borrowed(self.address()),
        }
    }

    fn class_address(&self) -> usize {
        self.class
            .as_ref()
            .map_or(0, |class| Arc::as_ptr(class) as usize)
    }

    fn instance_ref(&self) -> Option<&dyn Instance> {
        match &self.holder {
            Holder::Empty => None,
            Holder::Owned { instance, .. } => Some(&**instance),
            // SAFETY: the referent outlives the handle (contract of `borrowed`)
            Holder::Borrowed(ptr) => Some(unsafe { ptr.as_ref() }),
        }
    }

    /// Class and type-erased instance, or `InvalidObject` for the null handle
    pub(crate) fn parts(&self) -> ReflectResult<(&Arc<Class>, &dyn Any)> {
        match (&self.class, self.instance_ref()) {
            (Some(class), Some(instance)) => Ok((class, instance.as_any())),
            _ => Err(InvalidObject::new(self).into()),
        }
    }

    /// Mutable counterpart of [`parts`](Self::parts)
    pub(crate) fn parts_mut(&mut self) -> ReflectResult<(&Arc<Class>, &mut dyn Any)> {
        match (&self.class, &mut self.holder) {
            (Some(class), Holder::Owned { instance, .. }) => {
                Ok((class, (**instance).as_any_mut()))
            }
            // SAFETY: the referent outlives the handle and is not aliased
            // while the handle is used (contract of `borrowed`)
            (Some(class), Holder::Borrowed(ptr)) => {
                Ok((class, unsafe { ptr.as_mut() }.as_any_mut()))
            }
            _ => Err(InvalidObject::null().into()),
        }
    }

    /// Borrow the instance as its native type
    pub fn get<T: Any>(&self) -> ReflectResult<&T> {
        let (class, instance) = self.parts()?;
        instance
            .downcast_ref::<T>()
            .ok_or_else(|| mismatch::<T>(class))
    }

    /// Mutably borrow the instance as its native type
    pub fn get_mut<T: Any>(&mut self) -> ReflectResult<&mut T> {
        let (class, instance) = self.parts_mut()?;
        instance
            .downcast_mut::<T>()
            .ok_or_else(|| mismatch::<T>(class))
    }

    /// Take the instance out of an owning handle.
    ///
    /// Borrowed handles yield a copy of their referent.
    pub fn into_inner<T: Any + Clone>(self) -> ReflectResult<T> {
        let class = match &self.class {
            Some(class) => class.clone(),
            None => return Err(InvalidObject::new(&self).into()),
        };
        match self.holder {
            Holder::Owned { instance, .. } => {
                instance
                    .into_any()
                    .downcast::<T>()
                    .map(|instance| *instance)
                    .map_err(|_| mismatch::<T>(&class))
            }
            _ => self.get::<T>().cloned(),
        }
    }

    /// Deep-copy the instance into a new owning handle
    pub fn to_owned_object(&self) -> ReflectResult<UserObject> {
        match (&self.class, self.instance_ref()) {
            (Some(class), Some(instance)) => {
                Ok(Self::from_boxed(class.clone(), instance.clone_boxed()))
            }
            _ => Err(InvalidObject::new(self).into()),
        }
    }

    /// Diagnostic snapshot of this handle
    pub fn describe(&self) -> ObjectDescription {
        ObjectDescription {
            class_name: self.class.as_ref().map(|class| class.name().to_string()),
            address: self.address(),
            ownership: self.ownership(),
        }
    }
}

fn check_class<T: Any>(class: &Class) -> ReflectResult<()> {
    if class.native_type_id() == TypeId::of::<T>() {
        Ok(())
    } else {
        Err(ReflectError::conversion(
            std::any::type_name::<T>(),
            class.name(),
        ))
    }
}

fn mismatch<T: Any>(class: &Class) -> ReflectError {
    ReflectError::conversion(class.name(), std::any::type_name::<T>())
}

impl Default for UserObject {
    fn default() -> Self {
        Self::nothing()
    }
}

impl Clone for UserObject {
    fn clone(&self) -> Self {
        let holder = match &self.holder {
            Holder::Empty => Holder::Empty,
            Holder::Owned { instance, .. } => Holder::Owned {
                instance: (**instance).clone_boxed(),
                id: next_owned_id(),
            },
            Holder::Borrowed(ptr) => Holder::Borrowed(*ptr),
        };
        Self {
            class: self.class.clone(),
            holder,
        }
    }
}

impl PartialEq for UserObject {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity() && self.class_address() == other.class_address()
    }
}

impl PartialOrd for UserObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(
            self.identity()
                .cmp(&other.identity())
                .then_with(|| self.class_address().cmp(&other.class_address())),
        )
    }
}

impl fmt::Debug for UserObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserObject")
            .field("class", &self.class.as_ref().map(|class| class.name()))
            .field("ownership", &self.ownership())
            .field("address", &format_args!("{:#x}", self.address()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct Tracked {
        drops: Rc<Cell<usize>>,
        value: i32,
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            self.drops.set(self.drops.get() + 1);
        }
    }

    #[derive(Clone)]
    struct Other;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.declare_class::<Tracked>("Tracked").register().unwrap();
        registry.declare_class::<Other>("Other").register().unwrap();
        registry
    }

    #[test]
    fn test_owned_destroyed_once() {
        let registry = registry();
        let class = registry.class_by_name("Tracked").unwrap().clone();
        let drops = Rc::new(Cell::new(0));

        let obj = UserObject::owned(class, Tracked { drops: drops.clone(), value: 1 }).unwrap();
        assert_eq!(obj.ownership(), Some(Ownership::Owned));
        assert_eq!(drops.get(), 0);
        drop(obj);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_borrowed_never_destroys() {
        let registry = registry();
        let class = registry.class_by_name("Tracked").unwrap().clone();
        let drops = Rc::new(Cell::new(0));
        let mut native = Tracked { drops: drops.clone(), value: 5 };

        {
            let mut obj = unsafe { UserObject::borrowed(class, &mut native) }.unwrap();
            assert_eq!(obj.ownership(), Some(Ownership::Borrowed));
            obj.get_mut::<Tracked>().unwrap().value = 9;
            let copy = obj.clone();
            assert_eq!(copy, obj);
        }
        assert_eq!(drops.get(), 0);
        assert_eq!(native.value, 9);
    }

    #[test]
    fn test_clone_of_owned_is_deep_copy() {
        let registry = registry();
        let class = registry.class_by_name("Tracked").unwrap().clone();
        let drops = Rc::new(Cell::new(0));

        let original = UserObject::owned(class, Tracked { drops: drops.clone(), value: 3 }).unwrap();
        let mut copy = original.clone();
        assert_ne!(original, copy);
        copy.get_mut::<Tracked>().unwrap().value = 4;
        assert_eq!(original.get::<Tracked>().unwrap().value, 3);

        drop(original);
        assert_eq!(drops.get(), 1);
        drop(copy);
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn test_zero_sized_owned_instances_are_distinct() {
        let registry = registry();
        let first = registry.user_object(Other).unwrap();
        let second = registry.user_object(Other).unwrap();

        assert_eq!(first.address(), second.address());
        assert_ne!(first, second);
        assert_ne!(first.partial_cmp(&second), Some(Ordering::Equal));
        assert_eq!(first.partial_cmp(&first), Some(Ordering::Equal));
        assert_ne!(first, first.clone());
    }

    #[test]
    fn test_ordering_agrees_with_equality() {
        let registry = registry();
        let class = registry.class_by_name("Other").unwrap().clone();
        let mut native = Other;
        let borrowed = unsafe { UserObject::borrowed(class, &mut native) }.unwrap();
        let handles = [
            UserObject::nothing(),
            registry.user_object(Other).unwrap(),
            borrowed.clone(),
            borrowed,
        ];

        for a in &handles {
            for b in &handles {
                assert_eq!(a == b, a.partial_cmp(b) == Some(Ordering::Equal));
            }
        }
        assert_eq!(handles[2], handles[3]);
    }

    #[test]
    fn test_class_must_describe_type() {
        let registry = registry();
        let other = registry.class_by_name("Other").unwrap().clone();
        let drops = Rc::new(Cell::new(0));
        let result = UserObject::owned(other, Tracked { drops, value: 0 });
        assert!(matches!(result, Err(ReflectError::TypeConversion { .. })));
    }

    #[test]
    fn test_null_handle_is_invalid() {
        let mut obj = UserObject::nothing();
        assert!(obj.is_null());
        assert_eq!(obj.address(), 0);
        assert!(obj.class().is_none());
        assert!(matches!(obj.get::<Other>(), Err(ReflectError::InvalidObject(_))));
        assert!(matches!(obj.get_mut::<Other>(), Err(ReflectError::InvalidObject(_))));
        assert_eq!(obj, UserObject::default());
    }

    #[test]
    fn test_get_wrong_type() {
        let registry = registry();
        let obj = registry.user_object(Other).unwrap();
        assert!(matches!(obj.get::<Tracked>(), Err(ReflectError::TypeConversion { .. })));
        assert!(obj.get::<Other>().is_ok());
    }

    #[test]
    fn test_into_inner() {
        let registry = registry();
        let drops = Rc::new(Cell::new(0));
        let obj = registry
            .user_object(Tracked { drops: drops.clone(), value: 11 })
            .unwrap();
        let native: Tracked = obj.into_inner().unwrap();
        assert_eq!(native.value, 11);
        assert_eq!(drops.get(), 0);
        drop(native);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn test_describe() {
        let registry = registry();
        let obj = registry.user_object(Other).unwrap();
        let description = obj.describe();
        assert_eq!(description.class_name.as_deref(), Some("Other"));
        assert_eq!(description.ownership, Some(Ownership::Owned));
        assert!(description.to_string().starts_with("Other@"));
    }
}
