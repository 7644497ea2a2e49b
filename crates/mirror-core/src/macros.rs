//! Declarative macros binding native types to the value layer

/// Make native class types usable as values, parameters and return types.
///
/// The types must be registered with
/// [`Registry::declare_class`](crate::Registry::declare_class) before they
/// are converted into values.
///
/// ```ignore
/// #[derive(Clone)]
/// struct Point { x: f64, y: f64 }
///
/// user_type!(Point);
/// ```
#[macro_export]
macro_rules! user_type {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::MapType for $ty {
                fn map_type() -> $crate::ValueKind {
                    $crate::ValueKind::User
                }
            }

            impl $crate::FromValue for $ty {
                fn from_value(value: &$crate::Value) -> $crate::ReflectResult<Self> {
                    $crate::user_from_value::<$ty>(value)
                }
            }

            impl $crate::IntoValue for $ty {
                fn into_value(
                    self,
                    registry: &$crate::Registry,
                ) -> $crate::ReflectResult<$crate::Value> {
                    registry.user_object(self).map($crate::Value::User)
                }
            }
        )+
    };
}

/// Make a fieldless native enum usable as values, parameters and return
/// types. Every variant must be listed.
///
/// ```ignore
/// #[derive(Clone, Copy)]
/// enum Side { Left, Right }
///
/// enum_type!(Side { Left, Right });
/// ```
#[macro_export]
macro_rules! enum_type {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::NativeEnum for $ty {
            fn to_i64(self) -> i64 {
                self as i64
            }

            fn from_i64(value: i64) -> ::std::option::Option<Self> {
                $(
                    if value == $ty::$variant as i64 {
                        return ::std::option::Option::Some($ty::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }

        impl $crate::MapType for $ty {
            fn map_type() -> $crate::ValueKind {
                $crate::ValueKind::Enum
            }
        }

        impl $crate::FromValue for $ty {
            fn from_value(value: &$crate::Value) -> $crate::ReflectResult<Self> {
                $crate::enum_from_value::<$ty>(value)
            }
        }

        impl $crate::IntoValue for $ty {
            fn into_value(
                self,
                registry: &$crate::Registry,
            ) -> $crate::ReflectResult<$crate::Value> {
                $crate::enum_into_value(self, registry)
            }
        }
    };
}
