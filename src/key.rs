//! Typed registry keys for dependency lookup.
//!
//! Resolution is keyed by an explicit type tag rather than any reflective
//! lookup: a [`Key`] pairs the `TypeId` of the requested type with its
//! `type_name` for diagnostics.

use std::any::TypeId;

/// Key for dependency storage and lookup.
///
/// # Key Types
///
/// - **Type**: concrete types (structs, enums, primitives)
/// - **Trait**: trait-object bindings (`dyn Logger` and friends)
///
/// # Examples
///
/// ```rust
/// use props_di::{key_of, key_of_trait, Key};
///
/// let k = key_of::<String>();
/// assert_eq!(k.display_name(), "alloc::string::String");
///
/// trait Logger: Send + Sync {}
/// let t = key_of_trait::<dyn Logger>();
/// assert!(t.display_name().contains("Logger"));
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics.
    Type(TypeId, &'static str),
    /// Trait-object binding key. Traits have no TypeId of their own, so the
    /// trait name is the identity.
    Trait(&'static str),
}

impl Key {
    /// The type or trait name for display in errors and logs.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::Trait(name) => name,
        }
    }
}

// TypeId-only comparison for concrete types; the name is diagnostics-only.
impl PartialEq for Key {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Trait(name) => {
                1u8.hash(state);
                name.hash(state);
            }
        }
    }
}

/// Builds the key for a concrete type.
#[inline]
pub fn key_of<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Builds the key for a trait-object binding.
#[inline]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}
