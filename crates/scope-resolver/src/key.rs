//! # Keys
//!
//! A [`Key`] is an opaque identity token: two keys are the same key only if
//! they are the same allocation, never because they share a name. Callers
//! create keys, hold on to them, and pass them to contexts; the engine never
//! manufactures keys on its own.
//!
//! ## Classification
//!
//! Each key carries a closed classification, decided once at construction,
//! that the default resolution policy consults when no scope configured the
//! key explicitly:
//!
//! - **Plain** — nothing can be derived; an unconfigured lookup fails.
//! - **Recipe** — the key ships its own construction recipe, a [`Factory`]
//!   invoked with the resolving context.
//! - **Constructible** — the key's service type has a no-argument default
//!   instance (`T: Default`).
//!
//! Attaching the classification to the key replaces any runtime "does this
//! look like a constructible type?" inspection with an explicit, exhaustive
//! tagged variant.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::context::Context;
use crate::error::BoxError;
use crate::factory::Factory;
use crate::value::{self, Value};

/// How the default policy may produce a value for an unconfigured key.
#[derive(Clone)]
pub(crate) enum KeyKind {
    Plain,
    Recipe(Factory),
    Constructible(Rc<dyn Fn() -> Value>),
}

struct KeyInner {
    name: String,
    kind: KeyKind,
}

/// An opaque identifier for a resolvable service.
///
/// Cheap to clone; compared and hashed by identity. The `name` is purely a
/// diagnostic label — two `Key::new("db")` calls produce two distinct keys.
#[derive(Clone)]
pub struct Key(Rc<KeyInner>);

impl Key {
    /// A plain key with no derivable default.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, KeyKind::Plain)
    }

    /// A key carrying its own construction recipe, used when no scope in the
    /// ancestor chain configured the key explicitly.
    pub fn recipe(name: impl Into<String>, recipe: Factory) -> Self {
        Self::with_kind(name, KeyKind::Recipe(recipe))
    }

    /// A key whose service type has a meaningful no-argument default.
    pub fn constructible<T: Default + 'static>(name: impl Into<String>) -> Self {
        Self::with_kind(
            name,
            KeyKind::Constructible(Rc::new(|| value::pack(T::default()))),
        )
    }

    fn with_kind(name: impl Into<String>, kind: KeyKind) -> Self {
        Key(Rc::new(KeyInner {
            name: name.into(),
            kind,
        }))
    }

    /// The diagnostic name given at construction.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub(crate) fn kind(&self) -> &KeyKind {
        &self.0.kind
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.0.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// A typed veneer over [`Key`].
///
/// The engine itself is untyped (`Value` is `Rc<dyn Any>`); `TypedKey` pins
/// the service type at the API surface so application code gets `Rc<T>` out
/// of [`Context::get`](crate::Context::get) instead of downcasting by hand.
pub struct TypedKey<T> {
    key: Key,
    _marker: PhantomData<fn() -> T>,
}

impl<T: 'static> TypedKey<T> {
    /// A plain typed key.
    pub fn new(name: impl Into<String>) -> Self {
        Self::wrap(Key::new(name))
    }

    /// A typed key carrying its own construction recipe.
    pub fn recipe(
        name: impl Into<String>,
        build: impl Fn(&Context) -> Result<T, BoxError> + 'static,
    ) -> Self {
        let name = name.into();
        let label = format!("{name} (recipe)");
        Self::wrap(Key::recipe(name, Factory::of(label, build)))
    }

    /// A typed key whose service type has a no-argument default.
    pub fn constructible(name: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self::wrap(Key::constructible::<T>(name))
    }

    fn wrap(key: Key) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// The untyped key underneath.
    pub fn raw(&self) -> &Key {
        &self.key
    }
}

// Manual impl: `TypedKey<T>` is clonable regardless of `T`.
impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypedKey({})", self.key.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn keys_compare_by_identity() {
        let a = Key::new("service");
        let b = Key::new("service");
        assert_ne!(a, b, "same name must not mean same key");
        assert_eq!(a, a.clone());
    }

    #[test]
    fn keys_hash_by_identity() {
        let a = Key::new("service");
        let b = Key::new("service");
        let mut map = HashMap::new();
        map.insert(a.clone(), 1);
        map.insert(b.clone(), 2);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&a], 1);
        assert_eq!(map[&b], 2);
    }
}
