//! # Context Handles
//!
//! A [`Context`] is the caller-facing handle over exactly one registry:
//! lookup ([`invoke`](Context::invoke) / [`get`](Context::get)),
//! configuration ([`define`](Context::define) / [`set`](Context::set)), and
//! scoping ([`fork`](Context::fork)). Handles are cheap to clone and compare
//! by registry identity.
//!
//! [`Global`] is the distinguished root handle: it owns no registry of its
//! own and delegates every operation to whichever context is currently
//! ambient, refusing to operate when none is. This is what keeps factories
//! inside tracked extents and rules out untracked global service state.

use std::fmt;
use std::rc::Rc;

use crate::ambient;
use crate::entry::{Entry, State};
use crate::error::ResolveError;
use crate::factory::Factory;
use crate::key::{Key, TypedKey};
use crate::policy::{DefaultPolicy, ResolvePolicy};
use crate::registry::Registry;
use crate::resolve;
use crate::value::{self, Value};

/// A handle bound to one resolution scope.
#[derive(Clone)]
pub struct Context {
    registry: Rc<Registry>,
}

impl Context {
    /// A fresh root scope using the [`DefaultPolicy`] fallback.
    pub fn root() -> Self {
        Self::with_policy(Rc::new(DefaultPolicy))
    }

    /// A fresh root scope with a custom fallback policy. Children forked
    /// from this context inherit the policy.
    pub fn with_policy(policy: Rc<dyn ResolvePolicy>) -> Self {
        Context {
            registry: Registry::root(policy),
        }
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Resolves `key` in this scope, computing, inheriting, or re-validating
    /// as needed. Repeated calls return the identical value or re-raise the
    /// identical cached failure.
    pub fn invoke(&self, key: &Key) -> Result<Value, ResolveError> {
        resolve::resolve(self, key)
    }

    /// Typed lookup: [`invoke`](Context::invoke) plus a downcast.
    pub fn get<T: 'static>(&self, key: &TypedKey<T>) -> Result<Rc<T>, ResolveError> {
        let found = self.invoke(key.raw())?;
        found
            .downcast::<T>()
            .map_err(|_| ResolveError::TypeMismatch {
                key: key.raw().name().into(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Registers a factory for `key` in this scope. Chainable.
    ///
    /// Fails with [`ResolveError::AlreadyRead`] once the key has resolved
    /// (or failed, or is mid-resolution) here; ancestor scopes are unaffected.
    pub fn define(&self, key: &Key, factory: Factory) -> Result<&Self, ResolveError> {
        self.configure(key, State::PendingFactory(factory))
    }

    /// Registers a typed factory closure for `key`. Chainable.
    pub fn define_typed<T: 'static>(
        &self,
        key: &TypedKey<T>,
        build: impl Fn(&Context) -> Result<T, crate::error::BoxError> + 'static,
    ) -> Result<&Self, ResolveError> {
        let label = format!("{} (defined)", key.raw().name());
        self.define(key.raw(), Factory::of(label, build))
    }

    /// Sets an already-constructed value for `key` in this scope. Chainable.
    pub fn set(&self, key: &Key, found: Value) -> Result<&Self, ResolveError> {
        self.configure(key, State::PendingValue(found))
    }

    /// Sets a typed value for `key`. Chainable.
    pub fn set_typed<T: 'static>(
        &self,
        key: &TypedKey<T>,
        found: T,
    ) -> Result<&Self, ResolveError> {
        self.set(key.raw(), value::pack(found))
    }

    /// A child scope. Nothing is copied up front: entries materialize in the
    /// child only when a key is first looked up, set, or defined there.
    pub fn fork(&self) -> Context {
        Context {
            registry: Registry::child(&self.registry),
        }
    }

    /// Forks a child scope and immediately resolves `key` in it.
    pub fn fork_invoke(&self, key: &Key) -> Result<Value, ResolveError> {
        self.fork().invoke(key)
    }

    fn configure(&self, key: &Key, state: State) -> Result<&Self, ResolveError> {
        if self
            .registry
            .lookup_local(key)
            .is_some_and(|entry| entry.is_sealed())
        {
            return Err(ResolveError::AlreadyRead {
                key: key.name().into(),
            });
        }
        self.registry.insert_local(key, Entry { state, deps: None });
        Ok(self)
    }
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.registry, &other.registry)
    }
}

impl Eq for Context {}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Context({:p})", Rc::as_ptr(&self.registry))
    }
}

/// The distinguished root handle: "whichever context is resolving right now".
///
/// Useful for code deep inside a factory call tree that wants the current
/// scope without threading a `Context` parameter through every signature.
pub struct Global;

impl Global {
    /// The ambient context, or [`ResolveError::NoActiveContext`] when called
    /// outside any factory execution.
    pub fn current() -> Result<Context, ResolveError> {
        ambient::current().ok_or(ResolveError::NoActiveContext)
    }

    /// Resolves `key` against the ambient context.
    pub fn invoke(key: &Key) -> Result<Value, ResolveError> {
        Self::current()?.invoke(key)
    }

    /// Typed lookup against the ambient context.
    pub fn get<T: 'static>(key: &TypedKey<T>) -> Result<Rc<T>, ResolveError> {
        Self::current()?.get(key)
    }
}
