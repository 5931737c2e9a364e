//! # Default Resolution Policy
//!
//! The pluggable fallback the engine invokes when a key has no explicit
//! value or factory anywhere in the ancestor chain. The engine only ever
//! calls through the [`ResolvePolicy`] trait; [`DefaultPolicy`] is the
//! standard implementation, driven entirely by the key's closed
//! classification (see [`crate::key`]).

use std::rc::Rc;

use crate::context::Context;
use crate::error::{BoxError, ResolveError};
use crate::key::{Key, KeyKind};
use crate::value::Value;

/// Strategy invoked for keys with no configuration in any scope.
pub trait ResolvePolicy {
    /// Produce a value for `key`, or fail. Errors flow through the normal
    /// factory-failure path and are cached like any other factory error.
    fn resolve(&self, ctx: &Context, key: &Key) -> Result<Value, BoxError>;

    /// Diagnostic label used when the policy shows up in cycle errors.
    fn label(&self) -> &str {
        "default policy"
    }
}

/// Resolves a key from its own classification:
///
/// 1. a key carrying a recipe has that recipe invoked with the context;
/// 2. a default-constructible key produces its default instance;
/// 3. a plain key fails with [`ResolveError::NoConfiguration`].
pub struct DefaultPolicy;

impl ResolvePolicy for DefaultPolicy {
    fn resolve(&self, ctx: &Context, key: &Key) -> Result<Value, BoxError> {
        match key.kind() {
            KeyKind::Recipe(recipe) => recipe.call(ctx, key),
            KeyKind::Constructible(construct) => Ok(construct()),
            KeyKind::Plain => Err(ResolveError::NoConfiguration {
                key: key.name().into(),
            }
            .into()),
        }
    }
}

/// Wraps a policy as the pending factory a registry seeds for unknown keys,
/// so the state machine drives it exactly like a user-registered factory
/// (cycle guard, dependency tracking, failure caching included).
pub(crate) fn fallback_factory(policy: Rc<dyn ResolvePolicy>) -> crate::factory::Factory {
    let label: Rc<str> = policy.label().into();
    crate::factory::Factory::new(label, move |ctx, key| policy.resolve(ctx, key))
}
