//! # Resolution Errors
//!
//! This module defines the common error types used throughout the resolver.
//! By centralizing error definitions, we ensure consistent error handling
//! across contexts, factories, and the default policy.
//!
//! Every error is scoped to a single key resolution; there is no fatal or
//! process-level category, and the engine never retries or suppresses.

use std::rc::Rc;

/// Boxed error type accepted at the factory boundary.
///
/// Factories may fail with any error type; the engine caches the boxed cause
/// behind an [`Rc`] so that every subsequent lookup of the same key re-raises
/// the identical cause object.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Errors that can occur while resolving a key.
///
/// The enum is `Clone` on purpose: resolved failures are cached inside the
/// key's entry and re-raised on every later lookup. Cloning a cached error
/// preserves the identity of the underlying cause (it sits behind an `Rc`).
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// The key was already resolved (or failed) in this exact scope, so its
    /// configuration can no longer change.
    #[error("key `{key}` was already read in this scope and can no longer be configured")]
    AlreadyRead { key: String },

    /// The global handle was used outside any factory execution.
    #[error("no context is active; global lookups are only legal inside a factory execution")]
    NoActiveContext,

    /// A key's own factory read the key back while it was resolving.
    /// Cached permanently for the entry.
    #[error("unresolved cycle: `{factory}` read key `{key}` back while resolving it")]
    Cycle { key: String, factory: String },

    /// No value, factory, or recipe exists for the key anywhere in the
    /// ancestor chain.
    #[error("no configuration for key `{key}` in this scope or any ancestor")]
    NoConfiguration { key: String },

    /// A registered factory failed. The cause is cached verbatim and
    /// re-raised identically on every subsequent lookup.
    #[error("factory for key `{key}` failed: {cause}")]
    Factory { key: String, cause: Rc<BoxError> },

    /// A typed accessor asked for a type the stored value does not have.
    #[error("value for key `{key}` is not a `{expected}`")]
    TypeMismatch {
        key: String,
        expected: &'static str,
    },
}

impl ResolveError {
    /// True when the error represents a cached, permanent failure of the key
    /// itself (as opposed to a usage error raised at the call site).
    pub fn is_cached_failure(&self) -> bool {
        matches!(
            self,
            ResolveError::Cycle { .. }
                | ResolveError::NoConfiguration { .. }
                | ResolveError::Factory { .. }
        )
    }
}
