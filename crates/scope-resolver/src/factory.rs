//! # Factories
//!
//! A [`Factory`] is the unit of lazy construction: a labeled closure invoked
//! by the resolution state machine when a key needs a concrete value. The
//! label exists purely for diagnostics (cycle errors name the factory that
//! looped; tracing output names the factory that ran).
//!
//! Factories are cheaply clonable (`Rc` internals) because entries copy them
//! across scope boundaries: a child scope that invalidates an inherited value
//! re-runs the *origin* factory locally.

use std::fmt;
use std::rc::Rc;

use crate::context::Context;
use crate::error::BoxError;
use crate::key::Key;
use crate::value::{self, Value};

type FactoryFn = dyn Fn(&Context, &Key) -> Result<Value, BoxError>;

/// A labeled resolution closure.
///
/// The closure receives the context performing the resolution (so it can look
/// up its own dependencies, which the engine records) and the key being
/// resolved (useful for generic factories serving several keys).
#[derive(Clone)]
pub struct Factory {
    label: Rc<str>,
    run: Rc<FactoryFn>,
}

impl Factory {
    /// Creates a factory from a raw closure producing an untyped [`Value`].
    pub fn new(
        label: impl Into<Rc<str>>,
        run: impl Fn(&Context, &Key) -> Result<Value, BoxError> + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            run: Rc::new(run),
        }
    }

    /// Creates a factory from a closure producing a concrete service type.
    ///
    /// This is the constructor almost all application code wants; the result
    /// is packed into a [`Value`] automatically.
    pub fn of<T: 'static>(
        label: impl Into<Rc<str>>,
        build: impl Fn(&Context) -> Result<T, BoxError> + 'static,
    ) -> Self {
        Self::new(label, move |ctx, _key| Ok(value::pack(build(ctx)?)))
    }

    /// The diagnostic label given at construction.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn call(&self, ctx: &Context, key: &Key) -> Result<Value, BoxError> {
        (self.run)(ctx, key)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Factory({})", self.label)
    }
}

impl fmt::Display for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
