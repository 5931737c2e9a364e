//! # Factory Probes
//!
//! Test support for asserting *how often* the engine actually ran a factory.
//! Smart sharing is all about recompute-vs-reuse decisions, and the decisive
//! observable is the invocation count: a shared value means zero extra calls,
//! an invalidated one means exactly one more.
//!
//! A [`FactoryProbe`] wraps a build closure in a counting [`Factory`]. The
//! probe is cheap to clone and stays valid after being handed to a context.
//!
//! ```
//! use scope_resolver::{Context, FactoryProbe, Key};
//!
//! let probe = FactoryProbe::new();
//! let key = Key::new("service");
//! let ctx = Context::root();
//! ctx.define(&key, probe.factory("service", |_ctx| Ok(String::from("built"))))
//!     .unwrap();
//!
//! ctx.invoke(&key).unwrap();
//! ctx.invoke(&key).unwrap();
//! assert_eq!(probe.calls(), 1, "memoized: the factory ran once");
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::context::Context;
use crate::error::BoxError;
use crate::factory::Factory;
use crate::value;

/// Counts how many times the wrapped factory closure actually ran.
#[derive(Clone, Default)]
pub struct FactoryProbe {
    calls: Rc<Cell<usize>>,
}

impl FactoryProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invocations so far, across every context the factory ran in.
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Wraps `build` in a counting [`Factory`].
    pub fn factory<T: 'static>(
        &self,
        label: &str,
        build: impl Fn(&Context) -> Result<T, BoxError> + 'static,
    ) -> Factory {
        let calls = Rc::clone(&self.calls);
        Factory::new(label.to_owned(), move |ctx, _key| {
            calls.set(calls.get() + 1);
            Ok(value::pack(build(ctx)?))
        })
    }
}
