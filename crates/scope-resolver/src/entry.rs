//! # Entries
//!
//! An [`Entry`] is the per-key record inside one registry: the key's current
//! resolution state (with the payload held inside the state variant) plus,
//! when the value came out of a dependency-reading factory, the provenance
//! record smart sharing validates against.

use std::fmt;

use crate::context::Context;
use crate::error::ResolveError;
use crate::factory::Factory;
use crate::key::Key;
use crate::value::Value;

/// The per-key resolution state machine states.
///
/// `Empty` doubles as the transient placeholder while a transition swaps the
/// state out of the entry; a persisted `Empty` means "nothing configured".
#[derive(Clone, Default)]
pub(crate) enum State {
    #[default]
    Empty,
    /// A value that has not been read yet in this scope: either set
    /// explicitly or inherited from an ancestor pending re-validation.
    PendingValue(Value),
    /// A factory waiting for the first read.
    PendingFactory(Factory),
    /// The factory is currently executing; observing this state again from
    /// within the same scope is a cycle.
    Resolving(Factory),
    /// Terminal success. The value is returned by identity forever after.
    Resolved(Value),
    /// Terminal failure. The error is re-raised identically forever after.
    Failed(ResolveError),
}

impl State {
    /// Short tag for tracing output.
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            State::Empty => "empty",
            State::PendingValue(_) => "pending-value",
            State::PendingFactory(_) => "pending-factory",
            State::Resolving(_) => "resolving",
            State::Resolved(_) => "resolved",
            State::Failed(_) => "failed",
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Provenance of a factory-produced value: which context ran the factory,
/// which factory it was, and which keys it read (in read order).
///
/// A child scope inheriting the value re-resolves each recorded key locally
/// and compares against the origin context before agreeing to share.
#[derive(Clone)]
pub(crate) struct DepRecord {
    pub origin: Context,
    pub factory: Factory,
    pub reads: Vec<Key>,
}

/// The per-key record owned by exactly one registry.
#[derive(Clone, Default)]
pub(crate) struct Entry {
    pub state: State,
    pub deps: Option<DepRecord>,
}

impl Entry {
    pub(crate) fn pending_value(value: Value) -> Self {
        Entry {
            state: State::PendingValue(value),
            deps: None,
        }
    }

    pub(crate) fn pending_factory(factory: Factory) -> Self {
        Entry {
            state: State::PendingFactory(factory),
            deps: None,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self.state, State::Empty)
    }

    /// Terminal (or mid-read) entries reject further configuration.
    pub(crate) fn is_sealed(&self) -> bool {
        matches!(
            self.state,
            State::Resolved(_) | State::Failed(_) | State::Resolving(_)
        )
    }

    /// The entry a descendant scope materializes from this one.
    ///
    /// Resolved values come across as `PendingValue` (with their provenance
    /// record) so the descendant re-validates before sharing; an in-flight
    /// `Resolving` comes across as the original factory, since the ancestor's
    /// value does not exist yet; cached failures are shared as failures.
    pub(crate) fn inherited(&self) -> Entry {
        match &self.state {
            State::Resolved(value) | State::PendingValue(value) => Entry {
                state: State::PendingValue(value.clone()),
                deps: self.deps.clone(),
            },
            State::PendingFactory(factory) | State::Resolving(factory) => {
                Entry::pending_factory(factory.clone())
            }
            State::Failed(error) => Entry {
                state: State::Failed(error.clone()),
                deps: None,
            },
            State::Empty => Entry::default(),
        }
    }
}
