//! # Registry
//!
//! One scope's key→entry store plus a link to its parent. Registries form a
//! tree; a child reads ancestor entries but never mutates them — inheritance
//! works by *materializing* a local copy of the nearest ancestor entry on
//! first local touch, which is what keeps scopes isolated after a read and
//! cheap before one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::debug;

use crate::entry::Entry;
use crate::key::Key;
use crate::policy::{self, ResolvePolicy};

pub(crate) struct Registry {
    entries: RefCell<HashMap<Key, Entry>>,
    parent: Option<Rc<Registry>>,
    policy: Rc<dyn ResolvePolicy>,
}

impl Registry {
    pub(crate) fn root(policy: Rc<dyn ResolvePolicy>) -> Rc<Self> {
        Rc::new(Registry {
            entries: RefCell::new(HashMap::new()),
            parent: None,
            policy,
        })
    }

    /// A fresh child scope. Starts with no local entries; the policy is
    /// inherited from the parent.
    pub(crate) fn child(parent: &Rc<Registry>) -> Rc<Self> {
        Rc::new(Registry {
            entries: RefCell::new(HashMap::new()),
            parent: Some(Rc::clone(parent)),
            policy: Rc::clone(&parent.policy),
        })
    }

    /// The entry for `key` in this registry only — no parent walk.
    pub(crate) fn lookup_local(&self, key: &Key) -> Option<Entry> {
        self.entries.borrow().get(key).cloned()
    }

    /// Replaces the local entry for `key` outright (used by `define`/`set`).
    pub(crate) fn insert_local(&self, key: &Key, entry: Entry) {
        debug!(key = %key, state = ?entry.state, "configure");
        self.entries.borrow_mut().insert(key.clone(), entry);
    }

    /// Ensures a local entry exists for `key`.
    ///
    /// A local hit wins. Otherwise the nearest ancestor holding a non-empty
    /// entry seeds the local copy (with its state mapped for re-validation,
    /// see [`Entry::inherited`]). If no ancestor knows the key at all, the
    /// local entry starts as a pending factory wrapping the default
    /// resolution policy.
    pub(crate) fn materialize(&self, key: &Key) {
        if self.entries.borrow().contains_key(key) {
            return;
        }
        let seeded = self
            .inherit(key)
            .unwrap_or_else(|| Entry::pending_factory(policy::fallback_factory(Rc::clone(&self.policy))));
        debug!(key = %key, state = ?seeded.state, "materialize");
        self.entries.borrow_mut().insert(key.clone(), seeded);
    }

    /// Runs `body` against the (materialized) local entry for `key`.
    ///
    /// The map borrow is scoped to this call; callers must finish all entry
    /// mutation inside `body` and never re-enter the registry from it.
    pub(crate) fn with_entry<R>(&self, key: &Key, body: impl FnOnce(&mut Entry) -> R) -> R {
        self.materialize(key);
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(key.clone()).or_default();
        body(entry)
    }

    fn inherit(&self, key: &Key) -> Option<Entry> {
        let mut cursor = self.parent.clone();
        while let Some(registry) = cursor {
            if let Some(entry) = registry.entries.borrow().get(key) {
                if !entry.is_empty() {
                    return Some(entry.inherited());
                }
            }
            cursor = registry.parent.clone();
        }
        None
    }
}
