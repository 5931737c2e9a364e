//! # Scope Resolver
//!
//! > **A lazy, hierarchical key/value resolution engine.**
//!
//! This crate maps abstract "give me the thing identified by key K" requests
//! to concrete values, with memoization, parent/child inheritance between
//! resolution scopes, and automatic invalidation when a cached value's
//! inputs were overridden downstream.
//!
//! ## Core Concepts
//!
//! ### Scopes that fork
//! A [`Context`] is a handle over one resolution scope. Forking it creates a
//! child scope that sees everything the parent configured — lazily. Nothing
//! is copied at fork time; an entry materializes in the child the first time
//! the key is looked up, set, or defined there. Once a key has been read in
//! a scope, its value is pinned there forever (and attempts to reconfigure
//! it are usage errors).
//!
//! ### Smart sharing
//! The interesting case is a service the *parent* already built whose own
//! dependencies the *child* overrides. Each factory execution records which
//! keys it read; when a child inherits the resolved value, the engine
//! re-resolves exactly those keys in the child and compares them by identity
//! with the origin scope. All identical ⇒ the child shares the parent's
//! instance. Any drift ⇒ the origin factory re-runs locally, building a
//! fresh instance against the child's configuration. No full invalidation
//! sweep, no accidental sharing of services built against stale inputs.
//!
//! ### The ambient context
//! While a factory runs, the engine tracks the "currently resolving" context
//! in a thread-local frame so nested lookups are attributed to the right
//! factory. The [`Global`] handle exposes that frame to code that cannot
//! thread a `Context` parameter through — and refuses to operate outside any
//! factory execution, which is what keeps service state out of untracked
//! globals.
//!
//! ## Quick Start
//!
//! ```
//! use scope_resolver::{Context, Factory, Key};
//!
//! let config = Key::new("config");
//! let service = Key::new("service");
//!
//! let root = Context::root();
//! root.set(&config, scope_resolver::value::pack(String::from("prod")))
//!     .unwrap();
//! root.define(
//!     &service,
//!     Factory::of("service", {
//!         let config = config.clone();
//!         move |ctx| {
//!             let cfg = ctx.invoke(&config)?;
//!             let cfg = scope_resolver::value::unpack::<String>(&cfg).unwrap();
//!             Ok(format!("service[{cfg}]"))
//!         }
//!     }),
//! )
//! .unwrap();
//!
//! let built = root.invoke(&service).unwrap();
//! assert_eq!(
//!     *scope_resolver::value::unpack::<String>(&built).unwrap(),
//!     "service[prod]"
//! );
//!
//! // A child that does not touch `config` shares the parent's instance.
//! let child = root.fork();
//! let shared = child.invoke(&service).unwrap();
//! assert!(scope_resolver::value::same(&built, &shared));
//! ```
//!
//! For typed keys, recipes, and per-request override patterns, see
//! [`TypedKey`], [`service_keys!`], and the `scope-recipe` demo package.
//!
//! ## Module Tour
//!
//! - [`context`] — the caller-facing [`Context`] and [`Global`] handles.
//! - [`key`] — opaque identity [`Key`]s, their closed classification, and
//!   the [`TypedKey`] veneer.
//! - [`factory`] — labeled resolution closures.
//! - [`policy`] — the pluggable fallback for unconfigured keys.
//! - [`error`] — the [`ResolveError`] taxonomy.
//! - [`value`] — dynamically typed values with identity comparison.
//! - [`probe`] — invocation-counting factories for tests.
//!
//! The state machine itself ([`resolve`](crate::context::Context::invoke)),
//! the per-scope store, and the ambient frame are internal.
//!
//! ## Concurrency Model
//!
//! Single-threaded, synchronous, reentrant. Factories may look up further
//! keys (including across contexts); the ambient frame is saved and restored
//! around every nested execution. A factory that reads its own key back is
//! converted into a permanent, cached cycle error. There are no suspension
//! points and no locks; a multi-threaded adaptation would need per-registry
//! mutual exclusion and a properly scoped task-local frame.

pub mod context;
pub mod error;
pub mod factory;
pub mod key;
pub mod policy;
pub mod probe;
pub mod value;

mod ambient;
mod entry;
mod macros;
mod registry;
mod resolve;

// Re-export core types for convenience
pub use context::{Context, Global};
pub use error::{BoxError, ResolveError};
pub use factory::Factory;
pub use key::{Key, TypedKey};
pub use policy::{DefaultPolicy, ResolvePolicy};
pub use probe::FactoryProbe;
pub use value::Value;

#[doc(hidden)]
pub use paste as __paste;
