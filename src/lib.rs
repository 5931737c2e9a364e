#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Scope Recipe
//!
//! > **A recipe for lazily scoped services in Rust.**
//!
//! This crate demonstrates the [`scope_resolver`] engine on a small, concrete
//! application: a base scope wires a config → pool → report-service chain,
//! and per-request scopes override pieces of it without rebuilding the world
//! or leaking anything back into the base.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Why scoped resolution?
//!
//! Constructing services eagerly couples startup order to the dependency
//! graph and makes per-request variation expensive. Lazy, scoped resolution
//! flips that:
//! - **Laziness**: nothing is built until something asks for it.
//! - **Scoping**: a forked scope sees the parent's configuration but pins its
//!   own copies only when it reads or overrides a key.
//! - **Smart sharing**: a parent-built service is reused in a child only when
//!   every key its factory actually read still resolves identically there —
//!   otherwise the child quietly gets its own instance.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Services ([`domain`])
//! Plain structs with no knowledge of the resolver: [`domain::AppConfig`],
//! [`domain::ConnectionPool`], [`domain::ReportService`].
//!
//! ### 2. The Wiring ([`runtime`])
//! [`runtime::ServiceSystem`] builds the typed key bundle, registers the
//! factories in the base scope, and hands out per-request scopes.
//! [`runtime::setup_tracing`] turns on structured logging (`RUST_LOG=debug`
//! shows every state transition the engine makes).
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Dependencies are lookups
//! A factory asks the resolving context for what it needs
//! (`ctx.get(&keys.pool)?`); the engine records the read. That record is the
//! whole basis for cross-scope invalidation — no manual dependency lists.
//!
//! ### 2. Override before the first read
//! A request scope may replace any key until the key has been read in that
//! scope; afterwards the value is pinned there and reconfiguration is a
//! usage error. Overrides never propagate upward.
//!
//! ### 3. Observability
//! The engine logs every materialization, factory run, and sharing decision
//! via `tracing` with structured fields.

pub mod domain;
pub mod runtime;
