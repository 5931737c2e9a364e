//! Runtime orchestration for the demo application.
//!
//! # Main Components
//!
//! - [`ServiceSystem`] - wires the base scope and hands out request scopes
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod system;
pub mod tracing;

pub use system::*;
pub use tracing::*;
