//! Sample services wired through the resolver in the demo runtime.
//!
//! The dependency chain is deliberately simple:
//! `AppConfig` ← `ConnectionPool` ← `ReportService`. Overriding the config in
//! a forked scope invalidates everything downstream *in that scope only*.

pub mod config;
pub mod database;
pub mod report;

pub use config::*;
pub use database::*;
pub use report::*;
