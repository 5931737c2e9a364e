use serde::{Deserialize, Serialize};

/// Application configuration: the root of every dependency chain in the demo.
///
/// Per-request scopes override this key to re-point everything that was built
/// against it (the pool, the report service) without touching the base scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: String,
    pub dsn: String,
    pub verbose: bool,
}

impl AppConfig {
    pub fn new(environment: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            dsn: dsn.into(),
            verbose: false,
        }
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }
}
