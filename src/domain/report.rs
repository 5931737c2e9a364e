use std::rc::Rc;

use super::{AppConfig, ConnectionPool};

/// Renders reports against the configured pool.
///
/// Holds its dependencies by `Rc`: the instances it was *built against*. If a
/// scope swaps the config or the pool out from under it, the resolver builds
/// a fresh `ReportService` for that scope instead of sharing this one.
#[derive(Debug)]
pub struct ReportService {
    config: Rc<AppConfig>,
    pool: Rc<ConnectionPool>,
}

impl ReportService {
    pub fn new(config: Rc<AppConfig>, pool: Rc<ConnectionPool>) -> Self {
        Self { config, pool }
    }

    /// A one-line report naming the environment and backing pool.
    pub fn render(&self) -> String {
        if self.config.verbose {
            format!(
                "[{}] report via {} (dsn={})",
                self.config.environment,
                self.pool.describe(),
                self.pool.dsn()
            )
        } else {
            format!("[{}] report via {}", self.config.environment, self.pool.describe())
        }
    }
}
