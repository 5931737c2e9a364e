use tracing::info;

/// A (pretend) database connection pool.
///
/// The pool is built from the configured DSN, so a scope that overrides
/// [`AppConfig`](super::AppConfig) gets its own pool while untouched scopes
/// keep sharing the base instance.
#[derive(Debug)]
pub struct ConnectionPool {
    dsn: String,
    size: u32,
}

/// Errors raised while establishing the pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("connection string is empty")]
    EmptyDsn,
    #[error("unsupported scheme in `{0}`")]
    UnsupportedScheme(String),
}

impl ConnectionPool {
    /// Validates the DSN and "connects".
    pub fn connect(dsn: &str) -> Result<Self, PoolError> {
        if dsn.is_empty() {
            return Err(PoolError::EmptyDsn);
        }
        if !dsn.starts_with("postgres://") && !dsn.starts_with("sqlite://") {
            return Err(PoolError::UnsupportedScheme(dsn.to_owned()));
        }
        info!(dsn, "pool connected");
        Ok(Self {
            dsn: dsn.to_owned(),
            size: 8,
        })
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    pub fn describe(&self) -> String {
        format!("pool({}, size={})", self.dsn, self.size)
    }
}
