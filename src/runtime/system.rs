use tracing::info;

use scope_resolver::{service_keys, Context, ResolveError};

use crate::domain::{AppConfig, ConnectionPool, ReportService};

service_keys! {
    /// One typed key per service. Built once at startup; every scope in the
    /// tree resolves against the same key identities.
    pub struct ServiceKeys {
        config: AppConfig,
        pool: ConnectionPool,
        report: ReportService,
    }
}

/// The demo orchestrator: owns the base scope and the key bundle.
///
/// `ServiceSystem` is responsible for:
/// - **Wiring**: registering each service's factory in the base scope, with
///   dependencies expressed as lookups (so the resolver records them)
/// - **Scoping**: forking per-request child scopes that may override any key
///   before the first read
///
/// # Example
///
/// ```
/// use scope_recipe::domain::AppConfig;
/// use scope_recipe::runtime::ServiceSystem;
///
/// let system = ServiceSystem::new(AppConfig::new("prod", "postgres://main")).unwrap();
/// let report = system.render_report(system.base()).unwrap();
/// assert!(report.contains("prod"));
///
/// // A request that needs its own database:
/// let request = system.request_scope();
/// request
///     .set_typed(&system.keys().config, AppConfig::new("prod", "sqlite://replica"))
///     .unwrap();
/// assert!(system.render_report(&request).unwrap().contains("replica"));
/// ```
pub struct ServiceSystem {
    keys: ServiceKeys,
    base: Context,
}

impl ServiceSystem {
    /// Wires the base scope: the config value plus one factory per service.
    ///
    /// Factories pull their dependencies through the resolving context, which
    /// is what lets forked scopes swap a dependency and get a fresh instance
    /// of everything downstream.
    pub fn new(config: AppConfig) -> Result<Self, ResolveError> {
        let keys = ServiceKeys::new();
        let base = Context::root();

        base.set_typed(&keys.config, config)?;

        base.define_typed(&keys.pool, {
            let config = keys.config.clone();
            move |ctx| {
                let cfg = ctx.get(&config)?;
                Ok(ConnectionPool::connect(&cfg.dsn)?)
            }
        })?;

        base.define_typed(&keys.report, {
            let config = keys.config.clone();
            let pool = keys.pool.clone();
            move |ctx| Ok(ReportService::new(ctx.get(&config)?, ctx.get(&pool)?))
        })?;

        info!("service system wired");
        Ok(Self { keys, base })
    }

    pub fn keys(&self) -> &ServiceKeys {
        &self.keys
    }

    /// The long-lived base scope.
    pub fn base(&self) -> &Context {
        &self.base
    }

    /// A fresh scope for one request. Cheap: nothing is copied until the
    /// request actually reads or overrides a key.
    pub fn request_scope(&self) -> Context {
        self.base.fork()
    }

    /// Resolves the report service in `scope` and renders it.
    pub fn render_report(&self, scope: &Context) -> Result<String, ResolveError> {
        let report = scope.get(&self.keys.report)?;
        Ok(report.render())
    }
}
