//! ServerBuilder for fluent API to build HTTP servers

use super::router::build_routes;
use crate::config::ConfigHandle;
use crate::handlers::AppState;
use crate::links::{LinkResolver, RouteRegistry};
use crate::storage::{InMemoryStore, PersistenceProvider};
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating the HTTP server
///
/// Every collaborator is optional: without a provider the builder uses an
/// [`InMemoryStore`] (seeded when `storage.seed` is set), without a resolver
/// the API's own [`RouteRegistry`], and without a configuration the defaults.
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(ConfigHandle::from_file("config/codecamp.yaml")?)
///     .with_provider(InMemoryStore::seeded())
///     .build()?;
/// ```
#[derive(Default)]
pub struct ServerBuilder {
    provider: Option<Arc<dyn PersistenceProvider>>,
    links: Option<Arc<dyn LinkResolver>>,
    config: Option<ConfigHandle>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the persistence provider
    pub fn with_provider(mut self, provider: impl PersistenceProvider + 'static) -> Self {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// Set the link resolver used to address created resources
    pub fn with_link_resolver(mut self, links: impl LinkResolver + 'static) -> Self {
        self.links = Some(Arc::new(links));
        self
    }

    /// Set the configuration handle
    pub fn with_config(mut self, config: ConfigHandle) -> Self {
        self.config = Some(config);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the state shared by all handlers
    pub fn build_state(&mut self) -> Result<AppState> {
        let config = self.config.take().unwrap_or_default();
        config.current().validate()?;

        let provider = match self.provider.take() {
            Some(provider) => provider,
            None if config.current().storage.seed => Arc::new(InMemoryStore::seeded()),
            None => Arc::new(InMemoryStore::new()),
        };

        let links = self
            .links
            .take()
            .unwrap_or_else(|| Arc::new(RouteRegistry::api_routes()));

        tracing::debug!(backend = provider.backend(), "persistence provider ready");

        Ok(AppState::new(provider, links, config))
    }

    /// Build the final router
    pub fn build(mut self) -> Result<Router> {
        let state = self.build_state()?;
        let mut app = build_routes(state);

        for custom_router in std::mem::take(&mut self.custom_routes) {
            app = app.merge(custom_router);
        }

        Ok(app)
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `server.host:server.port` from the configuration and handles
    /// SIGTERM and SIGINT (Ctrl+C).
    pub async fn serve(mut self) -> Result<()> {
        let config = self.config.get_or_insert_with(ConfigHandle::default).clone();
        let addr = config.current().server.address();

        let app = self.build()?;
        let listener = TcpListener::bind(&addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
