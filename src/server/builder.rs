//! ServerBuilder for fluent API to build the HTTP server

use super::handlers::AppState;
use super::router::build_sales_routes;
use crate::config::AppConfig;
use crate::core::service::{DEFAULT_QUERY_TIMEOUT, SalesQueryService};
use crate::core::store::SalesStore;
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builder for the sales HTTP server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemorySalesStore::new())
///     .with_query_timeout(Duration::from_secs(5))
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn SalesStore>>,
    query_timeout: Duration,
    environment: String,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
            environment: "development".to_string(),
            custom_routes: Vec::new(),
        }
    }

    /// Set the record store (required)
    pub fn with_store(mut self, store: impl SalesStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already shared record store (required)
    pub fn with_shared_store(mut self, store: Arc<dyn SalesStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Deadline for every store operation
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Environment name reported by the health endpoints
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Apply timeout and environment from configuration
    pub fn with_config(self, config: &AppConfig) -> Self {
        self.with_query_timeout(config.query.timeout())
            .with_environment(config.environment.clone())
    }

    /// Add routes next to the sales routes
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the query service
    pub fn build_service(&self) -> Result<SalesQueryService> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow!("Record store is required. Call .with_store()"))?;

        Ok(SalesQueryService::new(store).with_timeout(self.query_timeout))
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        let service = Arc::new(self.build_service()?);
        let state = AppState {
            service,
            environment: Arc::from(self.environment.as_str()),
        };

        let mut app = build_sales_routes(state);
        for routes in self.custom_routes {
            app = app.merge(routes);
        }

        Ok(app
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let environment = self.environment.clone();
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!(environment = %environment, "Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
