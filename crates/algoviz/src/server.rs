//! HTTP server for the algorithm trace API.
//!
//! This module provides the main [`TraceServer`] that serves the REST API
//! defined in [`crate::api`]. The server is built on top of the
//! [axum](https://docs.rs/axum) web framework.
//!
//! # Examples
//!
//! ## Server with graceful shutdown
//!
//! ```rust,ignore
//! use algoviz::{ServerConfig, TraceServer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = TraceServer::new(ServerConfig::default());
//!
//!     let shutdown = async {
//!         tokio::signal::ctrl_c().await.ok();
//!     };
//!
//!     server.start_with_shutdown(shutdown).await?;
//!     Ok(())
//! }
//! ```

use crate::api::create_router;
use crate::error::{Error, Result};

use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Configuration for the trace server.
///
/// # Examples
///
/// ```
/// use algoviz::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.host, "127.0.0.1");
/// assert_eq!(config.port, 5000);
///
/// let prod = ServerConfig::production();
/// assert!(!prod.enable_cors);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The host address to bind the server to.
    ///
    /// Common values:
    /// - `"127.0.0.1"` - localhost only (default)
    /// - `"0.0.0.0"` - all network interfaces
    pub host: String,

    /// The port to listen on. Default is `5000`.
    pub port: u16,

    /// Whether to send permissive Cross-Origin Resource Sharing (CORS) headers.
    ///
    /// The visualization front end is usually served from a different origin,
    /// so this defaults to `true`.
    pub enable_cors: bool,

    /// Whether to log every HTTP request and response.
    pub enable_tracing: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enable_cors: true,
            enable_tracing: true,
        }
    }
}

impl ServerConfig {
    /// Binds to all interfaces, with CORS and request tracing on.
    pub fn development() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            ..Self::default()
        }
    }

    /// Localhost only, with CORS and request tracing off.
    pub fn production() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            enable_cors: false,
            enable_tracing: false,
        }
    }

    /// Converts the host and port into a [`SocketAddr`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host is not a valid IP address.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))
    }
}

/// The trace server: the API router plus the configured middleware.
pub struct TraceServer {
    config: ServerConfig,
}

impl TraceServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Builds the router with CORS and tracing layers applied per the config.
    pub fn app(&self) -> Router {
        let mut app = create_router();

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        if self.config.enable_tracing {
            app = app.layer(TraceLayer::new_for_http());
        }

        app
    }

    /// Starts the server and runs it until an error occurs.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid, binding fails or the server
    /// loop fails.
    pub async fn start(self) -> Result<()> {
        self.start_with_shutdown(std::future::pending()).await
    }

    /// Starts the server and runs it until `shutdown_signal` completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid, binding fails or the server
    /// loop fails.
    pub async fn start_with_shutdown<F>(self, shutdown_signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.socket_addr()?;
        let app = self.app();

        log::info!("Starting AlgoViz server on http://{}", addr);
        log::info!("  - AVL:        POST http://{}/api/avl-tree", addr);
        log::info!("  - Dijkstra:   POST http://{}/api/dijkstra", addr);
        log::info!("  - Algorithms: GET  http://{}/api/algorithms", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        log::info!("Server shutdown complete");
        Ok(())
    }
}
