//! HTTP server assembly and listener lifecycle.
//!
//! Builds the axum router, wires the shared application state and serves
//! on the configured port. When TLS material is configured a second
//! listener is bound on the fixed TLS port alongside the plain one.

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::constants::{DEFAULT_MAX_BODY_SIZE, TLS_PORT};
use crate::storage::{ObjectStore, S3ObjectStore};
use crate::watermark::WatermarkProcessor;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Watermark pipeline, logo path baked in.
    pub processor: Arc<WatermarkProcessor>,
    /// Destination for processed uploads.
    pub store: Arc<dyn ObjectStore>,
    /// Greeting served at `/`, resolved once at startup.
    pub greeting: String,
}

impl AppState {
    pub fn new(
        processor: WatermarkProcessor,
        store: Arc<dyn ObjectStore>,
        stack_name: &str,
    ) -> Self {
        let host = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            processor: Arc::new(processor),
            store,
            greeting: format!("Hello Cloud from {host} IN {stack_name}"),
        }
    }
}

/// Build the application router on top of the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::greeting))
        .route("/api/upload", post(handlers::upload))
        .layer(DefaultBodyLimit::max(DEFAULT_MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect the object store, bind the listeners and serve until shutdown.
pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = S3ObjectStore::connect(&config.storage).await;
    let processor = WatermarkProcessor::new(&config.logo_path);
    let state = AppState::new(processor, Arc::new(store), &config.stack_name);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    match &config.server.tls {
        Some(tls) => {
            let tls_addr = SocketAddr::from(([0, 0, 0, 0], TLS_PORT));
            let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
            tracing::info!(
                port = config.server.port,
                tls_port = TLS_PORT,
                "listening on HTTP and HTTPS"
            );
            let plain = axum_server::bind(addr).serve(app.clone().into_make_service());
            let secure = axum_server::bind_rustls(tls_addr, rustls).serve(app.into_make_service());
            tokio::try_join!(plain, secure)?;
        }
        None => {
            tracing::info!(port = config.server.port, "listening on HTTP");
            axum_server::bind(addr)
                .serve(app.into_make_service())
                .await?;
        }
    }

    Ok(())
}
