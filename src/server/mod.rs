use crate::config::Config;
use crate::fetcher::{PageSource, ResultPageFetcher};
use crate::filter::UrlFilterCodec;
use crate::images::ImageUrlBuilder;
use crate::tmdb::TmdbGateway;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod routes_movies;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    /// Source of result pages (the TMDB-backed fetcher in production)
    pub pages: Arc<dyn PageSource>,
    pub images: ImageUrlBuilder,
    /// Parser for `search` / `releaseYear` / `page` query strings
    pub codec: UrlFilterCodec,
}

impl AppContext {
    pub fn new(config: &Config, pages: Arc<dyn PageSource>) -> Self {
        Self {
            images: ImageUrlBuilder::new(&config.images),
            codec: UrlFilterCodec::new(config.browse.available_years.clone()),
            pages,
        }
    }

    /// Build the production context, failing fast on missing TMDB settings.
    pub fn from_config(config: &Config) -> Result<Self> {
        let gateway =
            TmdbGateway::new(&config.tmdb).context("Failed to initialize TMDB gateway")?;
        let fetcher = ResultPageFetcher::new(Arc::new(gateway))
            .with_unfiltered_listing(config.browse.unfiltered_listing);
        Ok(Self::new(config, Arc::new(fetcher)))
    }
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        // Health check
        .route("/health", get(health_check))
        .nest("/api", routes_movies::movie_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve static files if directory is provided
    // Uses SPA fallback: serves index.html for any route that doesn't match a file
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let static_dir = config.server.static_dir.clone();
    let ctx = AppContext::from_config(&config)?;
    let app = create_router(ctx, static_dir);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
