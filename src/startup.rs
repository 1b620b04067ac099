use crate::config::Config;
use crate::error::Error;
use crate::handlers::{health_handler, import_ics_handler, relay_image_handler};
use crate::ics_import::genre::GenreTable;
use crate::image_relay::ImageRelay;
use crate::shutdown;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<Config>,
    /// Genre table used by the calendar import
    pub genres: Arc<GenreTable>,
    /// Image relay cascade
    pub relay: Arc<ImageRelay>,
}

impl AppState {
    /// Build state with the standard relay cascade
    pub fn new(config: Config) -> Self {
        let relay = ImageRelay::from_config(&config);
        Self::with_relay(config, relay)
    }

    /// Build state around a specific relay
    pub fn with_relay(config: Config, relay: ImageRelay) -> Self {
        Self {
            genres: Arc::new(config.genres.clone()),
            relay: Arc::new(relay),
            config: Arc::new(config),
        }
    }
}

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Config(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load the application config
pub fn load_config() -> miette::Result<Config> {
    match Config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Assemble the router: import, relay (with its own CORS policy), health and public uploads
pub fn build_router(state: AppState) -> Router {
    let relay_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(24 * 60 * 60));

    let relay_routes = Router::new()
        .route("/api/image-relay", post(relay_image_handler))
        .layer(relay_cors);

    let uploads_dir = state.config.public_dir.join("uploads");

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/events/import-ics", post(import_ics_handler))
        .merge(relay_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the listener and serve until a shutdown signal arrives
pub async fn start_server(config: Config) -> miette::Result<()> {
    let addr = config.bind_address();
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(Error::from)?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::wait_for_signal())
        .await
        .map_err(Error::from)?;

    info!("Server stopped");
    Ok(())
}
