//! Glossar web service
//!
//! The entry point for all external requests.
//! Handles:
//! - Authentication resolution (Bearer JWT)
//! - Rate limiting for the write API
//! - Request routing
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;
mod render;

use axum::{
    extract::Request,
    middleware::Next,
    routing::{get, post},
    Extension, Router,
};
use glossar_common::{
    auth::JwtManager,
    config::{AppConfig, ObservabilityConfig},
    db::{self, DbPool, EntryStore, Repository},
    errors::AppError,
    metrics,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use render::PageRenderer;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn EntryStore>,
    pub pages: Arc<PageRenderer>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!("Starting Glossar server v{}", glossar_common::VERSION);

    // Initialize metrics
    let metrics_handle = PrometheusBuilder::new().install_recorder()?;
    metrics::register_metrics();

    // Initialize database connection
    let db = DbPool::new(&config.database).await?;
    db::ensure_schema(&db).await?;

    // Token validation needs a signing secret
    let secret = config.auth.jwt_secret.clone().ok_or_else(|| {
        AppError::Configuration {
            message: "auth.jwt_secret is not set".to_string(),
        }
    })?;
    let jwt = Arc::new(JwtManager::new(&secret, config.auth.jwt_expiration_secs));

    let config = Arc::new(config);

    // Create app state
    let state = AppState {
        config: config.clone(),
        store: Arc::new(Repository::new(db)),
        pages: Arc::new(PageRenderer::new()?),
    };

    // Build the router
    let app = create_router(state, jwt, metrics_handle);

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize the tracing subscriber from configuration
fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Create the main application router
fn create_router(
    state: AppState,
    jwt: Arc<JwtManager>,
    metrics_handle: PrometheusHandle,
) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // JSON API routes
    let mut api_routes = Router::new()
        .route("/neu", post(handlers::entries::create_entry));

    // Rate limit the write API
    let rate_limit = &state.config.rate_limit;
    if rate_limit.enabled && rate_limit.requests_per_second > 0 {
        let limit = rate_limit.requests_per_second;
        let limiter = middleware::rate_limit::create_rate_limiter(limit, rate_limit.burst);
        api_routes = api_routes.layer(axum::middleware::from_fn(
            move |request: Request, next: Next| {
                let limiter = limiter.clone();
                async move {
                    middleware::rate_limit::rate_limit_middleware(request, next, limiter, limit)
                        .await
                }
            },
        ));
    }

    // Compose the app
    Router::new()
        .nest("/api/v1", api_routes)
        // Server-rendered pages
        .route("/app/hauptseite", get(handlers::pages::main_page))
        // Operational endpoints (no auth)
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .layer(Extension(jwt))
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
