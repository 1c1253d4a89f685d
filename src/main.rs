//! Salon Admin Backend
//!
//! REST and WebSocket backend for the salon admin dashboard: catalogue,
//! promotions, staff, attendance and the daily task board, persisted in SQLite.

mod api;
mod attendance;
mod auth;
mod changes;
mod config;
mod dashboard;
mod db;
mod display;
mod errors;
mod images;
mod models;
mod promotions;
mod staff;
mod tasks;

use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use changes::ChangeFeed;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let (text_layer, json_layer) = if config.log_json {
        (None, Some(tracing_subscriber::fmt::layer().json()))
    } else {
        (Some(tracing_subscriber::fmt::layer()), None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .init();

    tracing::info!("Starting Salon Admin Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (SALON_API_PSK). Authentication is disabled!");
    }

    // Initialize database and change feed
    let pool = db::init_database(&config.db_path).await?;
    let feed = Arc::new(ChangeFeed::new(config.change_buffer));
    let repo = Arc::new(Repository::new(pool, feed));

    if let Some(seed) = &config.bookings_seed {
        let imported = db::import_bookings_file(&repo, seed).await?;
        tracing::info!("Imported {} bookings from {:?}", imported, seed);
    }

    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        // Catalog
        .route("/branches", get(api::list_branches).post(api::create_branch))
        .route(
            "/branches/{id}",
            put(api::update_branch).delete(api::delete_branch),
        )
        .route(
            "/categories",
            get(api::list_categories).post(api::create_category),
        )
        .route(
            "/categories/{id}",
            put(api::update_category).delete(api::delete_category),
        )
        .route("/services", get(api::list_services).post(api::create_service))
        .route(
            "/services/{id}",
            put(api::update_service).delete(api::delete_service),
        )
        // Promotions
        .route("/offers", get(api::list_offers).post(api::save_offer))
        .route("/offers/{id}", delete(api::delete_offer))
        .route("/referrals", get(api::list_referrals).post(api::save_referral))
        .route("/referrals/{id}", delete(api::delete_referral))
        .route("/images/encode", post(api::encode_image))
        // Staff and attendance
        .route("/staff", get(api::list_staff).post(api::save_staff))
        .route("/staff/{id}", delete(api::delete_staff))
        .route("/attendance", get(api::get_attendance))
        .route(
            "/attendance/{staff_id}/{action}",
            post(api::record_attendance),
        )
        // Day board
        .route("/bookings", get(api::list_bookings))
        .route("/tasks", get(api::list_tasks))
        .route("/dashboard", get(api::get_dashboard))
        // Change subscriptions
        .route("/changes/{collection}", get(api::subscribe_changes))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    // `?key=` must not reach the request spans.
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        tracing::debug_span!(
            "request",
            method = %req.method(),
            uri = %auth::redact_key(req.uri()),
            version = ?req.version(),
        )
    });

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
