//! # SchoolDesk API
//!
//! The API crate provides the web server behind the school dashboard's
//! timetable pages. It exposes the lesson-slot store, its conflict checks and
//! the teacher directory as JSON endpoints.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into timetable service calls
//! - **Middleware**: Map domain errors to HTTP responses
//! - **Config**: Handle environment and application configuration
//!
//! The API uses Axum as the web framework and SQLx for database interactions.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error handling shared by all handlers
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use eyre::Result;
use schooldesk_core::service::TimetableService;
use schooldesk_core::teachers::TeacherRoster;
use schooldesk_db::backend::{PgSlotBackend, PgTeacherRepo, TeacherRepo};
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

/// Shared application state that is accessible to all request handlers
///
/// The timetable service owns the slot store; the roster is the same teacher
/// directory the store resolves snapshots from.
pub struct ApiState {
    pub timetable: TimetableService,
    pub teachers: Arc<TeacherRoster>,
    pub teacher_repo: Arc<dyn TeacherRepo>,
}

/// Builds the router with every endpoint attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Timetable endpoints
        .merge(routes::timetable::routes())
        // Teacher directory endpoints
        .merge(routes::teacher::routes())
        .with_state(state)
}

/// Starts the API server with the provided configuration and database connection
///
/// Loads the teacher directory and the persisted timetable into memory before
/// accepting requests.
///
/// # Arguments
///
/// * `config` - API configuration including host, port, and other settings
/// * `db_pool` - PostgreSQL connection pool for database operations
pub async fn start_server(config: config::ApiConfig, db_pool: PgPool) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load the teacher directory, then the timetable that refers to it
    let teacher_repo: Arc<dyn TeacherRepo> = Arc::new(PgTeacherRepo::new(db_pool.clone()));
    let teachers = Arc::new(TeacherRoster::from_records(teacher_repo.list_teachers().await?));
    info!("Loaded {} teachers", teachers.len());

    let timetable = TimetableService::load(
        config.timetable_config(),
        teachers.clone(),
        Arc::new(PgSlotBackend::new(db_pool)),
    )
    .await?;

    let state = Arc::new(ApiState {
        timetable,
        teachers,
        teacher_repo,
    });

    let app = app(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Request timeout and request tracing
    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout)))
        .layer(TraceLayer::new_for_http());

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
