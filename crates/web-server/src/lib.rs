use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use configuration::{IdRoute, ServerSettings, Settings, ValidationSettings};
use core_types::{UnknownFields, validate_id};
use database::{DbRepository, Repository};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

use crate::error::AppError;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub validation: ValidationSettings,
}

impl AppState {
    pub fn new(repo: Arc<dyn Repository>, validation: ValidationSettings) -> Self {
        Self { repo, validation }
    }

    pub fn unknown_fields(&self) -> UnknownFields {
        UnknownFields::from_strict(self.validation.reject_unknown_fields)
    }

    /// Runs the identifier schema on `raw` when `route` has it enabled.
    /// The statement still binds the raw path segment.
    pub fn check_id(&self, route: IdRoute, raw: &str) -> Result<(), AppError> {
        if self.validation.id_checks.enabled(route) {
            validate_id(raw)?;
        }
        Ok(())
    }
}

/// Registers every route and the cross-cutting layers.
pub fn build_router(state: Arc<AppState>, server: &ServerSettings) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let mut app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/agents", get(handlers::list_agents))
        .route("/api/companys", get(handlers::list_companies))
        .route("/api/company", post(handlers::create_company))
        .route(
            "/api/company/:id",
            get(handlers::get_company)
                .delete(handlers::delete_company)
                .patch(handlers::patch_company)
                .put(handlers::put_company),
        )
        .route("/api/customers", get(handlers::list_customers))
        .route("/api/customers/:country", get(handlers::customers_by_country))
        .route("/api/foods", get(handlers::list_foods))
        .route("/api/foods/:id", get(handlers::get_food))
        .with_state(state)
        .layer(cors)
        .layer(DefaultBodyLimit::max(server.body_limit_bytes));

    if let Some(timeout) = server.request_timeout() {
        app = app.layer(TimeoutLayer::new(timeout));
    }

    // Outermost, so every request is logged, including timed-out ones.
    app.layer(TraceLayer::new_for_http())
}

/// The main function to configure and run the web server.
///
/// Tracing must already be installed by the caller.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let pool = database::connect(&settings.database)?;
    match database::probe(&pool).await {
        Ok(connection_id) => tracing::info!(connection_id, "Connected to the database."),
        Err(e) => tracing::warn!(error = %e, "Not connected to the database; requests will fail until it is reachable."),
    }
    if settings.database.run_migrations {
        database::run_migrations(&pool).await?;
        tracing::info!("Database migrations applied.");
    }

    let repo: Arc<dyn Repository> = Arc::new(DbRepository::new(pool));
    let app_state = Arc::new(AppState::new(repo, settings.validation.clone()));
    let app = build_router(app_state, &settings.server);

    let addr = settings.server.address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Web server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for the shutdown signal.");
    }
}
