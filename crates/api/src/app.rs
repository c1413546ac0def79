use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::{Clock, SystemClock};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, trace_id};
use crate::routes::{
    admin, auth, charts, health, invitations, notifications, players, sessions,
};
use crate::services::email::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub email: EmailService,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    create_app_with_clock(config, pool, Arc::new(SystemClock))
}

/// Builds the router with an explicit time source.
pub fn create_app_with_clock(config: Config, pool: PgPool, clock: Arc<dyn Clock>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        email: EmailService::new(config.email.clone()),
        config: config.clone(),
        clock,
    };

    // Any origin when none are configured (development)
    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Every invitation route uses the same `:key` segment; see routes::invitations
    let invitation_routes = Router::new()
        .route(
            "/api/invitations",
            post(invitations::create_invitation).get(invitations::list_invitations),
        )
        .route("/api/invitations/:key", get(invitations::get_invitation))
        .route(
            "/api/invitations/:key/request-renewal",
            post(invitations::request_renewal),
        )
        .route(
            "/api/invitations/:key/approve-renewal",
            post(invitations::approve_renewal),
        )
        .route(
            "/api/invitations/:key/accept",
            post(invitations::accept_invitation),
        )
        .route(
            "/api/invitations/:key/cancel",
            post(invitations::cancel_invitation),
        )
        .route("/api/invitations/:key/signup", post(invitations::signup))
        .route("/api/notifications", get(notifications::list_notifications));

    let roster_routes = Router::new()
        .route(
            "/api/players",
            post(players::create_player).get(players::list_players),
        )
        .route(
            "/api/players/:id",
            get(players::get_player).delete(players::delete_player),
        )
        .route(
            "/api/players/:id/sessions",
            post(sessions::create_session).get(sessions::list_sessions),
        )
        .route("/api/players/:id/chart", get(charts::player_chart))
        .route(
            "/api/sessions/:id",
            put(sessions::update_session).delete(sessions::delete_session),
        );

    let auth_routes = Router::new().route("/api/auth/login", post(auth::login));

    // Guarded per handler by the SetupToken extractor
    let admin_routes = Router::new()
        .route("/api/admin/bootstrap", post(admin::bootstrap))
        .route("/api/admin/users/:id/role", post(admin::update_user_role))
        .route("/api/admin/overview", get(admin::overview));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(invitation_routes)
        .merge(roster_routes)
        .merge(auth_routes)
        .merge(admin_routes)
        // Bottom layers run first
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
