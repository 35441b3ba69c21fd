mod auth;
mod pets;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::middleware::require_session;
use crate::auth::session::SessionSigner;
use crate::config::Config;
use crate::db::DbPool;
use crate::services::listings::ListingClient;

const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub sessions: SessionSigner,
    pub listings: ListingClient,
}

impl AppState {
    pub fn new(db: DbPool, config: &Config) -> Self {
        Self {
            db,
            sessions: SessionSigner::new(&config.session_secret, config.secure_cookies),
            listings: ListingClient::from_config(config),
        }
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health));

    let auth_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/session", get(auth::session));

    let pet_routes = Router::new()
        .route("/api/pets", get(pets::list))
        .route("/api/pets/browse", get(pets::browse))
        .route("/api/pets/gemini", get(pets::ai_search))
        .route("/api/pets/gemini/image", post(pets::image_search))
        .route("/api/pets/voice-to-text", post(pets::voice_to_text))
        .route("/api/filters", get(pets::filter_options))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES));

    let protected = Router::new()
        .route("/api/profile", get(auth::profile))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(health_routes)
        .merge(auth_routes)
        .merge(pet_routes)
        .merge(protected)
        .with_state(state)
}

#[cfg(test)]
mod tests;
