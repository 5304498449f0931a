//! API route handlers

pub mod admin;
pub mod auth;
pub mod checkin;
pub mod content;
pub mod health;
pub mod saved;
pub mod users;

use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::middleware::auth::{optional_auth, require_auth};
use crate::state::AppState;

/// Create the API router.
///
/// The router matcher allows only one parameter name per path position,
/// so every `/api/content/:id/...` route shares the `:id` segment even
/// where it carries a category (browse, daily) rather than a content id.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    let community = Router::new()
        .route("/api/content/feed", get(content::feed))
        .route("/api/content/:id", get(content::browse))
        .layer(from_fn_with_state(state.clone(), optional_auth));

    let protected = Router::new()
        .route(
            "/api/auth/profile",
            get(auth::profile).put(auth::update_profile),
        )
        .route("/api/auth/change-password", post(auth::change_password))
        .route("/api/checkin/info", get(checkin::info))
        .route("/api/checkin", post(checkin::checkin))
        .route("/api/content/mine", get(content::mine))
        .route("/api/content/submit", post(content::submit))
        .route("/api/content/:id/daily", get(content::daily))
        .route("/api/content/:id/vote", post(content::vote))
        .route("/api/content/:id/report", post(content::report))
        .route("/api/content/:id/unlock", post(content::unlock))
        .route("/api/saved", get(saved::list))
        .route(
            "/api/saved/:content_id",
            post(saved::save).delete(saved::unsave),
        )
        .route("/api/users/points-history", get(users::points_history))
        .route("/api/users/stats", get(users::stats))
        .route("/api/admin/content/:id", delete(admin::delete_content))
        .route("/api/admin/reported", get(admin::reported))
        .route("/api/admin/stats", get(admin::stats))
        .layer(from_fn_with_state(state.clone(), require_auth));

    public
        .merge(community)
        .merge(protected)
        .with_state(state)
}
