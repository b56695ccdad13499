use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::service::AuthService;
use crate::config::Config;
use crate::db::store::ContactStore;
use crate::handlers::auth::{
    confirmed_email, login, logout, refresh_token, request_email, reset_password, set_password,
    signup,
};
use crate::handlers::contacts::{
    birthday_contacts, create_contact, delete_contact, get_contact, list_contacts, update_contact,
};
use crate::handlers::health::{healthchecker, index};
use crate::handlers::users::{change_password, me};
use crate::services::rate_limit::{RateLimiter, limit_by_token_subject};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub contacts: Arc<dyn ContactStore>,
    pub limiter: Arc<RateLimiter>,
    pub config: Arc<Config>,
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh_token", get(refresh_token))
        .route("/confirmed_email/{token}", get(confirmed_email))
        .route("/request_email", post(request_email))
        .route("/reset_password", post(reset_password))
        .route("/set_password", post(set_password))
        .route("/logout", post(logout))
}

fn contact_routes(state: &AppState) -> Router<AppState> {
    // List and create share a window keyed by the token subject; the other
    // contact routes are not limited.
    let limited = Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            limit_by_token_subject,
        ));

    Router::new()
        .route("/birthday", get(birthday_contacts))
        .route(
            "/{id}",
            get(get_contact).put(update_contact).delete(delete_contact),
        )
        .merge(limited)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/change_password", post(change_password))
}

/// Assemble the full application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/healthchecker", get(healthchecker))
        .nest("/api/auth", auth_routes())
        .nest("/api/contacts", contact_routes(&state))
        .nest("/api/users", user_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
