use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::AppState;

pub fn app_router(state: AppState) -> Router {
    // Pages redirect anonymous visitors to the login page
    let pages = Router::new()
        .route(
            "/dashboard",
            get(handlers::dashboard).post(handlers::dashboard_submit),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    // API routes answer anonymous callers with 401 JSON
    let api = Router::new()
        .route("/me", get(auth::auth_me))
        .route("/pattern", post(handlers::create_pattern))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health_check))
        .route("/login", get(auth::auth_login))
        .route("/callback", get(auth::auth_callback))
        .route("/logout", get(auth::auth_logout))
        .merge(pages)
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
