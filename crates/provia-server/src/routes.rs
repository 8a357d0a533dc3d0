//! Route definitions.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/provision/user", post(handlers::provision_user))
        .route("/update/user", post(handlers::update_user))
        .route("/deprovision/user", post(handlers::deprovision_user));

    if state.config().dashboard.enabled {
        let dashboard = Router::new()
            .route("/dashboard", get(handlers::dashboard))
            .layer(middleware::from_fn_with_state(
                state.clone(),
                auth::basic_auth,
            ));
        router = router.merge(dashboard);
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
