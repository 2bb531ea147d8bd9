pub mod rest;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{
    delete_transformation_handler, get_transformation_handler, list_transformations_handler,
    transform_handler, update_transformation_handler,
};
use state::AppState;

/// Builds the `/api` routes. Layers such as CORS and body limits are left to the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/transform", post(transform_handler))
        .route("/transformations", get(list_transformations_handler))
        .route(
            "/transformations/{id}",
            get(get_transformation_handler)
                .patch(update_transformation_handler)
                .delete(delete_transformation_handler),
        );

    Router::new().nest("/api", api_routes).with_state(app_state)
}
