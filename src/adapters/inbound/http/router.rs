use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{
    handlers::{delete_object, download_object, list_objects, preview_object, upload_object},
    views::Views,
};
use crate::ports::services::GalleryService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub gallery: Arc<dyn GalleryService>,
    pub views: Arc<Views>,
}

/// Create the gallery router
///
/// `max_upload_bytes` bounds the request body accepted by `/upload`.
pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(list_objects))
        .route("/upload", post(upload_object))
        .route("/delete", post(delete_object))
        .route("/download/{object_name}", get(download_object))
        .route("/preview/{object_name}", get(preview_object))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
