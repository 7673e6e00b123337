use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::views::Views;
use crate::domain::errors::GalleryError;

/// Status code a gallery error is answered with
pub fn status_for(err: &GalleryError) -> StatusCode {
    match err {
        GalleryError::MissingFile
        | GalleryError::MissingObjectName
        | GalleryError::InvalidKey(_)
        | GalleryError::NotAnImage { .. } => StatusCode::BAD_REQUEST,
        GalleryError::ImageNotFound => StatusCode::NOT_FOUND,
        GalleryError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Turn a gallery error into a response
///
/// Preview failures are answered in plain text since the caller is an
/// `<img>` tag; everything else gets the error page.
pub fn error_response(views: &Views, err: GalleryError) -> Response {
    let status = status_for(&err);
    match err {
        GalleryError::ImageNotFound | GalleryError::NotAnImage { .. } => {
            (status, err.to_string()).into_response()
        }
        err => views.error(status, &err.to_string()),
    }
}

/// A multipart body that could not be read, e.g. over the upload limit
pub fn multipart_error_response(err: MultipartError) -> Response {
    warn!(error = %err, "rejected upload body");
    (err.status(), err.body_text()).into_response()
}
