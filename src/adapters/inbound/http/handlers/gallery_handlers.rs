//! HTTP handlers for the gallery pages.
//! Object bodies are streamed straight from the store to the client; only
//! uploads are buffered, bounded by the router's body limit.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, rejection::FormRejection, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::debug;

use crate::{
    adapters::inbound::http::{
        error::{error_response, multipart_error_response},
        router::AppState,
    },
    domain::{
        errors::GalleryError,
        models::{ObjectDownload, UploadRequest, DEFAULT_CONTENT_TYPE},
    },
};

/// Form posted by the delete button
#[derive(Debug, Deserialize)]
pub struct DeleteObjectForm {
    #[serde(rename = "objectName")]
    pub object_name: Option<String>,
}

/// GET `/`: render the bucket listing
pub async fn list_objects(State(state): State<AppState>) -> Response {
    match state.gallery.list_objects().await {
        Ok(objects) => state.views.index(state.gallery.bucket(), &objects),
        Err(e) => error_response(&state.views, e),
    }
}

/// POST `/upload`: store the `file` part under a timestamped key
pub async fn upload_object(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let upload = match read_file_part(&mut multipart).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return error_response(&state.views, GalleryError::MissingFile),
        Err(e) => return multipart_error_response(e),
    };

    match state.gallery.upload_object(upload).await {
        Ok(_) => redirect_home(),
        Err(e) => error_response(&state.views, e),
    }
}

/// POST `/delete`: remove the object named by `objectName`
///
/// A body that is not a urlencoded form carries no name at all.
pub async fn delete_object(
    State(state): State<AppState>,
    form: Result<Form<DeleteObjectForm>, FormRejection>,
) -> Response {
    let object_name = match form {
        Ok(Form(form)) => form.object_name.unwrap_or_default(),
        Err(rejection) => {
            debug!(error = %rejection, "delete request without form body");
            String::new()
        }
    };

    match state.gallery.delete_object(&object_name).await {
        Ok(()) => redirect_home(),
        Err(e) => error_response(&state.views, e),
    }
}

/// GET `/download/{object_name}`: stream the object as an attachment
pub async fn download_object(
    State(state): State<AppState>,
    Path(object_name): Path<String>,
) -> Response {
    match state.gallery.download_object(&object_name).await {
        Ok(download) => {
            let mut response = stream_object(download);
            response.headers_mut().insert(
                header::CONTENT_DISPOSITION,
                attachment_disposition(&object_name),
            );
            response
        }
        Err(e) => error_response(&state.views, e),
    }
}

/// GET `/preview/{object_name}`: stream an image inline
pub async fn preview_object(
    State(state): State<AppState>,
    Path(object_name): Path<String>,
) -> Response {
    match state.gallery.preview_object(&object_name).await {
        Ok(preview) => stream_object(preview),
        Err(e) => error_response(&state.views, e),
    }
}

/// Pull the first named `file` part out of the form.
async fn read_file_part(
    multipart: &mut Multipart,
) -> Result<Option<UploadRequest>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        // Browsers send an empty filename when nothing was chosen
        let Some(file_name) = field
            .file_name()
            .filter(|n| !n.is_empty())
            .map(str::to_string)
        else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await?;

        return Ok(Some(UploadRequest {
            file_name,
            content_type,
            data,
        }));
    }

    Ok(None)
}

fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// Build a 200 response whose body is the object stream.
///
/// The store stream lives inside the body; it is dropped, and its
/// connection released, once the body finishes, fails or the client goes away.
fn stream_object(download: ObjectDownload) -> Response {
    let content_type = HeaderValue::from_str(download.stat.content_type())
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, content_type);

    (StatusCode::OK, headers, Body::from_stream(download.body)).into_response()
}

/// `attachment; filename="<name>"`, with an RFC 5987 `filename*` when the
/// name is not plain ASCII.
fn attachment_disposition(object_name: &str) -> HeaderValue {
    let escaped = object_name.replace('\\', "\\\\").replace('"', "\\\"");
    let plain = format!("attachment; filename=\"{}\"", escaped);

    if let Ok(value) = HeaderValue::from_str(&plain) {
        if object_name.is_ascii() {
            return value;
        }
    }

    let fallback: String = escaped
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '_' })
        .collect();
    let extended = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(object_name)
    );

    HeaderValue::from_str(&extended).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}
