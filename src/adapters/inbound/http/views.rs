//! HTML rendering for the gallery pages
//!
//! Templates are compiled into the binary and registered once at startup.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use tera::{Context, Tera};
use tracing::error;

use crate::domain::{models::ListingEntry, value_objects::BucketName};

const BASE_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/base.html"
));
const INDEX_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/index.html"
));
const ERROR_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/error.html"
));

/// Template renderer for the index and error views
pub struct Views {
    tera: Tera,
}

impl Views {
    /// Register the built-in templates
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("index.html", INDEX_TEMPLATE),
            ("error.html", ERROR_TEMPLATE),
        ])?;

        Ok(Self { tera })
    }

    /// The bucket listing page
    pub fn index(&self, bucket: &BucketName, objects: &[ListingEntry]) -> Response {
        let mut context = Context::new();
        context.insert("bucket", bucket.as_str());
        context.insert("objects", objects);

        self.render(StatusCode::OK, "index.html", &context)
    }

    /// The error page, sent with `status`
    pub fn error(&self, status: StatusCode, message: &str) -> Response {
        let mut context = Context::new();
        context.insert("status", &status.as_u16());
        context.insert("message", message);

        self.render(status, "error.html", &context)
    }

    fn render(&self, status: StatusCode, template: &str, context: &Context) -> Response {
        match self.tera.render(template, context) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!(template, error = ?e, "failed to render template");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}
