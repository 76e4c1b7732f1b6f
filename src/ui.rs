use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

const INDEX_PAGE: &str = "index.html";

/// GET / - static landing page
pub async fn landing_page() -> Response {
    match StaticAssets::get(INDEX_PAGE) {
        Some(content) => {
            let mime = mime_guess::from_path(INDEX_PAGE).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}
