use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

mod common;
mod og;

pub fn build_router() -> Router<AppState> {
    Router::new().route("/og.png", get(og::get_og)).route("/healthz", get(common::healthz))
}

/// Terminal outcomes of the OG endpoint. The status codes and bodies are
/// part of the public contract; render detail is logged server-side only.
pub enum OgError {
    MissingId,
    NotFound,
    Render(anyhow::Error),
}

impl IntoResponse for OgError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingId => (StatusCode::BAD_REQUEST, "Article ID is required").into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, "Article not found").into_response(),
            Self::Render(err) => {
                tracing::error!("Failed to generate OG image: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate image").into_response()
            }
        }
    }
}

impl From<anyhow::Error> for OgError {
    fn from(err: anyhow::Error) -> Self { Self::Render(err) }
}
