use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::server::Json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error(transparent)]
    Core(#[from] testpilot_core::Error),
    #[error(transparent)]
    Template(#[from] askama::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        let (status, message) = match self {
            // Bad request body: reported before any upstream call happens.
            Error::Json(err) => (err.status(), err.body_text()),
            Error::Core(err) => {
                tracing::error!(%err, "upstream completion call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "completion service unavailable".to_string(),
                )
            }
            Error::Template(err) => {
                tracing::error!(%err, "template render failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "something went wrong".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
