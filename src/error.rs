use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Errors produced while talking to Spotify or serving requests.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to send http request: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Spotify API responded with {status}: {message}")]
    Api { status: u16, message: String },

    /// The token endpoint rejected an authorization code.
    #[error("{0}")]
    Auth(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse response: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

// Anything that reaches axum unhandled is a server error.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Something went wrong".to_string(),
        )
            .into_response()
    }
}
