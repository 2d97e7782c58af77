use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{error::Error, error::Result, server::AppState};

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, message.into()).into_response()
}

pub async fn callback(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CallbackParams>,
) -> Result<Response> {
    // the user declined access
    if let Some(error) = params.error {
        tracing::warn!(%error, "authorization denied");
        return Ok(bad_request(error));
    }

    let Some(code) = params.code else {
        return Ok(bad_request("Missing authorization code."));
    };

    // a callback with the wrong state leaves the pending authorization intact
    let pending = {
        let mut slot = state.pending_auth.lock().await;
        match slot.take_if(|pending| params.state.as_deref() == Some(pending.state.as_str())) {
            Some(pending) => pending,
            None if slot.is_some() => {
                tracing::warn!("authorization state mismatch");
                return Ok(bad_request("Authorization state mismatch."));
            }
            None => return Ok(bad_request("No authorization in progress.")),
        }
    };

    let token = match state
        .auth
        .request_access_token(&code, &pending.code_verifier)
        .await
    {
        Ok(token) => token,
        Err(Error::Auth(message)) => {
            tracing::warn!(%message, "token exchange failed");
            return Ok(bad_request(message));
        }
        Err(e) => return Err(e),
    };

    state
        .cache
        .store_access_token(token.access_token, state.config.token_ttl)
        .await;
    tracing::info!(scope = %token.scope, "access token cached");

    Ok(Redirect::to("/").into_response())
}
