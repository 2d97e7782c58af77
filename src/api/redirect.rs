use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::{error::Result, server::AppState, types::PendingAuth, utils};

/// Sends the user to the Spotify consent page.
///
/// A fresh PKCE verifier and state value are remembered for the callback.
/// Starting a new authorization replaces any unfinished one.
pub async fn redirect(State(state): State<Arc<AppState>>) -> Result<Response> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let csrf_state = utils::generate_state();

    let url = state.auth.authorize_url(&csrf_state, &code_challenge)?;

    *state.pending_auth.lock().await = Some(PendingAuth {
        code_verifier,
        state: csrf_state,
    });

    Ok(Redirect::to(url.as_str()).into_response())
}
