use std::sync::Arc;

use axum::{
    extract::State,
    response::{Html, IntoResponse, Response},
};

use crate::{api::access_token, error::Result, server::AppState, views};

pub async fn home(State(state): State<Arc<AppState>>) -> Result<Response> {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(redirect) => return Ok(redirect),
    };

    let user = state.api.current_user(&token).await?;

    Ok(Html(views::home(&user)).into_response())
}
