use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    api::access_token,
    error::Result,
    management::PlaylistSync,
    server::AppState,
    types::PlaylistForm,
    views,
};

fn default_form(state: &AppState) -> PlaylistForm {
    let settings = &state.config.playlist;
    PlaylistForm {
        name: String::new(),
        limit: settings.limit.to_string(),
        range: settings.time_range.to_string(),
    }
}

pub async fn create_playlist_form(State(state): State<Arc<AppState>>) -> Result<Response> {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(redirect) => return Ok(redirect),
    };

    let user = state.api.current_user(&token).await?;
    let form = default_form(&state);

    Ok(Html(views::playlist_form(&user, &form, &[])).into_response())
}

pub async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PlaylistForm>,
) -> Result<Response> {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(redirect) => return Ok(redirect),
    };

    let user = state.api.current_user(&token).await?;

    let request = match form.validate() {
        Ok(request) => request,
        Err(errors) => {
            return Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                Html(views::playlist_form(&user, &form, &errors)),
            )
                .into_response());
        }
    };

    let playlist = PlaylistSync::new(state.api.as_ref(), &state.config.playlist)
        .generate(&token, &user.id, &request)
        .await?;

    Ok(Html(views::playlist(&playlist)).into_response())
}

/// Shows the marker playlist, creating it first if the user has none.
pub async fn update_playlist(State(state): State<Arc<AppState>>) -> Result<Response> {
    let token = match access_token(&state).await {
        Ok(token) => token,
        Err(redirect) => return Ok(redirect),
    };

    let user = state.api.current_user(&token).await?;
    let playlist = PlaylistSync::new(state.api.as_ref(), &state.config.playlist)
        .reconcile(&token, &user.id)
        .await?;

    Ok(Html(views::playlist(&playlist)).into_response())
}
