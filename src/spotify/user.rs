use reqwest::Client;

use crate::{error::Result, spotify::read_json, types::User};

/// Fetches the profile of the user the token belongs to.
pub async fn current_user(client: &Client, base_url: &str, token: &str) -> Result<User> {
    let api_url = format!("{uri}/me", uri = base_url);
    let response = client.get(&api_url).bearer_auth(token).send().await?;

    read_json::<User>(response).await
}
