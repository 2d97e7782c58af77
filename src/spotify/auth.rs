use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    types::{AuthErrorResponse, Token},
};

/// The OAuth 2.0 authorization code flow against the Spotify accounts
/// service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthSession: Send + Sync {
    /// URL the user is redirected to in order to grant access.
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<Url>;

    /// Exchanges an authorization code for a token.
    ///
    /// A code rejected by the accounts service yields [`Error::Auth`] with the
    /// service's description of the problem.
    async fn request_access_token(&self, code: &str, code_verifier: &str) -> Result<Token>;
}

/// [`AuthSession`] over HTTP.
///
/// Uses PKCE (S256). When a client secret is configured it is sent as HTTP
/// basic authentication on the token exchange as well.
#[derive(Debug, Clone)]
pub struct OAuthSession {
    client: Client,
    client_id: String,
    client_secret: Option<String>,
    redirect_uri: String,
    scopes: Vec<String>,
    auth_url: String,
    token_url: String,
}

impl OAuthSession {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: Client::new(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            scopes: config.scopes.clone(),
            auth_url: config.auth_url.clone(),
            token_url: config.token_url.clone(),
        }
    }
}

#[async_trait]
impl AuthSession for OAuthSession {
    fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<Url> {
        let scope = self.scopes.join(" ");
        Url::parse_with_params(
            &self.auth_url,
            &[
                ("client_id", self.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", scope.as_str()),
                ("state", state),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
            ],
        )
        .map_err(|e| Error::Config(format!("SPOTIFY_API_AUTH_URL: {}", e)))
    }

    async fn request_access_token(&self, code: &str, code_verifier: &str) -> Result<Token> {
        let mut request = self.client.post(&self.token_url).form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("code_verifier", code_verifier),
        ]);

        if let Some(secret) = &self.client_secret {
            request = request.basic_auth(&self.client_id, Some(secret));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<AuthErrorResponse>(&body) {
                Ok(e) => e.error_description.unwrap_or(e.error),
                Err(_) if body.is_empty() => format!("Token request failed with {}", status),
                Err(_) => body,
            };
            return Err(Error::Auth(message));
        }

        Ok(response.json::<Token>().await?)
    }
}
