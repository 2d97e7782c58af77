use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use sportop::{
    Error,
    config::Config,
    spotify::{
        SpotifyApi, WebApi,
        auth::{AuthSession, OAuthSession},
    },
    types::{CreatePlaylistRequest, TimeRange},
};

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    uri: String,
    authorization: Option<String>,
    body: String,
}

type Log = Arc<Mutex<Vec<Recorded>>>;

fn record(log: &Log, method: Method, uri: &Uri, headers: &HeaderMap, body: String) {
    log.lock().unwrap().push(Recorded {
        method,
        uri: uri.to_string(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
}

fn recorded(log: &Log) -> Vec<Recorded> {
    log.lock().unwrap().clone()
}

/// Serves `app` on an ephemeral local port and returns its base URL.
async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn track_json(id: &str) -> Value {
    json!({
        "id": id,
        "name": format!("Song {}", id),
        "uri": format!("spotify:track:{}", id),
        "artists": [{ "id": "a1", "name": "Some Artist" }],
        "duration_ms": 180000
    })
}

async fn playlists_page(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    record(&log, method, &uri, &headers, String::new());
    Json(json!({
        "items": [
            null,
            { "id": "p1", "name": "TOP30", "owner": { "id": "u1", "display_name": null } }
        ],
        "next": null,
        "total": 2,
        "limit": 50,
        "offset": 100
    }))
}

async fn top_tracks(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    record(&log, method, &uri, &headers, String::new());
    Json(json!({ "items": [track_json("t2"), track_json("t1")], "next": null, "total": 2 }))
}

async fn expired_token() -> impl IntoResponse {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": { "status": 401, "message": "The access token expired" } })),
    )
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn playlist_tracks(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let snapshot = format!("snapshot-{}", method);
    record(&log, method, &uri, &headers, body);
    Json(json!({ "snapshot_id": snapshot }))
}

async fn create_playlist(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let request: Value = serde_json::from_str(&body).unwrap();
    record(&log, method, &uri, &headers, body);
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "new-id",
            "name": request["name"],
            "public": false,
            "owner": { "id": "u1", "display_name": null }
        })),
    )
}

async fn web_api() -> (WebApi, Log) {
    let log = Log::default();
    let app = Router::new()
        .route("/me", get(expired_token))
        .route("/me/playlists", get(playlists_page))
        .route("/me/top/tracks", get(top_tracks))
        .route("/users/{user_id}/playlists", post(create_playlist))
        .route(
            "/playlists/{playlist_id}/tracks",
            put(playlist_tracks).post(playlist_tracks),
        )
        .route("/playlists/{playlist_id}", get(not_found))
        .with_state(Arc::clone(&log));

    (WebApi::new(spawn(app).await), log)
}

fn uris(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("spotify:track:t{}", i)).collect()
}

fn body_uris(recorded: &Recorded) -> Vec<String> {
    let body: Value = serde_json::from_str(&recorded.body).unwrap();
    serde_json::from_value(body["uris"].clone()).unwrap()
}

#[tokio::test]
async fn test_playlists_page_query_and_null_items() {
    let (api, log) = web_api().await;

    let page = api.current_user_playlists("tok", 50, 100).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, "p1");

    let calls = recorded(&log);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].uri, "/me/playlists?limit=50&offset=100");
    assert_eq!(calls[0].authorization.as_deref(), Some("Bearer tok"));
}

#[tokio::test]
async fn test_top_tracks_query_and_order() {
    let (api, log) = web_api().await;

    let tracks = api.top_tracks("tok", 80, TimeRange::Medium).await.unwrap();

    let ids: Vec<_> = tracks.iter().filter_map(|t| t.id.as_deref()).collect();
    assert_eq!(ids, vec!["t2", "t1"]);
    assert_eq!(
        recorded(&log)[0].uri,
        "/me/top/tracks?limit=50&time_range=medium_term"
    );
}

#[tokio::test]
async fn test_error_responses_become_api_errors() {
    let (api, _) = web_api().await;

    match api.current_user("stale").await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "The access token expired");
        }
        other => panic!("unexpected result: {:?}", other),
    }

    match api.playlist("tok", "gone").await {
        Err(Error::Api { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "Not Found");
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_create_playlist_posts_request() {
    let (api, log) = web_api().await;
    let request = CreatePlaylistRequest {
        name: "TOP30".to_string(),
        description: "Top 30 tracks".to_string(),
        public: false,
    };

    let created = api.create_playlist("tok", "u1", &request).await.unwrap();
    assert_eq!(created.id, "new-id");
    assert_eq!(created.name, "TOP30");

    let calls = recorded(&log);
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].uri, "/users/u1/playlists");
    let body: Value = serde_json::from_str(&calls[0].body).unwrap();
    assert_eq!(body["name"], "TOP30");
    assert_eq!(body["public"], false);
}

#[tokio::test]
async fn test_replace_tracks_single_request() {
    let (api, log) = web_api().await;

    let snapshot = api
        .replace_playlist_tracks("tok", "p1", &uris(30))
        .await
        .unwrap();
    assert_eq!(snapshot, "snapshot-PUT");

    let calls = recorded(&log);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::PUT);
    assert_eq!(calls[0].uri, "/playlists/p1/tracks");
    assert_eq!(body_uris(&calls[0]), uris(30));
}

#[tokio::test]
async fn test_replace_tracks_appends_beyond_first_hundred() {
    let (api, log) = web_api().await;
    let all = uris(130);

    let snapshot = api.replace_playlist_tracks("tok", "p1", &all).await.unwrap();
    assert_eq!(snapshot, "snapshot-POST");

    let calls = recorded(&log);
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].method, Method::PUT);
    assert_eq!(body_uris(&calls[0]), all[..100].to_vec());
    assert_eq!(calls[1].method, Method::POST);
    assert_eq!(body_uris(&calls[1]), all[100..].to_vec());
}

async fn token_endpoint(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let code = url::form_urlencoded::parse(body.as_bytes())
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned());
    record(&log, method, &uri, &headers, body);

    if code.as_deref() == Some("good-code") {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": "fresh-token",
                "token_type": "Bearer",
                "scope": "user-top-read",
                "expires_in": 3600
            })),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid authorization code"
            })),
        )
    }
}

async fn oauth_session(client_secret: Option<&str>) -> (OAuthSession, Log) {
    let log = Log::default();
    let app = Router::new()
        .route("/api/token", post(token_endpoint))
        .with_state(Arc::clone(&log));
    let token_url = format!("{}/api/token", spawn(app).await);
    let client_secret = client_secret.map(str::to_string);

    let config = Config::from_lookup(|key| match key {
        "SPOTIFY_API_AUTH_CLIENT_ID" => Some("test-client".to_string()),
        "SPOTIFY_API_AUTH_CLIENT_SECRET" => client_secret.clone(),
        "SPOTIFY_API_TOKEN_URL" => Some(token_url.clone()),
        _ => None,
    })
    .unwrap();

    (OAuthSession::from_config(&config), log)
}

#[tokio::test]
async fn test_token_exchange_sends_pkce_form() {
    let (session, log) = oauth_session(None).await;

    let token = session
        .request_access_token("good-code", "the-verifier")
        .await
        .unwrap();
    assert_eq!(token.access_token, "fresh-token");
    assert_eq!(token.refresh_token, None);

    let calls = recorded(&log);
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].authorization, None);

    let form: HashMap<String, String> = url::form_urlencoded::parse(calls[0].body.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(form["grant_type"], "authorization_code");
    assert_eq!(form["code"], "good-code");
    assert_eq!(form["code_verifier"], "the-verifier");
    assert_eq!(form["client_id"], "test-client");
    assert_eq!(form["redirect_uri"], "http://127.0.0.1:8000/callback");
}

#[tokio::test]
async fn test_token_exchange_uses_basic_auth_with_secret() {
    let (session, log) = oauth_session(Some("shh")).await;

    session
        .request_access_token("good-code", "the-verifier")
        .await
        .unwrap();

    let expected = format!("Basic {}", STANDARD.encode("test-client:shh"));
    assert_eq!(recorded(&log)[0].authorization, Some(expected));
}

#[tokio::test]
async fn test_rejected_code_is_auth_error_with_description() {
    let (session, _) = oauth_session(None).await;

    match session.request_access_token("stale-code", "the-verifier").await {
        Err(Error::Auth(message)) => assert_eq!(message, "Invalid authorization code"),
        other => panic!("unexpected result: {:?}", other),
    }
}
