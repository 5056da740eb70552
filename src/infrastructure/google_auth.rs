use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use oauth2::basic::BasicClient;
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge, RedirectUrl,
    Scope, TokenResponse, TokenUrl,
};
use serde::Deserialize;
use tiny_http::{Header, Request, Response, Server};

use crate::services::error::MigrationError;

pub const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube";

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const SUCCESS_PAGE: &str = "<html><body><h1>Authentication complete</h1>\
<p>You can close this window and return to the terminal.</p></body></html>";

/// `client_secret.json` as downloaded from the Google Cloud console.
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: InstalledClient,
}

#[derive(Debug, Deserialize)]
struct InstalledClient {
    client_id: String,
    client_secret: String,
    #[serde(default = "default_auth_uri")]
    auth_uri: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn auth_err(context: &str) -> impl FnOnce(String) -> MigrationError + '_ {
    move |detail| MigrationError::AuthFlow(format!("{context}: {detail}"))
}

/// Desktop OAuth flow that catches the redirect on a loopback port.
pub struct InstalledAppFlow {
    client: InstalledClient,
    scopes: Vec<String>,
}

impl InstalledAppFlow {
    pub fn from_client_secrets_file(
        path: impl AsRef<Path>,
        scopes: &[&str],
    ) -> Result<Self, MigrationError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| auth_err("Cannot read client secret file")(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw, scopes)
    }

    fn from_json(raw: &str, scopes: &[&str]) -> Result<Self, MigrationError> {
        let secrets: ClientSecretFile = serde_json::from_str(raw)
            .map_err(|e| auth_err("Malformed client secret file")(e.to_string()))?;
        Ok(Self {
            client: secrets.installed,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Runs the consent flow and returns an access token for the YouTube API.
    pub async fn run_local_server(&self) -> Result<String, MigrationError> {
        let server = Server::http("127.0.0.1:0")
            .map_err(|e| auth_err("Cannot bind loopback listener")(e.to_string()))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| MigrationError::AuthFlow("Loopback listener has no port".to_string()))?;
        let redirect = loopback_redirect(port);

        let client = BasicClient::new(
            ClientId::new(self.client.client_id.clone()),
            Some(ClientSecret::new(self.client.client_secret.clone())),
            AuthUrl::new(self.client.auth_uri.clone())
                .map_err(|e| auth_err("Invalid auth_uri")(e.to_string()))?,
            Some(
                TokenUrl::new(self.client.token_uri.clone())
                    .map_err(|e| auth_err("Invalid token_uri")(e.to_string()))?,
            ),
        )
        .set_redirect_uri(
            RedirectUrl::new(redirect).map_err(|e| auth_err("Invalid redirect")(e.to_string()))?,
        );

        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
        let (auth_url, csrf_token) = client
            .authorize_url(CsrfToken::new_random)
            .add_scopes(self.scopes.iter().cloned().map(Scope::new))
            .set_pkce_challenge(pkce_challenge)
            .url();

        tracing::info!("Please visit this URL to authorize this application: {auth_url}");
        if webbrowser::open(auth_url.as_str()).is_err() {
            tracing::warn!("Failed to open browser automatically");
        }

        let (code, state) = tokio::task::spawn_blocking(move || wait_for_callback(&server))
            .await
            .map_err(|e| auth_err("Callback listener stopped")(e.to_string()))??;

        if state != *csrf_token.secret() {
            return Err(MigrationError::AuthFlow(
                "State mismatch in authorization response".to_string(),
            ));
        }

        let token = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| auth_err("Token exchange failed")(e.to_string()))?;

        tracing::info!("Authenticated with YouTube");
        Ok(token.access_token().secret().to_string())
    }
}

fn wait_for_callback(server: &Server) -> Result<(String, String), MigrationError> {
    let start = std::time::Instant::now();
    while start.elapsed() < CALLBACK_TIMEOUT {
        let request = match server.recv_timeout(POLL_INTERVAL) {
            Ok(Some(request)) => request,
            Ok(None) => continue,
            Err(e) => return Err(auth_err("Callback listener failed")(e.to_string())),
        };

        let callback = parse_callback(request.url());
        match callback {
            Some(Ok(pair)) => {
                let response = Response::from_string(SUCCESS_PAGE);
                let response = match Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]) {
                    Ok(header) => response.with_header(header),
                    Err(()) => response,
                };
                respond(request, response);
                return Ok(pair);
            }
            Some(Err(error)) => {
                respond(
                    request,
                    Response::from_string("Authorization denied").with_status_code(400),
                );
                return Err(MigrationError::AuthFlow(format!("Authorization denied: {error}")));
            }
            None => {
                respond(request, Response::from_string("Not Found").with_status_code(404));
            }
        }
    }
    Err(MigrationError::AuthFlow(
        "Timed out waiting for authorization".to_string(),
    ))
}

/// Redirect target matching the bound listener address, not `localhost`.
fn loopback_redirect(port: u16) -> String {
    format!("http://127.0.0.1:{port}/")
}

fn respond(request: Request, response: Response<Cursor<Vec<u8>>>) {
    if let Err(e) = request.respond(response) {
        tracing::debug!("Failed to answer authorization callback: {e}");
    }
}

/// Extracts `(code, state)` from a redirect path, or the provider's `error`.
fn parse_callback(path: &str) -> Option<Result<(String, String), String>> {
    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    let mut code = None;
    let mut state = String::new();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = value.into_owned(),
            "error" => return Some(Err(value.into_owned())),
            _ => {}
        }
    }
    code.map(|code| Ok((code, state)))
}
