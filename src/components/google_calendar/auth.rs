use super::client::{CalendarApi, GoogleCalendarClient};
use super::directory::Authenticator;
use super::token::{Token, TokenManager, TokenResponse};
use crate::config::Config;
use crate::error::{auth_error, AppResult, Error};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

/// Full read/write access to the user's calendars
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// OAuth client identity from a Google `credentials.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplicationSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct CredentialsFile {
    installed: Option<ApplicationSecret>,
    web: Option<ApplicationSecret>,
}

/// Parse the contents of a Google client secrets file
pub fn parse_application_secret(content: &str) -> AppResult<ApplicationSecret> {
    let file: CredentialsFile = serde_json::from_str(content)
        .map_err(|e| auth_error(&format!("Malformed client secrets: {}", e)))?;

    file.installed.or(file.web).ok_or_else(|| {
        auth_error("Client secrets contain neither an 'installed' nor a 'web' client")
    })
}

/// Read the Google client secrets file at `path`
pub fn read_application_secret(path: &Path) -> AppResult<ApplicationSecret> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;
    parse_application_secret(&content)
}

/// Query parameters Google appends to the loopback redirect
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Extract redirect parameters from a request path; `None` for unrelated requests
pub fn parse_callback(request_path: &str) -> Option<CallbackParams> {
    let url = Url::parse("http://127.0.0.1")
        .and_then(|base| base.join(request_path))
        .ok()?;

    let mut params = CallbackParams::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => params.code = Some(value.into_owned()),
            "state" => params.state = Some(value.into_owned()),
            "error" => params.error = Some(value.into_owned()),
            _ => {}
        }
    }

    if params.code.is_none() && params.error.is_none() {
        return None;
    }
    Some(params)
}

/// Check the redirect against the expected state and return the authorization code
pub fn authorization_code(params: CallbackParams, expected_state: &str) -> AppResult<String> {
    if let Some(error) = params.error {
        return Err(auth_error(&format!("Authorization was denied: {}", error)));
    }

    if params.state.as_deref() != Some(expected_state) {
        return Err(auth_error("State mismatch in authorization callback"));
    }

    params
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| auth_error("No authorization code found in callback"))
}

/// Installed-app OAuth flow with a loopback redirect listener
pub struct InstalledFlow {
    secret: ApplicationSecret,
    client: Client,
    redirect_port: u16,
    open_browser: bool,
}

impl InstalledFlow {
    pub fn new(secret: ApplicationSecret, redirect_port: u16, open_browser: bool) -> Self {
        Self {
            secret,
            client: Client::new(),
            redirect_port,
            open_browser,
        }
    }

    /// Consent page URL for the given redirect URI and state
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> AppResult<Url> {
        Url::parse_with_params(
            &self.secret.auth_uri,
            &[
                ("client_id", self.secret.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", CALENDAR_SCOPE),
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("state", state),
            ],
        )
        .map_err(|e| auth_error(&format!("Invalid auth URI '{}': {}", self.secret.auth_uri, e)))
    }

    /// Run the interactive flow and exchange the code for a token
    pub async fn run(&self) -> AppResult<Token> {
        let server = tiny_http::Server::http(("127.0.0.1", self.redirect_port))
            .map_err(|e| auth_error(&format!("Failed to start redirect listener: {}", e)))?;
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .ok_or_else(|| auth_error("Redirect listener has no IP address"))?;
        let redirect_uri = format!("http://127.0.0.1:{}/", port);

        // Must be echoed back unchanged by the redirect
        let state = uuid::Uuid::new_v4().to_string();
        let auth_url = self.authorization_url(&redirect_uri, &state)?;

        eprintln!(
            "Please visit this URL to authorize this application:\n{}",
            auth_url
        );
        if self.open_browser {
            if let Err(e) = webbrowser::open(auth_url.as_str()) {
                warn!("Could not open a browser: {}", e);
            }
        }

        info!("Waiting for authorization callback on port {}", port);
        let params = tokio::task::spawn_blocking(move || wait_for_callback(server))
            .await
            .map_err(|e| auth_error(&format!("Redirect listener failed: {}", e)))??;

        let code = authorization_code(params, &state)?;
        self.exchange_code(&code, &redirect_uri).await
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> AppResult<Token> {
        let response = self
            .request_token(&[
                ("client_id", self.secret.client_id.as_str()),
                ("client_secret", self.secret.client_secret.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .await?;

        info!("Authorization successful");
        Ok(Token::from_response(response, Utc::now().timestamp()))
    }

    /// Exchange the token's refresh token for a new access token
    pub async fn refresh(&self, token: &Token) -> AppResult<Token> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| auth_error("No refresh token in token data"))?;

        let response = self
            .request_token(&[
                ("client_id", self.secret.client_id.as_str()),
                ("client_secret", self.secret.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .await?;

        // Refresh responses usually omit the refresh token, keep the old one
        let mut refreshed = Token::from_response(response, Utc::now().timestamp());
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token.to_string());
        }
        debug!("Refreshed access token");
        Ok(refreshed)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> AppResult<TokenResponse> {
        let response = self
            .client
            .post(&self.secret.token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| auth_error(&format!("Failed to reach token endpoint: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(auth_error(&format!(
                "Failed to get token: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| auth_error(&format!("Failed to parse token response: {}", e)))
    }
}

/// Block until the browser hits the redirect URI with a code or an error
fn wait_for_callback(server: tiny_http::Server) -> AppResult<CallbackParams> {
    loop {
        let request = server.recv()?;

        match parse_callback(request.url()) {
            Some(params) => {
                let message = if params.error.is_some() {
                    "Authorization failed. You can close this window."
                } else {
                    "Authorization successful! You can close this window."
                };
                if let Err(e) = request.respond(tiny_http::Response::from_string(message)) {
                    warn!("Failed to answer authorization callback: {}", e);
                }
                return Ok(params);
            }
            None => {
                debug!("Ignoring unrelated request to {}", request.url());
                let not_found = tiny_http::Response::empty(tiny_http::StatusCode(404));
                if let Err(e) = request.respond(not_found) {
                    warn!("Failed to answer unrelated request: {}", e);
                }
            }
        }
    }
}

/// Authenticates against Google with the installed-app flow and an optional token cache
pub struct GoogleAuthenticator {
    config: Config,
}

impl GoogleAuthenticator {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    async fn obtain_token(&self, flow: &InstalledFlow) -> AppResult<Token> {
        let Some(cache_path) = &self.config.token_cache_path else {
            return flow.run().await;
        };

        let manager = TokenManager::new(cache_path);
        let token = match manager.load() {
            Some(token) if !token.is_expired() => {
                info!("Using cached token from {}", manager.path().display());
                return Ok(token);
            }
            Some(token) if token.refresh_token.is_some() => match flow.refresh(&token).await {
                Ok(refreshed) => refreshed,
                Err(e) => {
                    warn!("Token refresh failed, starting a new authorization: {}", e);
                    flow.run().await?
                }
            },
            _ => flow.run().await?,
        };

        manager.store(&token)?;
        Ok(token)
    }
}

#[async_trait]
impl Authenticator for GoogleAuthenticator {
    async fn authenticate(&self) -> AppResult<Box<dyn CalendarApi>> {
        let secret = read_application_secret(&self.config.credentials_path)?;
        let flow = InstalledFlow::new(secret, self.config.redirect_port, self.config.open_browser);

        let token = self.obtain_token(&flow).await?;
        let client = GoogleCalendarClient::new(&self.config.api_base_url, token.access_token)?;

        Ok(Box::new(client))
    }
}
