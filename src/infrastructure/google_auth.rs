use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::services::error::AuthError;

const YOUTUBE_SCOPE: &str = "https://www.googleapis.com/auth/youtube.force-ssl";
/// Tokens this close to expiry are refreshed up front.
const EXPIRY_MARGIN_SECS: u64 = 60;
const REDIRECT_READ_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct ClientSecretsFile {
    #[serde(alias = "web")]
    installed: InstalledApp,
}

#[derive(Debug, Clone, Deserialize)]
struct InstalledApp {
    client_id: String,
    client_secret: String,
    auth_uri: String,
    token_uri: String,
}

/// Credentials persisted between runs in the token file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp, seconds.
    #[serde(default)]
    pub expires_at: Option<u64>,
}

impl StoredToken {
    fn is_fresh(&self, now: u64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at > now + EXPIRY_MARGIN_SECS)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl TokenResponse {
    fn into_stored(self, previous_refresh_token: Option<String>) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh_token),
            expires_at: self.expires_in.map(|secs| unix_now() + secs),
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Produces a YouTube bearer token: reuses the token file, refreshes it, or
/// walks the user through the installed-app consent flow.
pub struct GoogleAuthenticator {
    http: Client,
    secrets_path: PathBuf,
    token_path: PathBuf,
}

impl GoogleAuthenticator {
    pub fn new(
        http: Client,
        secrets_path: impl Into<PathBuf>,
        token_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            http,
            secrets_path: secrets_path.into(),
            token_path: token_path.into(),
        }
    }

    pub async fn access_token(&self) -> Result<String, AuthError> {
        let stored = load_token(&self.token_path);
        if let Some(token) = stored.as_ref().filter(|t| t.is_fresh(unix_now())) {
            tracing::info!("Loaded stored YouTube credentials");
            return Ok(token.access_token.clone());
        }

        let app = self.load_secrets()?;
        let token = match stored.and_then(|t| t.refresh_token) {
            Some(refresh_token) => self.refresh(&app, refresh_token).await?,
            None => self.authorize(&app).await?,
        };

        self.save_token(&token);
        Ok(token.access_token)
    }

    fn load_secrets(&self) -> Result<InstalledApp, AuthError> {
        let contents =
            std::fs::read_to_string(&self.secrets_path).map_err(|source| AuthError::ClientSecrets {
                path: self.secrets_path.display().to_string(),
                source,
            })?;
        let secrets: ClientSecretsFile = serde_json::from_str(&contents)?;
        Ok(secrets.installed)
    }

    fn save_token(&self, token: &StoredToken) {
        let result = serde_json::to_string_pretty(token)
            .map_err(std::io::Error::from)
            .and_then(|json| std::fs::write(&self.token_path, json));
        match result {
            Ok(()) => tracing::info!("Saved YouTube credentials to {}", self.token_path.display()),
            Err(e) => tracing::error!(
                "Failed to save YouTube credentials to {}: {e}",
                self.token_path.display()
            ),
        }
    }

    async fn refresh(
        &self,
        app: &InstalledApp,
        refresh_token: String,
    ) -> Result<StoredToken, AuthError> {
        let response = self
            .request_token(
                &app.token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", &refresh_token),
                    ("client_id", &app.client_id),
                    ("client_secret", &app.client_secret),
                ],
            )
            .await?;
        tracing::info!("Refreshed YouTube access token");
        Ok(response.into_stored(Some(refresh_token)))
    }

    async fn authorize(&self, app: &InstalledApp) -> Result<StoredToken, AuthError> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let redirect_uri = format!("http://127.0.0.1:{}", listener.local_addr()?.port());

        let auth_url = Url::parse_with_params(
            &app.auth_uri,
            &[
                ("client_id", app.client_id.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", YOUTUBE_SCOPE),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AuthError::InvalidSecrets(format!("auth_uri: {e}")))?;

        println!("Open this URL in your browser to authorize YouTube access:\n\n{auth_url}\n");

        let code = receive_code(&listener).await?;
        let response = self
            .request_token(
                &app.token_uri,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", &code),
                    ("redirect_uri", &redirect_uri),
                    ("client_id", &app.client_id),
                    ("client_secret", &app.client_secret),
                ],
            )
            .await?;
        tracing::info!("Obtained new YouTube credentials");
        Ok(response.into_stored(None))
    }

    async fn request_token(
        &self,
        token_uri: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let resp = self.http.post(token_uri).form(form).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::TokenRejected { status, body });
        }
        Ok(resp.json().await?)
    }
}

fn load_token(path: &Path) -> Option<StoredToken> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}", path.display());
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(token) => Some(token),
        Err(e) => {
            tracing::warn!("Ignoring unreadable token file {}: {e}", path.display());
            None
        }
    }
}

/// Accepts connections until one carries the consent redirect. Idle
/// preconnects and unrelated requests such as `/favicon.ico` are skipped.
async fn receive_code(listener: &TcpListener) -> Result<String, AuthError> {
    loop {
        let (mut stream, _) = listener.accept().await?;
        let mut buf = vec![0u8; 8192];
        let n = match tokio::time::timeout(REDIRECT_READ_TIMEOUT, stream.read(&mut buf)).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                tracing::debug!("Dropping loopback connection: {e}");
                continue;
            }
            Err(_) => continue,
        };
        let request = String::from_utf8_lossy(&buf[..n]);

        let result = match parse_redirect(&request) {
            Ok(None) => {
                if n > 0 {
                    let _ = respond(&mut stream, "404 Not Found", "").await;
                }
                continue;
            }
            Ok(Some(code)) => Ok(code),
            Err(e) => Err(e),
        };

        let message = match result {
            Ok(_) => "Authorization complete. You can close this window.",
            Err(_) => "Authorization failed. Check the terminal for details.",
        };
        respond(&mut stream, "200 OK", message).await?;
        return result;
    }
}

async fn respond(stream: &mut TcpStream, status: &str, message: &str) -> std::io::Result<()> {
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{message}",
        message.len()
    );
    stream.write_all(response.as_bytes()).await
}

/// `Ok(None)` for requests that are not the consent redirect.
fn parse_redirect(request: &str) -> Result<Option<String>, AuthError> {
    let Some(target) = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    else {
        return Ok(None);
    };
    let Ok(url) = Url::parse(&format!("http://127.0.0.1{target}")) else {
        return Ok(None);
    };

    let mut code = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    match (code, error) {
        (Some(code), _) => Ok(Some(code)),
        (None, Some(error)) => Err(AuthError::Denied(error)),
        (None, None) => Ok(None),
    }
}
