use crate::error::{token_error, CommuteResult};
use chrono::Utc;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Google OAuth token endpoint
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Tokens are refreshed this many seconds before they actually expire
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Persisted OAuth token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Unix timestamp after which the access token is no longer valid
    pub expires_at: i64,
}

impl StoredToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at - EXPIRY_MARGIN_SECS <= Utc::now().timestamp()
    }
}

/// Token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert into a stored token, keeping `previous_refresh` when the endpoint omits one
    pub fn into_stored(self, previous_refresh: Option<String>) -> StoredToken {
        StoredToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.or(previous_refresh),
            expires_at: Utc::now().timestamp() + self.expires_in.unwrap_or(3600),
        }
    }
}

/// Reads the token file and refreshes expired tokens
#[derive(Debug, Clone)]
pub struct TokenManager {
    path: PathBuf,
    client_id: String,
    client_secret: String,
    token_url: String,
    client: Client,
}

impl TokenManager {
    pub fn new(path: impl Into<PathBuf>, client_id: &str, client_secret: &str) -> Self {
        Self {
            path: path.into(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Use a different token endpoint
    pub fn with_token_url(mut self, token_url: &str) -> Self {
        self.token_url = token_url.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a valid access token, refreshing and persisting it if it has expired
    pub async fn access_token(&self) -> CommuteResult<String> {
        let token = self.load().await?;
        if !token.is_expired() {
            return Ok(token.access_token);
        }

        info!("Access token expired, refreshing");
        let refreshed = self.refresh_token(&token).await?;
        Ok(refreshed.access_token)
    }

    /// Read the stored token from disk
    pub async fn load(&self) -> CommuteResult<StoredToken> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(token_error(&format!(
                    "No token found at {}",
                    self.path.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content)
            .map_err(|e| token_error(&format!("Failed to parse token file: {}", e)))
    }

    /// Write a token to disk
    pub async fn save(&self, token: &StoredToken) -> CommuteResult<()> {
        let json = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&self.path, json).await?;
        debug!("Token saved to {}", self.path.display());
        Ok(())
    }

    /// Refresh an expired token
    async fn refresh_token(&self, token: &StoredToken) -> CommuteResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or_else(|| token_error("No refresh token in token data"))?;

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| token_error(&format!("Failed to refresh token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(token_error(&format!(
                "Failed to refresh token: HTTP {} - {}",
                status, error_body
            )));
        }

        let new_token: TokenResponse = response
            .json()
            .await
            .map_err(|e| token_error(&format!("Failed to parse token response: {}", e)))?;

        let stored = new_token.into_stored(Some(refresh_token));
        self.save(&stored).await?;

        Ok(stored)
    }
}
