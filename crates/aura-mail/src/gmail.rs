//! Gmail - REST client for the Gmail v1 message surface
//!
//! Covers exactly the calls the assistant needs: inbox listing with
//! subject/sender metadata and full-message reads with a plain-text body.
//! The access token is supplied via `GMAIL_ACCESS_TOKEN` or
//! `~/.aura/token.json`; refresh mechanics belong to the authentication
//! collaborator and are not handled here.

use crate::error::{Error, Result};
use crate::{Mailbox, Message, MessageSummary};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Gmail API base URL
const BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GmailMessage {
    id: String,
    #[serde(default)]
    snippet: Option<String>,
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    body: Option<Body>,
    #[serde(default)]
    parts: Option<Vec<Payload>>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct Body {
    #[serde(default)]
    data: Option<String>,
}

impl Payload {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Recursively extract the first text/plain body, descending into
    /// multipart/alternative containers.
    fn text_body(&self) -> Option<Result<String>> {
        if self.mime_type.as_deref() == Some("text/plain") {
            if let Some(data) = self.body.as_ref().and_then(|b| b.data.as_deref()) {
                return Some(decode_body(data));
            }
        }
        for part in self.parts.as_deref().unwrap_or_default() {
            if let Some(body) = part.text_body() {
                return Some(body);
            }
        }
        None
    }
}

/// Decode a URL-safe base64 message body (Gmail emits unpadded data).
fn decode_body(data: &str) -> Result<String> {
    let trimmed = data.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| Error::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))
}

// ============================================================================
// Client
// ============================================================================

/// Gmail REST client over a bearer access token.
#[derive(Clone)]
pub struct GmailClient {
    client: Client,
    token: String,
    base_url: String,
}

impl fmt::Debug for GmailClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GmailClient")
            .field("token", &"****")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Stored token file shape (`~/.aura/token.json`)
#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: String,
}

/// Default token file location
#[must_use]
pub fn default_token_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".aura")
        .join("token.json")
}

impl GmailClient {
    /// Create a client from an access token
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self {
            client,
            token: token.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Create a client from the environment.
    ///
    /// Reads `GMAIL_ACCESS_TOKEN`, falling back to the `access_token`
    /// field of `~/.aura/token.json`.
    pub fn from_env() -> Result<Self> {
        if let Ok(token) = std::env::var("GMAIL_ACCESS_TOKEN") {
            return Self::new(token);
        }

        let path = default_token_path();
        let contents = std::fs::read_to_string(&path).map_err(|_| {
            Error::Auth(format!(
                "set GMAIL_ACCESS_TOKEN or place a token at {}",
                path.display()
            ))
        })?;
        let stored: StoredToken = serde_json::from_str(&contents)
            .map_err(|e| Error::Auth(format!("unreadable token file: {e}")))?;
        Self::new(stored.access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::Auth("access token rejected".to_string()))
            }
            StatusCode::NOT_FOUND => Err(Error::NotFound(url.to_string())),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::Api(format!("{status}: {body}")))
            }
            _ => response
                .json::<T>()
                .await
                .map_err(|e| Error::Api(format!("unexpected response shape: {e}"))),
        }
    }

    async fn fetch_summary(&self, id: &str) -> Result<MessageSummary> {
        let url = format!(
            "{}/users/me/messages/{id}?format=metadata&metadataHeaders=Subject&metadataHeaders=From",
            self.base_url
        );
        let message: GmailMessage = self.get_json(&url).await?;
        let payload = message.payload.as_ref();
        Ok(MessageSummary {
            id: message.id,
            subject: payload
                .and_then(|p| p.header("Subject"))
                .unwrap_or("(no subject)")
                .to_string(),
            from: payload
                .and_then(|p| p.header("From"))
                .unwrap_or("(unknown sender)")
                .to_string(),
        })
    }
}

#[async_trait::async_trait]
impl Mailbox for GmailClient {
    #[instrument(skip(self))]
    async fn list(&self, count: usize) -> Result<Vec<MessageSummary>> {
        let url = format!(
            "{}/users/me/messages?labelIds=INBOX&maxResults={count}",
            self.base_url
        );
        let listing: ListResponse = self.get_json(&url).await?;
        debug!(messages = listing.messages.len(), "listed inbox");

        let mut summaries = Vec::with_capacity(listing.messages.len());
        for reference in listing.messages {
            match self.fetch_summary(&reference.id).await {
                Ok(summary) => summaries.push(summary),
                Err(e) => warn!(id = %reference.id, error = %e, "skipping unreadable message"),
            }
        }
        Ok(summaries)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: &str) -> Result<Message> {
        let url = format!("{}/users/me/messages/{id}?format=full", self.base_url);
        let message: GmailMessage = self.get_json(&url).await?;

        let payload = message.payload.as_ref();
        let subject = payload
            .and_then(|p| p.header("Subject"))
            .unwrap_or("(no subject)")
            .to_string();
        let from = payload
            .and_then(|p| p.header("From"))
            .unwrap_or("(unknown sender)")
            .to_string();

        // Snippet fallback when no text/plain part exists.
        let body = match payload.and_then(Payload::text_body) {
            Some(body) => body?,
            None => message
                .snippet
                .unwrap_or_else(|| "No content found.".to_string()),
        };

        Ok(Message {
            id: message.id,
            subject,
            from,
            body,
        })
    }
}
