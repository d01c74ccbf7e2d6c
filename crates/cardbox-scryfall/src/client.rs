//! The Scryfall client and builder.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Default base URL for the Scryfall API.
const DEFAULT_URL: &str = "https://api.scryfall.com";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimum gap between requests. Scryfall asks clients to stay under roughly
/// ten requests per second.
const REQUEST_GAP: Duration = Duration::from_millis(100);

/// One card set (edition) as Scryfall reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    /// Three-to-five letter set code, lowercase.
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub released_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SetList {
    data: Vec<Set>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    details: String,
}

/// Client for the Scryfall set endpoints.
///
/// # Example
///
/// ```no_run
/// use cardbox_scryfall::ScryfallClient;
///
/// # async fn example() -> cardbox_scryfall::Result<()> {
/// let client = ScryfallClient::new();
///
/// let set = client.set("m20").await?;
/// println!("{} ({})", set.name, set.code);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ScryfallClient {
    http_client: Client,
    base_url: String,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl ScryfallClient {
    /// Create a new client with default settings.
    ///
    /// Talks to `https://api.scryfall.com` with a 30 second timeout.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a builder for custom client configuration.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Fetch one set by its code.
    pub async fn set(&self, code: &str) -> Result<Set> {
        self.get_json(&format!("sets/{}", code.to_lowercase())).await
    }

    /// Fetch the full set list.
    pub async fn sets(&self) -> Result<Vec<Set>> {
        let list: SetList = self.get_json("sets").await?;
        Ok(list.data)
    }

    async fn get_json<R>(&self, path: &str) -> Result<R>
    where
        R: DeserializeOwned,
    {
        self.throttle().await;

        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "fetching");
        let response = self.http_client.get(&url).send().await.map_err(|e| {
            if e.is_connect() {
                Error::ConnectionRefused
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let details = response
            .json::<ApiError>()
            .await
            .map(|e| e.details)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound(details))
        } else {
            Err(Error::Api(details))
        }
    }

    /// Reserve a request slot, sleeping out the remainder of the gap since
    /// the previous one.
    async fn throttle(&self) {
        let wait = {
            let mut last = self.last_request.lock().expect("request clock poisoned");
            let now = Instant::now();
            let ready = match *last {
                Some(prev) => (prev + REQUEST_GAP).max(now),
                None => now,
            };
            *last = Some(ready);
            ready - now
        };
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for ScryfallClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating a customized [`ScryfallClient`].
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use cardbox_scryfall::ScryfallClient;
///
/// let client = ScryfallClient::builder()
///     .url("http://localhost:8080")
///     .timeout(Duration::from_secs(60))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    timeout: Duration,
    user_agent: String,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("cardbox/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the API base URL.
    ///
    /// Defaults to `https://api.scryfall.com`.
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    /// Set the User-Agent header. Scryfall requires clients to identify
    /// themselves.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Build the client.
    pub fn build(self) -> ScryfallClient {
        let http_client = Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()
            .expect("Failed to build HTTP client");

        ScryfallClient {
            http_client,
            base_url: self.base_url.trim_end_matches('/').to_string(),
            last_request: Arc::new(Mutex::new(None)),
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
