//! Nexar Supply API client.
//!
//! Handles OAuth2 client-credentials authentication against the Nexar
//! identity endpoint and component search against the Nexar GraphQL
//! endpoint.
//!
//! # Token lifetime
//!
//! One bearer token is fetched lazily on the first search and reused for
//! the lifetime of the client. There is no expiry tracking and no refresh;
//! a long-lived process whose token expires will start failing searches
//! (known accepted limitation). Two concurrent first searches may both
//! fetch a token; both tokens are valid and the last write wins, so no
//! lock is held across the network call.

use std::sync::Mutex;
use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::error::{ConfigError, NexarError};

use super::normalize::parts_from_response;
use super::types::{Part, SearchResponse, TokenResponse};

/// Nexar identity endpoint for OAuth2 token acquisition.
const TOKEN_URL: &str = "https://identity.nexar.com/connect/token";

/// Nexar Supply GraphQL endpoint.
const API_URL: &str = "https://api.nexar.com/graphql";

/// Timeout for the token request.
const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the search request.
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// The fixed search query document.
const SEARCH_QUERY: &str = r"
query SearchParts($query: String!, $limit: Int!) {
  supSearch(q: $query, limit: $limit) {
    results {
      part {
        mpn
        manufacturer {
          name
        }
        shortDescription
        medianPrice1000 {
          price
          currency
        }
        specs {
          attribute {
            shortname
          }
          value {
            text
          }
        }
        bestDatasheet {
          url
        }
      }
    }
  }
}
";

/// Client for the Nexar Supply API.
pub struct NexarClient {
    client_id: String,
    client_secret: String,
    token_url: String,
    api_url: String,
    /// Cached bearer token, filled on first use. See the module docs for
    /// the accepted double-fetch race.
    access_token: Mutex<Option<String>>,
    http: reqwest::Client,
}

impl NexarClient {
    /// Creates a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential is empty.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::with_endpoints(
            &config.client_id,
            &config.client_secret,
            TOKEN_URL,
            API_URL,
        )
    }

    /// Creates a client with explicit endpoint URLs.
    ///
    /// Production code always uses [`Self::new`]; this constructor exists
    /// so tests can stand in for the Nexar endpoints.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential is empty.
    pub fn with_endpoints(
        client_id: &str,
        client_secret: &str,
        token_url: &str,
        api_url: &str,
    ) -> Result<Self, ConfigError> {
        if client_id.is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "NEXAR_CLIENT_ID",
            });
        }
        if client_secret.is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "NEXAR_CLIENT_SECRET",
            });
        }

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            token_url: token_url.to_string(),
            api_url: api_url.to_string(),
            access_token: Mutex::new(None),
            http: reqwest::Client::new(),
        })
    }

    /// Returns the cached bearer token, fetching one if none is held.
    ///
    /// No freshness check is performed on a cached token.
    async fn acquire_token(&self) -> Result<String, NexarError> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        debug!("No cached token, requesting one from the identity endpoint");

        let response = self
            .http
            .post(&self.token_url)
            .timeout(TOKEN_TIMEOUT)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", "supply"),
            ])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| NexarError::Authentication { source })?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|source| NexarError::Authentication { source })?;

        self.store_token(token.access_token.clone());

        Ok(token.access_token)
    }

    /// Reads the cached token, if any.
    fn cached_token(&self) -> Option<String> {
        self.access_token
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Stores a freshly fetched token. Last write wins.
    fn store_token(&self, token: String) {
        if let Ok(mut guard) = self.access_token.lock() {
            *guard = Some(token);
        }
    }

    /// Searches the catalog and returns normalised parts.
    ///
    /// Results follow upstream relevance order.
    ///
    /// # Errors
    ///
    /// - [`NexarError::Authentication`] when token acquisition fails
    /// - [`NexarError::Api`] when the response carries a GraphQL error list
    /// - [`NexarError::Request`] on transport-level search failure
    pub async fn search_components(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Part>, NexarError> {
        let token = self.acquire_token().await?;

        debug!(query, limit, "Searching Nexar Supply");

        let body = json!({
            "query": SEARCH_QUERY,
            "variables": {"query": query, "limit": limit},
        });

        let response = self
            .http
            .post(&self.api_url)
            .timeout(SEARCH_TIMEOUT)
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|source| NexarError::Request { source })?;

        let decoded: SearchResponse = response
            .json()
            .await
            .map_err(|source| NexarError::Request { source })?;

        if let Some(errors) = decoded.errors {
            let messages = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(NexarError::Api { messages });
        }

        Ok(parts_from_response(decoded))
    }
}
