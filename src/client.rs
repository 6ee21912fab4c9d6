//! HTTP transport: authentication, throttling, and raw request helpers.
//!
//! [`AkeneoClient`] owns the base URL, the OAuth2 password-grant token
//! lifecycle, and an optional [`LeakyBucket`] throttle. Typed entity access
//! goes through [`crate::resources`]; the raw helpers here stay public as an
//! escape hatch for endpoints the resource wrappers do not model.

use std::time::{Duration, Instant};

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use url::Url;

use crate::errors::{Error, Result};
use crate::resources::{CategoriesApi, ProductModelsApi, ProductsApi};
use crate::search::SearchParams;
use crate::throttle::LeakyBucket;

const TOKEN_PATH: &str = "api/oauth/v1/token";

/// Refresh the token this long before the server-side expiry.
const TOKEN_EXPIRY_SLACK: Duration = Duration::from_secs(30);

/// OAuth2 password-grant credentials for a PIM connection.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub secret: String,
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            secret: secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

/// Async client for an Akeneo-style PIM REST API.
#[derive(Debug)]
pub struct AkeneoClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    token: RwLock<Option<AccessToken>>,
    throttle: Option<LeakyBucket>,
}

impl AkeneoClient {
    /// Build a client against `base_url` (scheme and host, e.g.
    /// `https://pim.example.com`).
    ///
    /// # Errors
    /// [`Error::Config`] when the base URL does not parse.
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        // A trailing slash keeps Url::join from clobbering any base path.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| Error::Config {
            message: format!("invalid base URL {base_url:?}: {e}"),
        })?;
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            credentials,
            token: RwLock::new(None),
            throttle: None,
        })
    }

    /// Rate-limit every request through the given bucket.
    #[must_use]
    pub fn with_throttle(mut self, throttle: LeakyBucket) -> Self {
        self.throttle = Some(throttle);
        self
    }

    /// Product endpoints.
    #[must_use]
    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    /// Product model endpoints.
    #[must_use]
    pub fn product_models(&self) -> ProductModelsApi<'_> {
        ProductModelsApi::new(self)
    }

    /// Category endpoints.
    #[must_use]
    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi::new(self)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| Error::Config {
                message: format!("invalid endpoint path {path:?}: {e}"),
            })
    }

    async fn token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref()
            && token.expires_at > Instant::now() + TOKEN_EXPIRY_SLACK
        {
            return Ok(token.value.clone());
        }
        self.refresh_token().await
    }

    async fn refresh_token(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: u64,
        }

        let url = self.endpoint(TOKEN_PATH)?;
        tracing::debug!("requesting access token");
        let response = self
            .http
            .post(url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.secret))
            .json(&serde_json::json!({
                "grant_type": "password",
                "username": self.credentials.username,
                "password": self.credentials.password,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "token request rejected");
            return Err(Error::Authentication {
                message: format!("token endpoint returned {status}"),
            });
        }

        let body: TokenResponse = response.json().await?;
        let token = AccessToken {
            value: body.access_token,
            expires_at: Instant::now() + Duration::from_secs(body.expires_in),
        };
        let value = token.value.clone();
        *self.token.write().await = Some(token);
        Ok(value)
    }

    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        query: Option<&SearchParams>,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        if let Some(throttle) = &self.throttle {
            throttle.acquire().await;
        }
        let token = self.token().await?;
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "dispatching request");

        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(query) = query {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    /// GET an endpoint and decode its JSON body.
    ///
    /// # Errors
    /// Transport, authentication, API-status, or decode failures.
    pub async fn get(&self, path: &str, query: Option<&SearchParams>) -> Result<Value> {
        self.dispatch(Method::GET, path, query, None)
            .await?
            .ok_or_else(|| Error::UnexpectedResponse {
                message: format!("GET {path} returned an empty body"),
            })
    }

    /// POST a JSON body; the response body, when present, is returned.
    ///
    /// # Errors
    /// Transport, authentication, API-status, or decode failures.
    pub async fn post(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.dispatch(Method::POST, path, None, Some(body)).await
    }

    /// PATCH a JSON body. The API frequently answers PATCH with an empty
    /// body, hence the `Option`.
    ///
    /// # Errors
    /// Transport, authentication, API-status, or decode failures.
    pub async fn patch(&self, path: &str, body: &Value) -> Result<Option<Value>> {
        self.dispatch(Method::PATCH, path, None, Some(body)).await
    }

    /// DELETE an endpoint.
    ///
    /// # Errors
    /// Transport, authentication, or API-status failures.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.dispatch(Method::DELETE, path, None, None).await?;
        Ok(())
    }

    /// PATCH a newline-delimited JSON collection (bulk update). Returns one
    /// status object per submitted line.
    ///
    /// # Errors
    /// Transport, authentication, API-status, or decode failures.
    pub async fn patch_collection(&self, path: &str, lines: &[Value]) -> Result<Vec<Value>> {
        if let Some(throttle) = &self.throttle {
            throttle.acquire().await;
        }
        let token = self.token().await?;
        let url = self.endpoint(path)?;
        tracing::debug!(%url, lines = lines.len(), "dispatching bulk update");

        let payload = lines
            .iter()
            .map(serde_json::to_string)
            .collect::<std::result::Result<Vec<_>, _>>()?
            .join("\n");
        let response = self
            .http
            .patch(url)
            .bearer_auth(token)
            .header("Content-Type", "application/vnd.akeneo.collection+json")
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Error::from))
            .collect()
    }
}

/// Map a non-success response to [`Error::Api`], preferring the server's
/// own `message` field over the raw body.
fn api_error(status: u16, body: &str) -> Error {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(ToString::to_string))
        .unwrap_or_else(|| body.trim().to_string());
    tracing::warn!(status, %message, "API request failed");
    Error::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_a_trailing_slash() {
        let client = AkeneoClient::new(
            "https://pim.example.com",
            Credentials::new("id", "secret", "user", "pass"),
        )
        .unwrap();
        let url = client.endpoint("api/rest/v1/products/1234567").unwrap();
        assert_eq!(
            url.as_str(),
            "https://pim.example.com/api/rest/v1/products/1234567"
        );
    }

    #[test]
    fn absolute_paths_do_not_escape_the_base() {
        let client = AkeneoClient::new(
            "https://pim.example.com",
            Credentials::new("id", "secret", "user", "pass"),
        )
        .unwrap();
        let url = client.endpoint("/api/rest/v1/categories").unwrap();
        assert_eq!(url.as_str(), "https://pim.example.com/api/rest/v1/categories");
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let result = AkeneoClient::new("not a url", Credentials::new("a", "b", "c", "d"));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn api_error_prefers_the_server_message() {
        let err = api_error(422, r#"{"code": 422, "message": "Property does not exist"}"#);
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Property does not exist");
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }
}
