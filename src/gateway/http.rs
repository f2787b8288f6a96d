//! JSON-over-HTTP gateway client.
//!
//! Talks to the storefront API rooted at `STOREFRONT_API_URL`:
//!
//! - `POST {base}/cart/add` with an [`AddToCartRequest`] body
//! - `GET  {base}/orders`
//!
//! Successful responses wrap their payload in `{"data": ...}`. Error responses carry
//! `{"message": "..."}`, which is surfaced through [`GatewayError::Rejected`].

use super::{AddToCartRequest, AddToCartResponse, CartGateway, GatewayError, OrdersResponse};
use crate::config::SyncConfig;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

const ADD_TO_CART_PATH: &str = "cart/add";
const ORDERS_PATH: &str = "orders";

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Gateway backed by the remote storefront API.
#[derive(Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl HttpGateway {
    /// Builds a client for `config.api_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Transport`] if no API URL is configured, the token is not a
    /// valid header value, or the HTTP client fails to build.
    pub fn from_config(config: &SyncConfig) -> Result<Self, GatewayError> {
        let base_url = config
            .api_url
            .clone()
            .ok_or_else(|| GatewayError::Transport("STOREFRONT_API_URL is not set".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.api_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| GatewayError::Transport(format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.base_url
            .join(path)
            .map_err(|e| GatewayError::Transport(format!("Invalid endpoint {path}: {e}")))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Gateway rejected request");
            return Err(GatewayError::Rejected {
                status: Some(status.as_u16()),
                message: error_message(&body),
            });
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;
        Ok(envelope.data)
    }
}

/// `Url::join` drops the last path segment unless the base ends with a slash.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Extracts `message` from an error body; falls back to nothing for non-JSON bodies.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
}

#[async_trait]
impl CartGateway for HttpGateway {
    #[instrument(skip(self))]
    async fn add_to_cart(
        &self,
        request: AddToCartRequest,
    ) -> Result<AddToCartResponse, GatewayError> {
        let url = self.endpoint(ADD_TO_CART_PATH)?;
        debug!(%url, "Sending request");
        let response = self.client.post(url).json(&request).send().await?;
        Self::decode(response).await
    }

    #[instrument(skip(self))]
    async fn get_orders(&self) -> Result<OrdersResponse, GatewayError> {
        let url = self.endpoint(ORDERS_PATH)?;
        debug!(%url, "Sending request");
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }
}
