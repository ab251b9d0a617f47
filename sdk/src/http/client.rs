//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client, Proxy, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};
use url::Url;

use crate::errors::{ClientError, ValidationError};
use crate::utils::user_agent;

pub(crate) const NODE_RESOURCE: &str = "nodes";
pub(crate) const SERVER_RESOURCE: &str = "servers";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Transport options for [`KaginawaClient`]
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout, connection included
    pub timeout: Duration,

    /// Proxy URL every request is routed through
    pub proxy: Option<String>,

    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            proxy: None,
            user_agent: user_agent(),
        }
    }
}

/// API client for the Kaginawa server.
///
/// Holds only the endpoint and the API key (which needs the admin role);
/// every call performs exactly one request. Share one instance across tasks
/// instead of constructing one per call.
#[derive(Debug)]
pub struct KaginawaClient {
    client: Client,
    endpoint: String,
    base_url: Url,
    api_key: SecretString,
}

impl KaginawaClient {
    /// Create a new client for `endpoint` (`http://...` or `https://...`)
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, ClientError> {
        Self::with_options(endpoint, api_key, ClientOptions::default())
    }

    /// Create a new client routing every request through `proxy`
    pub fn with_proxy(endpoint: &str, api_key: &str, proxy: &str) -> Result<Self, ClientError> {
        let options = ClientOptions {
            proxy: Some(proxy.to_string()),
            ..Default::default()
        };
        Self::with_options(endpoint, api_key, options)
    }

    pub fn with_options(
        endpoint: &str,
        api_key: &str,
        options: ClientOptions,
    ) -> Result<Self, ClientError> {
        let base_url = parse_endpoint(endpoint)?;
        ensure_not_empty("api key", api_key)?;

        let mut builder = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent);
        if let Some(proxy) = &options.proxy {
            let proxy = Proxy::all(proxy.as_str())
                .map_err(|e| ClientError::Config(format!("invalid proxy {}: {}", proxy, e)))?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("unable to build http client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            base_url,
            api_key: SecretString::from(api_key),
        })
    }

    /// Get the endpoint URL as given at construction
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Appends path segments (percent-encoded) and query pairs to the endpoint.
    pub(crate) fn resource_url(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ValidationError::InvalidEndpoint(self.endpoint.clone()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Make a GET request and return the raw body of a 200 response
    pub(crate) async fn get(&self, url: Url) -> Result<String, ClientError> {
        debug!("GET {}", url);
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, self.authorization());
        self.execute(request).await
    }

    /// Make a form-encoded POST request and return the raw body of a 200 response
    pub(crate) async fn post_form(&self, url: Url, form: String) -> Result<String, ClientError> {
        debug!("POST {}", url);
        let request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(header::AUTHORIZATION, self.authorization())
            .body(form);
        self.execute(request).await
    }

    fn authorization(&self) -> String {
        format!("token {}", self.api_key.expose_secret())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<String, ClientError> {
        let response = request.send().await.map_err(|e| self.transport(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport(e))?;

        if status != StatusCode::OK {
            error!("HTTP request failed: {} - {}", status, body);
            return Err(ClientError::Server {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    fn transport(&self, source: reqwest::Error) -> ClientError {
        warn!("Request to {} failed: {}", self.endpoint, source);
        ClientError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

/// Decode a 200 response body, keeping the body on failure
pub(crate) fn decode<T: DeserializeOwned>(
    resource: &'static str,
    body: String,
) -> Result<T, ClientError> {
    match serde_json::from_str(&body) {
        Ok(value) => Ok(value),
        Err(source) => {
            warn!("Failed to decode {} response: {}", resource, source);
            Err(ClientError::Decode {
                resource,
                body,
                source,
            })
        }
    }
}

pub(crate) fn ensure_not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

fn parse_endpoint(endpoint: &str) -> Result<Url, ValidationError> {
    ensure_not_empty("endpoint", endpoint)?;
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ValidationError::InvalidEndpoint(endpoint.to_string()));
    }
    Url::parse(endpoint).map_err(|_| ValidationError::InvalidEndpoint(endpoint.to_string()))
}
