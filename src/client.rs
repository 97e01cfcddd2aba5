use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{AskRequest, AskResponse};

/// Where the support endpoint listens unless told otherwise.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";
/// How long a single `/ask` request may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ASK_PATH: &str = "ask";

/// Anything that can answer a query.
///
/// The chat session only talks to the network through this trait, so tests and
/// alternative transports can stand in for [`AskClient`].
#[async_trait::async_trait]
pub trait AskBackend: Send + Sync {
    /// Sends one query and waits for the decoded payload.
    async fn ask(&self, request: AskRequest) -> Result<AskResponse>;
}

/// Client for the `POST /ask` endpoint.
#[derive(Clone)]
pub struct AskClient {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl AskClient {
    /// Create a new client for the endpoint rooted at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_options(Some(base_url), None)
    }

    /// Create a new client with custom settings.
    ///
    /// `None` picks [`DEFAULT_BASE_URL`] and a 60 second timeout.
    pub fn with_options(base_url: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = parse_base_url(base_url.unwrap_or(DEFAULT_BASE_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every request and its outcome.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The full URL of the ask endpoint.
    pub fn endpoint(&self) -> Result<Url> {
        Ok(self.base_url.join(ASK_PATH)?)
    }

    /// Create and return default headers for requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Process error responses and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        // FastAPI-style bodies carry the reason in `detail`.
        #[derive(Deserialize)]
        struct ErrorResponse {
            detail: Option<serde_json::Value>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let error_message = serde_json::from_str::<ErrorResponse>(&error_body)
            .ok()
            .and_then(|e| e.detail)
            .map(|detail| match detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or(error_body);

        match status_code {
            400 => Error::bad_request(error_message),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None).with_status(408),
            422 => Error::validation(error_message, Some("query".to_string())).with_status(422),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(status_code, error_message),
            _ => Error::api(status_code, error_message),
        }
    }

    /// Send a query and decode the answer payload.
    pub async fn send(&self, request: &AskRequest) -> Result<AskResponse> {
        CLIENT_REQUESTS.click();
        if let Some(logger) = &self.logger {
            logger.log_request(request);
        }
        let start = Instant::now();
        let result = self.send_inner(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(request, response);
                }
            }
            Err(err) => {
                CLIENT_REQUEST_ERRORS.click();
                if let Some(logger) = &self.logger {
                    logger.log_failure(request, err);
                }
            }
        }
        result
    }

    async fn send_inner(&self, request: &AskRequest) -> Result<AskResponse> {
        let url = self.endpoint()?;

        let response = self
            .client
            .post(url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<AskResponse>().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Response timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            }
        })
    }
}

impl fmt::Debug for AskClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AskClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

#[async_trait::async_trait]
impl AskBackend for AskClient {
    async fn ask(&self, request: AskRequest) -> Result<AskResponse> {
        self.send(&request).await
    }
}

/// Parses a base URL, making sure its path ends in `/` so `ask` is appended
/// rather than replacing the last segment.
fn parse_base_url(base_url: &str) -> Result<Url> {
    let mut url = Url::parse(base_url)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(
            format!("{base_url} cannot be used as a base URL"),
            None,
        ));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AskClient::with_options(None, None).unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);

        let client =
            AskClient::with_options(Some("https://support.example.com/"), Some(Duration::from_secs(5)))
                .unwrap();
        assert_eq!(client.base_url().as_str(), "https://support.example.com/");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn endpoint_appends_ask() {
        let client = AskClient::new("http://127.0.0.1:8000").unwrap();
        assert_eq!(client.endpoint().unwrap().as_str(), "http://127.0.0.1:8000/ask");

        let client = AskClient::new("http://host/api/v1").unwrap();
        assert_eq!(client.endpoint().unwrap().as_str(), "http://host/api/v1/ask");

        let client = AskClient::new("http://host/api/v1/").unwrap();
        assert_eq!(client.endpoint().unwrap().as_str(), "http://host/api/v1/ask");
    }

    #[test]
    fn invalid_base_url_rejected() {
        let err = AskClient::new("not a url").unwrap_err();
        assert!(matches!(err, Error::Url { .. }));

        let err = AskClient::new("mailto:support@example.com").unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn debug_hides_internals() {
        let client = AskClient::new("http://127.0.0.1:8000/").unwrap();
        let debug = format!("{client:?}");
        assert!(debug.contains("127.0.0.1:8000"));
        assert!(debug.contains("logger: false"));
    }
}
