//! Outbound HTTP for remote drivers
//!
//! [`HttpTransport::request`] issues exactly one blocking call. Any exchange
//! that produced a response, whatever its status, comes back as
//! [`HttpResponse`] so the caller can inspect it. Failures without a response
//! are reported as a typed [`TransportError`]. There is no retry logic.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use thiserror::Error;
use tracing::{debug, warn};

/// Failure of an outbound request that produced no response
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header {name}: {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("failed to connect: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully read HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Body decoded as UTF-8, lossily
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Blocking HTTP client shared by the requests of one driver
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with the client's default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport around an already configured client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Create a transport whose requests time out after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Issue one HTTP request
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP verb, e.g. `"GET"`, `"PUT"`
    /// * `uri` - absolute URL
    /// * `options` - headers, query pairs, body and timeout
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use storage_drivers::transport::{HttpTransport, RequestOptions};
    ///
    /// let transport = HttpTransport::new();
    /// let url = "http://127.0.0.1:9000/bucket/a.txt";
    /// match transport.request("HEAD", url, RequestOptions::new()) {
    ///     Ok(response) => println!("status {}", response.status),
    ///     Err(err) => eprintln!("no response: {err}"),
    /// }
    /// ```
    pub fn request(
        &self,
        method: &str,
        uri: &str,
        options: RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| TransportError::InvalidMethod(method.to_string()))?;
        let url = Url::parse(uri).map_err(|e| TransportError::InvalidUrl {
            url: uri.to_string(),
            reason: e.to_string(),
        })?;

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let invalid = |reason: String| TransportError::InvalidHeader {
                name: name.clone(),
                reason,
            };
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| invalid(e.to_string()))?;
            let header_value = HeaderValue::from_str(value).map_err(|e| invalid(e.to_string()))?;
            headers.append(header_name, header_value);
        }

        debug!(%method, %url, "Sending request");

        let mut request = self.client.request(method.clone(), url.clone()).headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = options.body {
            request = request.body(body);
        }
        if let Some(timeout) = options.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().map_err(|e| {
            warn!(%method, %url, error = %e, "Request produced no response");
            TransportError::from(e)
        })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();

        debug!(%method, %url, status = status.as_u16(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_method() {
        let transport = HttpTransport::new();
        let result = transport.request("NOT A VERB", "http://127.0.0.1/", RequestOptions::new());
        assert!(matches!(result, Err(TransportError::InvalidMethod(_))));
    }

    #[test]
    fn test_invalid_url() {
        let transport = HttpTransport::new();
        let result = transport.request("GET", "not a url", RequestOptions::new());
        assert!(matches!(result, Err(TransportError::InvalidUrl { .. })));
    }

    #[test]
    fn test_invalid_header() {
        let transport = HttpTransport::new();
        let options = RequestOptions::new().header("bad header", "x");
        let result = transport.request("GET", "http://127.0.0.1/", options);
        assert!(matches!(result, Err(TransportError::InvalidHeader { .. })));
    }

    #[test]
    fn test_connection_refused_is_typed() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = HttpTransport::from_client(Client::builder().no_proxy().build().unwrap());
        let result = transport.request(
            "GET",
            &format!("http://127.0.0.1:{port}/"),
            RequestOptions::new().timeout(Duration::from_secs(5)),
        );
        assert!(matches!(
            result,
            Err(TransportError::Connect(_) | TransportError::Request(_))
        ));
    }
}
