use crate::browser::config::BrowserConfig;
use crate::error::{BrowserError, Result};
use crate::request::Method;
use std::time::{Duration, Instant};

/// One fully-resolved outgoing request, ready for the wire
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub url: String,
    pub method: Method,
    /// Encoded request body, absent for GET (the query travels in the URL)
    pub body: Option<String>,
    /// Content type for the body, when one is present
    pub content_type: Option<String>,
}

/// What came back from one live request
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Final URL after redirect following
    pub effective_url: String,
    pub body: Vec<u8>,
}

/// The narrow seam to the underlying HTTP stack.
///
/// One blocking call per attempt, redirects followed internally, timeouts
/// enforced by the implementation. Swapping this out is how the retry and
/// payload-capture tests run without a network.
pub trait Transport {
    fn perform(&self, request: &TransportRequest) -> Result<TransportResponse>;
}

/// Live transport backed by a blocking reqwest client
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build the client once from the session config
    pub fn new(config: &BrowserConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| BrowserError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn perform(&self, request: &TransportRequest) -> Result<TransportResponse> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Patch => reqwest::Method::PATCH,
            Method::Options => reqwest::Method::OPTIONS,
        };

        let mut builder = self.client.request(method, &request.url);
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        if let Some(content_type) = &request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = builder
            .send()
            .map_err(|e| BrowserError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let effective_url = response.url().to_string();
        let body = response
            .bytes()
            .map_err(|e| BrowserError::Transport(format!("failed to read body: {}", e)))?
            .to_vec();

        Ok(TransportResponse {
            status,
            effective_url,
            body,
        })
    }
}

/// Run the request up to `attempts` times, sequentially and without backoff.
///
/// The last observed error is the one that propagates. The returned duration
/// is wall-clock time across the whole loop, not a single attempt.
pub(crate) fn fetch_with_retries(
    transport: &dyn Transport,
    request: &TransportRequest,
    attempts: u32,
) -> (Duration, Result<TransportResponse>) {
    let started = Instant::now();
    let mut remaining = attempts.max(1);

    let outcome = loop {
        match transport.perform(request) {
            Ok(response) => break Ok(response),
            Err(error) => {
                remaining -= 1;
                if remaining == 0 {
                    break Err(error);
                }
                log::warn!(
                    "transport attempt failed for {} {} ({} left): {}",
                    request.method,
                    request.url,
                    remaining,
                    error
                );
            }
        }
    };

    (started.elapsed(), outcome)
}
