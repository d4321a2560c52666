//! Generation request client: one POST to the configured service, response
//! body returned as plain text.
//!
//! The client owns an explicit in-flight guard. A second `generate` while
//! one is outstanding is rejected deterministically with
//! [`GenerationError::RequestInFlight`] instead of relying on the caller's
//! loading flag. There is no retry, no timeout, and no cancellation; a
//! failure is surfaced once and the caller may resubmit freely.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::form::GenerationRequest;

/// Route suffix appended to the configured base URL.
pub const GENERATE_ROUTE: &str = "openai";

/// Failure modes of a generation exchange.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A request is already outstanding on this client.
    #[error("a generation request is already in flight")]
    RequestInFlight,

    /// The request never completed (connect failure, reset, DNS, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service error ({status}): {body}")]
    Service { status: u16, body: String },

    /// The response arrived but its body could not be read.
    #[error("unreadable response body: {0}")]
    Body(String),
}

/// Seam between the session controller and the remote service, so the flow
/// around a submission can be exercised without a network.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Perform exactly one request/response exchange. On success the
    /// response text is returned unaltered.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}

/// HTTP implementation talking to `{base_url}openai`.
pub struct HttpGenerationClient {
    http: reqwest::Client,
    base_url: String,
    in_flight: AtomicBool,
}

impl HttpGenerationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    async fn dispatch(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let url = format!("{}{GENERATE_ROUTE}", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Service { status, body });
        }

        response
            .text()
            .await
            .map_err(|e| GenerationError::Body(e.to_string()))
    }
}

#[async_trait]
impl GenerationBackend for HttpGenerationClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(GenerationError::RequestInFlight);
        }

        let outcome = self.dispatch(request).await;
        // The guard clears on success and failure alike.
        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            user_request: "What is 2+2?".into(),
            temperature: 0.2,
        }
    }

    #[tokio::test]
    async fn second_call_while_outstanding_is_rejected() {
        let client = HttpGenerationClient::new("http://localhost:0/");
        client.in_flight.store(true, Ordering::SeqCst);

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::RequestInFlight));
        // Rejection must not clobber the outstanding request's guard.
        assert!(client.in_flight.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn guard_clears_after_a_failed_exchange() {
        // Port 0 is unroutable, so the dispatch fails at the transport layer.
        let client = HttpGenerationClient::new("http://127.0.0.1:0/");

        let err = client.generate(&request()).await.unwrap_err();
        assert!(matches!(err, GenerationError::Transport(_)));
        assert!(!client.in_flight.load(Ordering::SeqCst));
    }

    #[test]
    fn route_is_appended_verbatim_to_the_base_url() {
        let client = HttpGenerationClient::new("http://localhost:3001/");
        assert_eq!(
            format!("{}{GENERATE_ROUTE}", client.base_url),
            "http://localhost:3001/openai"
        );
    }
}
