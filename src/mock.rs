//! Mock transport for testing purposes.
//!
//! This module provides a mock [`Transport`] that simulates API responses so
//! client and pipeline behavior can be tested without a network.

use std::collections::VecDeque;

use async_trait::async_trait;
use serde_json::json;

use crate::note::Note;
use crate::request::{ApiRequest, HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::{Error, Result};

/// A mock transport that replays canned responses.
///
/// The mock accepts a series of expected request/response pairs and validates
/// that the client sends the expected requests in order. Requests are compared
/// by method, URL and body; headers are recorded but not compared, so the same
/// expectations work for anonymous and authenticated sessions.
pub struct MockTransport {
    base_url: String,
    expected_interactions: VecDeque<(ApiRequest, HttpResponse)>,
    sent: Vec<HttpRequest>,
    strict_mode: bool,
}

impl MockTransport {
    /// Create a new mock transport with a series of expected interactions.
    pub fn new(base_url: impl Into<String>, interactions: Vec<(ApiRequest, HttpResponse)>) -> Self {
        Self {
            base_url: base_url.into(),
            expected_interactions: interactions.into(),
            sent: Vec::new(),
            strict_mode: true,
        }
    }

    /// Create a new mock transport in non-strict mode.
    ///
    /// In non-strict mode, unexpected requests get a 500 response rather
    /// than a transport error.
    pub fn new_relaxed(
        base_url: impl Into<String>,
        interactions: Vec<(ApiRequest, HttpResponse)>,
    ) -> Self {
        Self {
            strict_mode: false,
            ..Self::new(base_url, interactions)
        }
    }

    /// Check if all expected interactions have been processed.
    pub fn is_complete(&self) -> bool {
        self.expected_interactions.is_empty()
    }

    /// Get the number of remaining expected interactions.
    pub fn remaining_interactions(&self) -> usize {
        self.expected_interactions.len()
    }

    /// Requests received so far, in order.
    pub fn sent_requests(&self) -> &[HttpRequest] {
        &self.sent
    }

    fn handle(&mut self, request: &HttpRequest) -> Result<HttpResponse> {
        let Some((expected, response)) = self.expected_interactions.pop_front() else {
            return if self.strict_mode {
                Err(Error::Transport("No more expected requests".to_string()))
            } else {
                Ok(error_response(500, "MockError", "No handler for request"))
            };
        };

        let expected_http = expected.encode(&self.base_url)?;
        let matches = expected_http.method == request.method
            && expected_http.url == request.url
            && expected_http.body == request.body;

        if matches {
            Ok(response)
        } else if self.strict_mode {
            Err(Error::Transport(format!(
                "Expected request {expected:?}, got {} {}",
                request.method.as_str(),
                request.url
            )))
        } else {
            self.expected_interactions.push_front((expected, response));
            Ok(error_response(500, "MockError", "Request not recognized"))
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&mut self, request: HttpRequest) -> Result<HttpResponse> {
        let response = self.handle(&request);
        self.sent.push(request);
        response
    }
}

/// A transport that fails every request, as an unreachable host would.
pub struct UnreachableTransport;

#[async_trait]
impl Transport for UnreachableTransport {
    async fn send(&mut self, request: HttpRequest) -> Result<HttpResponse> {
        Err(Error::Transport(format!(
            "Failed to connect to {}",
            request.url
        )))
    }
}

/// A `200` response carrying the given notes, as the `/notes` endpoint returns.
pub fn notes_response(notes: &[Note], count: Option<usize>) -> HttpResponse {
    let body = match count {
        Some(count) => json!({ "notes": notes, "count": count }),
        None => json!({ "notes": notes }),
    };
    HttpResponse::json(200, body.to_string())
}

/// A `200` login response carrying a token.
pub fn token_response(token: &str) -> HttpResponse {
    HttpResponse::json(200, json!({ "token": token }).to_string())
}

/// An error response in the API's error body format.
pub fn error_response(status: u16, name: &str, message: &str) -> HttpResponse {
    HttpResponse::json(
        status,
        json!({ "name": name, "message": message, "status": status }).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Client;

    const BASE: &str = "https://api.example.org";

    fn get_note(id: &str) -> ApiRequest {
        ApiRequest::GetNote { id: id.to_string() }
    }

    #[tokio::test]
    async fn test_mock_replays_in_order() {
        let mut mock = MockTransport::new(
            BASE,
            vec![
                (get_note("a"), notes_response(&[Note::new("a")], None)),
                (get_note("b"), error_response(404, "NotFoundError", "gone")),
            ],
        );
        let mut client = Client::new(BASE);

        let first = mock
            .send(client.encode_request(&get_note("a")).unwrap())
            .await
            .unwrap();
        assert_eq!(first.status, 200);
        assert_eq!(mock.remaining_interactions(), 1);

        let second = mock
            .send(client.encode_request(&get_note("b")).unwrap())
            .await
            .unwrap();
        assert_eq!(second.status, 404);
        assert!(mock.is_complete());
        assert_eq!(mock.sent_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_strict_mismatch() {
        let mut mock = MockTransport::new(
            BASE,
            vec![(get_note("a"), notes_response(&[], None))],
        );
        let request = get_note("zzz").encode(BASE).unwrap();
        assert!(mock.send(request).await.is_err());
    }

    #[tokio::test]
    async fn test_mock_relaxed_mismatch_keeps_expectation() {
        let mut mock = MockTransport::new_relaxed(
            BASE,
            vec![(get_note("a"), notes_response(&[], None))],
        );
        let request = get_note("zzz").encode(BASE).unwrap();
        let response = mock.send(request).await.unwrap();
        assert_eq!(response.status, 500);
        assert_eq!(mock.remaining_interactions(), 1);
    }
}
