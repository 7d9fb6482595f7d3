//! Transport abstraction layer.
//!
//! This module provides the [`Transport`] trait which abstracts over the HTTP
//! stack used to reach the API. The generic [`ApiClient`](crate::ApiClient)
//! only sees encoded [`HttpRequest`]s and raw [`HttpResponse`]s, so the same
//! client works over `reqwest` in production and over
//! [`MockTransport`](crate::mock::MockTransport) in tests.
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "reqwest-transport")]
//! # {
//! use std::time::Duration;
//! use review_thread::transport::{ReqwestTransport, Transport};
//! use review_thread::request::ApiRequest;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut transport = ReqwestTransport::new(Duration::from_secs(30))?;
//! let request = ApiRequest::GetNote { id: "jCPak79Kev".to_string() }
//!     .encode("https://api2.openreview.net")?;
//! let response = transport.send(request).await?;
//! println!("status {}", response.status);
//! # Ok(())
//! # }
//! # }
//! ```

use async_trait::async_trait;

use crate::error::Result;
use crate::request::{HttpRequest, HttpResponse};

/// A unified trait for sending encoded requests.
///
/// Implementations return any HTTP response, including 4xx and 5xx ones, as
/// `Ok`. Status handling belongs to the sans-io [`Client`](crate::Client).
/// Only failures to obtain a response at all (DNS, TLS, connection resets,
/// timeouts) are reported as [`Error::Transport`](crate::Error::Transport).
#[async_trait]
pub trait Transport: Send {
    /// Send a request and wait for the complete response.
    async fn send(&mut self, request: HttpRequest) -> Result<HttpResponse>;
}

#[cfg(feature = "reqwest-transport")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest-transport")]
mod reqwest_transport {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::Transport;
    use crate::error::{Error, Result};
    use crate::request::{HttpRequest, HttpResponse, Method};

    /// [`Transport`] backed by a [`reqwest::Client`].
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        /// Build a transport with the given request timeout.
        pub fn new(timeout: Duration) -> Result<Self> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .user_agent(concat!("review-thread/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {e}")))?;
            Ok(Self { client })
        }
    }

    #[async_trait]
    impl Transport for ReqwestTransport {
        async fn send(&mut self, request: HttpRequest) -> Result<HttpResponse> {
            let mut builder = match request.method {
                Method::Get => self.client.get(&request.url),
                Method::Post => self.client.post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Error::Transport(format!("{} {}: {e}", request.method.as_str(), request.url)))?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response
                .bytes()
                .await
                .map_err(|e| Error::Transport(format!("Failed to read response body: {e}")))?;

            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }
}
