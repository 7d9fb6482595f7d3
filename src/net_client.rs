//! Generic async API client implementation.
//!
//! The [`ApiClient`] struct combines a sans-io [`Client`] for request encoding,
//! response decoding and session state with a [`Transport`] for network I/O.
//! The generic parameter `T` can be any type that implements [`Transport`],
//! such as [`ReqwestTransport`](crate::transport::ReqwestTransport) or
//! [`MockTransport`](crate::mock::MockTransport).
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(feature = "reqwest-transport")]
//! # {
//! use std::time::Duration;
//! use review_thread::net_client::ApiClient;
//! use review_thread::transport::ReqwestTransport;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new(Duration::from_secs(30))?;
//! let mut client = ApiClient::new(transport, "https://api2.openreview.net");
//!
//! let paper = client.get_note("jCPak79Kev").await?;
//! let notes = client.get_all_notes("jCPak79Kev").await?;
//! println!("{} has {} notes", paper.id, notes.len());
//! # Ok(())
//! # }
//! # }
//! ```

use crate::client::ApiResponse;
use crate::note::Note;
use crate::request::ApiRequest;
use crate::transport::Transport;
use crate::{Client, Error, Result};

/// Default number of notes requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Generic async API client that works with any transport implementation.
pub struct ApiClient<T: Transport> {
    /// The sans-io client handling encoding and session state.
    client: Client,
    /// The transport for network I/O.
    transport: T,
    /// Number of notes requested per page by [`ApiClient::get_all_notes`].
    page_size: usize,
}

impl<T: Transport> ApiClient<T> {
    /// Create an anonymous client.
    pub fn new(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(base_url),
            transport,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Set the page size used by [`ApiClient::get_all_notes`].
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Log in with a username and password.
    ///
    /// On success all later requests carry the returned bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] if the credentials are rejected.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let request = ApiRequest::Login {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.send_request(&request).await? {
            ApiResponse::LoggedIn => {
                tracing::info!(username, "logged in");
                Ok(())
            }
            other => Err(unexpected(&request, &other)),
        }
    }

    /// Fetch one note by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such note is visible to this session.
    pub async fn get_note(&mut self, id: &str) -> Result<Note> {
        let request = ApiRequest::GetNote { id: id.to_string() };
        match self.send_request(&request).await? {
            ApiResponse::Note(note) => Ok(note),
            other => Err(unexpected(&request, &other)),
        }
    }

    /// Fetch one page of a forum's notes.
    ///
    /// Returns the notes and the total count, if the server reported one.
    pub async fn get_notes(
        &mut self,
        forum: &str,
        offset: usize,
        limit: usize,
    ) -> Result<(Vec<Note>, Option<usize>)> {
        let request = ApiRequest::GetNotes {
            forum: forum.to_string(),
            offset,
            limit,
        };
        match self.send_request(&request).await? {
            ApiResponse::Notes { notes, count } => Ok((notes, count)),
            other => Err(unexpected(&request, &other)),
        }
    }

    /// Fetch every note in a forum, page by page.
    ///
    /// Stops on a short or empty page, or once the reported count is reached.
    pub async fn get_all_notes(&mut self, forum: &str) -> Result<Vec<Note>> {
        let mut all = Vec::new();
        loop {
            let (page, count) = self.get_notes(forum, all.len(), self.page_size).await?;
            let page_len = page.len();
            all.extend(page);

            tracing::debug!(forum, fetched = all.len(), ?count, "fetched page of notes");

            let reached_count = count.is_some_and(|count| all.len() >= count);
            if page_len < self.page_size || reached_count {
                break;
            }
        }
        Ok(all)
    }

    /// Check if the session holds a bearer token.
    pub fn is_authenticated(&self) -> bool {
        self.client.is_authenticated()
    }

    /// Get a reference to the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Encode a request, send it and decode the response.
    async fn send_request(&mut self, request: &ApiRequest) -> Result<ApiResponse> {
        let encoded = self.client.encode_request(request)?;
        tracing::debug!(method = encoded.method.as_str(), url = %encoded.url, "sending request");

        let response = self.transport.send(encoded).await?;
        tracing::debug!(status = response.status, bytes = response.body.len(), "received response");

        self.client.decode_response(request, response)
    }
}

fn unexpected(request: &ApiRequest, response: &ApiResponse) -> Error {
    Error::Parse(format!(
        "Unexpected response {response:?} to request {request:?}"
    ))
}
