//! # review-thread
//!
//! Fetch a discussion forum (a paper with its reviews, comments, decisions
//! and meta-reviews) from the OpenReview API and render it as a reply tree.
//!
//! ## Design
//!
//! The API client follows the "sans-io" pattern:
//! - **Request codec**: [`request::ApiRequest`] encodes to transport-independent HTTP requests
//! - **Protocol state**: [`Client`] adds credentials and decodes responses into notes
//! - **I/O**: [`transport::Transport`] sends requests; [`ApiClient`] ties the two together
//!
//! On top of that, [`threading`] classifies notes, builds the reply tree and
//! renders it, and [`access`] runs the anonymous-then-authenticated fallback.
//!
//! ## Examples
//!
//! ### Rendering fetched notes
//!
//! ```rust
//! use review_thread::note::Note;
//! use review_thread::report::ThreadReport;
//!
//! let notes = vec![
//!     Note::new("p").with_field("comment", "Top-level comment"),
//!     Note::new("r").reply_to("p").with_field("comment", "A reply"),
//! ];
//! let (dump, report) = ThreadReport::new(&notes).render_to_strings().unwrap();
//! assert!(dump.contains("=== Note 2 ==="));
//! assert!(report.contains("  ↳ [Comment] Unknown"));
//! ```
//!
//! ### Fetching over HTTP
//!
//! ```rust,no_run
//! # #[cfg(feature = "reqwest-transport")]
//! # {
//! use std::time::Duration;
//! use review_thread::ApiClient;
//! use review_thread::transport::ReqwestTransport;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = ReqwestTransport::new(Duration::from_secs(30))?;
//! let mut client = ApiClient::new(transport, review_thread::client::DEFAULT_BASE_URL);
//! let notes = client.get_all_notes("jCPak79Kev").await?;
//! # Ok(())
//! # }
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod access;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod net_client;
pub mod note;
pub mod report;
pub mod request;
pub mod threading;
pub mod transport;

// Mock transport for testing
pub mod mock;

pub use client::Client;
pub use error::{Error, Result};
pub use net_client::ApiClient;
pub use note::Note;
pub use request::ApiRequest;
