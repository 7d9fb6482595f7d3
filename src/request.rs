//! API request types and encoding.

use std::fmt;

use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Error, Result};

/// Characters left unescaped in query values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

/// Requests that can be sent to the review platform API.
#[derive(Clone, PartialEq)]
pub enum ApiRequest {
    /// Fetch a single note by id
    GetNote {
        /// Note id
        id: String,
    },

    /// Fetch one page of the notes in a forum
    GetNotes {
        /// Forum id (the id of the paper note)
        forum: String,
        /// Number of notes to skip
        offset: usize,
        /// Maximum number of notes to return
        limit: usize,
    },

    /// Exchange a username and password for a bearer token
    Login {
        /// Account id or email
        username: String,
        /// Account password
        password: String,
    },
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiRequest::GetNote { id } => f.debug_struct("GetNote").field("id", id).finish(),
            ApiRequest::GetNotes {
                forum,
                offset,
                limit,
            } => f
                .debug_struct("GetNotes")
                .field("forum", forum)
                .field("offset", offset)
                .field("limit", limit)
                .finish(),
            ApiRequest::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// HTTP method of an encoded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

impl Method {
    /// Method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// An encoded HTTP request, independent of any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// Request method
    pub method: Method,
    /// Absolute URL including the query string
    pub url: String,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
    /// JSON body, if any
    pub body: Option<Bytes>,
}

impl HttpRequest {
    /// Look up a header value (case-insensitive name).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A raw HTTP response, independent of any transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// Status code
    pub status: u16,
    /// Header name/value pairs
    pub headers: Vec<(String, String)>,
    /// Raw body bytes
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response with a JSON content type.
    pub fn json(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: vec![(
                "content-type".to_string(),
                "application/json; charset=utf-8".to_string(),
            )],
            body: body.into(),
        }
    }

    /// Look up a header value (case-insensitive name).
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

impl ApiRequest {
    /// Encode the request against the given base URL.
    ///
    /// The returned request carries no credentials; the sans-io
    /// [`Client`](crate::Client) adds the bearer token when it holds one.
    pub fn encode(&self, base_url: &str) -> Result<HttpRequest> {
        let base = base_url.trim_end_matches('/');
        let json_headers = vec![("accept".to_string(), "application/json".to_string())];

        match self {
            ApiRequest::GetNote { id } => {
                validate_parameter("note id", id)?;
                Ok(HttpRequest {
                    method: Method::Get,
                    url: format!("{base}/notes?id={}", encode_value(id)),
                    headers: json_headers,
                    body: None,
                })
            }
            ApiRequest::GetNotes {
                forum,
                offset,
                limit,
            } => {
                validate_parameter("forum id", forum)?;
                if *limit == 0 {
                    return Err(Error::InvalidRequest(
                        "Page limit must be at least 1".to_string(),
                    ));
                }
                Ok(HttpRequest {
                    method: Method::Get,
                    url: format!(
                        "{base}/notes?forum={}&offset={offset}&limit={limit}",
                        encode_value(forum)
                    ),
                    headers: json_headers,
                    body: None,
                })
            }
            ApiRequest::Login { username, password } => {
                validate_parameter("username", username)?;
                let body = serde_json::json!({ "id": username, "password": password });
                let mut headers = json_headers;
                headers.push(("content-type".to_string(), "application/json".to_string()));
                Ok(HttpRequest {
                    method: Method::Post,
                    url: format!("{base}/login"),
                    headers,
                    body: Some(Bytes::from(body.to_string())),
                })
            }
        }
    }
}

fn encode_value(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Validate that a request parameter is usable.
fn validate_parameter(what: &str, param: &str) -> Result<()> {
    if param.trim().is_empty() {
        return Err(Error::InvalidRequest(format!("{what} cannot be empty")));
    }
    if param.contains(['\r', '\n']) {
        return Err(Error::InvalidRequest(format!(
            "{what} cannot contain line breaks"
        )));
    }
    Ok(())
}
