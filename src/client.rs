//! Sans-IO review platform client implementation.

use encoding_rs::Encoding;
use serde::Deserialize;

use crate::note::Note;
use crate::request::{ApiRequest, HttpRequest, HttpResponse};
use crate::{Error, Result};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api2.openreview.net";

/// Sans-IO review platform client.
///
/// This client handles request encoding, response decoding and session state
/// without performing any I/O operations. Users must send the encoded
/// [`HttpRequest`]s over a transport and feed the [`HttpResponse`]s back.
pub struct Client {
    base_url: String,
    state: ClientState,
}

#[derive(Debug, Clone, PartialEq)]
enum ClientState {
    /// No credentials; only public notes are visible
    Anonymous,
    /// Login request sent, waiting for the token
    LoggingIn,
    /// Holding a bearer token
    Authenticated { token: String },
}

/// Decoded API responses.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// A single note (reply to `GetNote`)
    Note(Note),

    /// A page of notes (reply to `GetNotes`)
    Notes {
        /// Notes in server order
        notes: Vec<Note>,
        /// Total number of matching notes, if the server reported it
        count: Option<usize>,
    },

    /// Login accepted
    LoggedIn,
}

#[derive(Deserialize)]
struct NotesBody {
    #[serde(default)]
    notes: Vec<Note>,
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Deserialize)]
struct LoginBody {
    token: String,
}

#[derive(Deserialize, Default)]
struct ErrorBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Client {
    /// Create a new anonymous client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            state: ClientState::Anonymous,
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Encode a request for transmission.
    ///
    /// Adds the bearer token once the client is authenticated.
    pub fn encode_request(&mut self, request: &ApiRequest) -> Result<HttpRequest> {
        let mut encoded = request.encode(&self.base_url)?;

        match (&self.state, request) {
            (_, ApiRequest::Login { .. }) => self.state = ClientState::LoggingIn,
            (ClientState::Authenticated { token }, _) => {
                encoded
                    .headers
                    .push(("authorization".to_string(), format!("Bearer {token}")));
            }
            _ => {}
        }

        Ok(encoded)
    }

    /// Decode the response to a previously encoded request.
    pub fn decode_response(
        &mut self,
        request: &ApiRequest,
        response: HttpResponse,
    ) -> Result<ApiResponse> {
        let text = decode_body(&response);

        if !response.is_success() {
            let err = map_error(request, response.status, &text, self.is_authenticated());
            if matches!(request, ApiRequest::Login { .. }) {
                self.state = ClientState::Anonymous;
            }
            return Err(err);
        }

        match request {
            ApiRequest::GetNote { id } => {
                let body: NotesBody = serde_json::from_str(&text)?;
                body.notes
                    .into_iter()
                    .next()
                    .map(ApiResponse::Note)
                    .ok_or_else(|| Error::NotFound(format!("The Note {id} was not found")))
            }
            ApiRequest::GetNotes { .. } => {
                let body: NotesBody = serde_json::from_str(&text)?;
                Ok(ApiResponse::Notes {
                    notes: body.notes,
                    count: body.count,
                })
            }
            ApiRequest::Login { .. } => {
                let body: LoginBody = serde_json::from_str(&text).map_err(|e| {
                    self.state = ClientState::Anonymous;
                    Error::Authentication(format!("Login response carried no token: {e}"))
                })?;
                self.state = ClientState::Authenticated { token: body.token };
                Ok(ApiResponse::LoggedIn)
            }
        }
    }

    /// Get the current client state.
    pub fn state(&self) -> &str {
        match self.state {
            ClientState::Anonymous => "anonymous",
            ClientState::LoggingIn => "logging_in",
            ClientState::Authenticated { .. } => "authenticated",
        }
    }

    /// Check if the client holds a bearer token.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, ClientState::Authenticated { .. })
    }
}

/// Only a rejected login or a rejected bearer token is an authentication
/// error. A 401 on an anonymous session means the note needs a login.
fn map_error(request: &ApiRequest, status: u16, text: &str, authenticated: bool) -> Error {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    let name = body.name.unwrap_or_default();
    let message = body
        .message
        .unwrap_or_else(|| text.chars().take(200).collect());

    if matches!(request, ApiRequest::Login { .. }) {
        return Error::Authentication(message);
    }
    if status == 404 || name == "NotFoundError" {
        return Error::NotFound(message);
    }
    if status == 401 && authenticated {
        return Error::Authentication(message);
    }
    Error::Api {
        status,
        name,
        message,
    }
}

/// Convert a response body to a UTF-8 string.
///
/// Uses the charset from the Content-Type header when one is given.
/// Otherwise tries UTF-8, then a few common legacy encodings, and finally
/// falls back to lossy UTF-8 conversion.
fn decode_body(response: &HttpResponse) -> String {
    let declared = response
        .header("content-type")
        .and_then(charset_label)
        .and_then(|label| Encoding::for_label(label.as_bytes()));

    if let Some(encoding) = declared {
        let (decoded, _, _) = encoding.decode(&response.body);
        return decoded.into_owned();
    }

    if let Ok(text) = std::str::from_utf8(&response.body) {
        return text.to_string();
    }

    let encodings_to_try = [
        encoding_rs::WINDOWS_1252,
        encoding_rs::ISO_8859_15,
        encoding_rs::UTF_16LE,
        encoding_rs::UTF_16BE,
    ];

    for encoding in &encodings_to_try {
        let (decoded, _, had_errors) = encoding.decode(&response.body);
        if !had_errors {
            return decoded.into_owned();
        }
    }

    String::from_utf8_lossy(&response.body).into_owned()
}

fn charset_label(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}
