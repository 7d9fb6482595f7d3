//! Fetching a forum through an ordered list of access strategies.
//!
//! Some forums are only visible to logged-in users. [`fetch_thread`] tries
//! each [`AccessStrategy`] in turn, typically anonymous access first and then
//! an authenticated session. It returns the first thread that was fetched
//! successfully.

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};
use crate::net_client::ApiClient;
use crate::note::Note;
use crate::transport::Transport;

/// A username and password pair.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    /// Account id or email
    pub username: String,
    /// Account password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A way to obtain credentials for the authenticated step.
pub trait CredentialSource: Send {
    /// Produce credentials, prompting if necessary.
    fn credentials(&mut self) -> Result<Credentials>;
}

/// Identity [`CredentialSource`]
impl CredentialSource for Credentials {
    fn credentials(&mut self) -> Result<Credentials> {
        Ok(self.clone())
    }
}

/// [`CredentialSource`] which prompts on the terminal.
///
/// The username is read from stdin; the password is read without echo.
pub struct TtyPrompt {
    site: String,
}

impl TtyPrompt {
    /// Prompt for an account on the named site.
    pub fn new(site: impl Into<String>) -> Self {
        Self { site: site.into() }
    }
}

impl CredentialSource for TtyPrompt {
    fn credentials(&mut self) -> Result<Credentials> {
        print!("Enter your {} username: ", self.site);
        io::stdout().flush()?;

        let mut username = String::new();
        io::stdin().lock().read_line(&mut username)?;
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(Error::Authentication("No username given".to_string()));
        }

        let password = rpassword::prompt_password(format!("Enter your {} password: ", self.site))?;
        Ok(Credentials { username, password })
    }
}

/// One way of accessing a forum.
pub enum AccessStrategy {
    /// No credentials
    Anonymous,
    /// Log in first, with credentials from the given source
    Authenticated(Box<dyn CredentialSource>),
}

impl AccessStrategy {
    /// Short name for logs and console output.
    pub fn name(&self) -> &'static str {
        match self {
            AccessStrategy::Anonymous => "anonymous",
            AccessStrategy::Authenticated(_) => "authenticated",
        }
    }
}

impl fmt::Debug for AccessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A successfully fetched forum.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedThread {
    /// The forum's root note (normally the paper)
    pub paper: Note,
    /// Every note in the forum, in server order
    pub notes: Vec<Note>,
    /// Whether the authenticated step produced this result
    pub authenticated: bool,
}

/// Try each strategy in order and return the first success.
///
/// `connect` builds a fresh client for every step. `on_failure` is called
/// with each failed step and its error before the next step runs.
///
/// # Errors
///
/// Only fetch errors (see [`Error::is_fetch`]) move on to the next step. Any
/// other error is returned at once. Otherwise returns the error of the last
/// step if every step fails, or [`Error::InvalidRequest`] if `strategies` is
/// empty.
pub async fn fetch_thread<T, C, F>(
    forum: &str,
    strategies: Vec<AccessStrategy>,
    mut connect: C,
    mut on_failure: F,
) -> Result<FetchedThread>
where
    T: Transport,
    C: FnMut() -> Result<ApiClient<T>>,
    F: FnMut(&AccessStrategy, &Error),
{
    let mut last_error = Error::InvalidRequest("No access strategies configured".to_string());

    for mut strategy in strategies {
        tracing::info!(forum, strategy = strategy.name(), "fetching forum");

        match run_step(forum, &mut strategy, &mut connect).await {
            Ok(thread) => return Ok(thread),
            Err(err) => {
                tracing::warn!(forum, strategy = strategy.name(), error = %err, "access failed");
                on_failure(&strategy, &err);
                if !err.is_fetch() {
                    return Err(err);
                }
                last_error = err;
            }
        }
    }

    Err(last_error)
}

async fn run_step<T, C>(
    forum: &str,
    strategy: &mut AccessStrategy,
    connect: &mut C,
) -> Result<FetchedThread>
where
    T: Transport,
    C: FnMut() -> Result<ApiClient<T>>,
{
    let mut client = connect()?;

    if let AccessStrategy::Authenticated(source) = strategy {
        let credentials = source.credentials()?;
        client
            .login(&credentials.username, &credentials.password)
            .await?;
    }

    let paper = client.get_note(forum).await?;
    let notes = client.get_all_notes(forum).await?;
    tracing::info!(forum, notes = notes.len(), "fetched forum");

    Ok(FetchedThread {
        paper,
        notes,
        authenticated: client.is_authenticated(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{error_response, notes_response, token_response, MockTransport};
    use crate::request::ApiRequest;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const BASE: &str = "https://api.example.org";

    fn creds() -> Credentials {
        Credentials {
            username: "user".to_string(),
            password: "pw".to_string(),
        }
    }

    fn login_request() -> ApiRequest {
        ApiRequest::Login {
            username: "user".to_string(),
            password: "pw".to_string(),
        }
    }

    fn get_note() -> ApiRequest {
        ApiRequest::GetNote {
            id: "f1".to_string(),
        }
    }

    fn get_notes() -> ApiRequest {
        ApiRequest::GetNotes {
            forum: "f1".to_string(),
            offset: 0,
            limit: 1000,
        }
    }

    #[tokio::test]
    async fn test_anonymous_success_skips_login() {
        let paper = Note::new("f1");
        let mut mocks = vec![MockTransport::new(
            BASE,
            vec![
                (get_note(), notes_response(&[paper.clone()], None)),
                (get_notes(), notes_response(&[paper.clone()], Some(1))),
            ],
        )];

        let mut failures = Vec::new();
        let thread = fetch_thread(
            "f1",
            vec![
                AccessStrategy::Anonymous,
                AccessStrategy::Authenticated(Box::new(creds())),
            ],
            || Ok(ApiClient::new(mocks.remove(0), BASE)),
            |strategy, _| failures.push(strategy.name()),
        )
        .await
        .unwrap();

        assert_eq!(thread.paper, paper);
        assert_eq!(thread.notes.len(), 1);
        assert!(!thread.authenticated);
        assert!(failures.is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_authenticated() {
        let paper = Note::new("f1");
        let mut mocks = vec![
            MockTransport::new(
                BASE,
                vec![(get_note(), error_response(403, "ForbiddenError", "Forbidden"))],
            ),
            MockTransport::new(
                BASE,
                vec![
                    (login_request(), token_response("tok")),
                    (get_note(), notes_response(&[paper.clone()], None)),
                    (get_notes(), notes_response(&[paper.clone()], None)),
                ],
            ),
        ];

        let mut failures = Vec::new();
        let thread = fetch_thread(
            "f1",
            vec![
                AccessStrategy::Anonymous,
                AccessStrategy::Authenticated(Box::new(creds())),
            ],
            || Ok(ApiClient::new(mocks.remove(0), BASE)),
            |strategy, err| failures.push((strategy.name(), err.clone())),
        )
        .await
        .unwrap();

        assert!(thread.authenticated);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, "anonymous");
        assert!(failures[0].1.is_fetch());
    }

    #[tokio::test]
    async fn test_bad_credentials_end_with_auth_error() {
        let mut mocks = vec![
            MockTransport::new(
                BASE,
                vec![(get_note(), error_response(404, "NotFoundError", "missing"))],
            ),
            MockTransport::new(
                BASE,
                vec![(
                    login_request(),
                    error_response(400, "InvalidParametersError", "Invalid username or password"),
                )],
            ),
        ];

        let err = fetch_thread(
            "f1",
            vec![
                AccessStrategy::Anonymous,
                AccessStrategy::Authenticated(Box::new(creds())),
            ],
            || Ok(ApiClient::new(mocks.remove(0), BASE)),
            |_, _| {},
        )
        .await
        .unwrap_err();

        assert!(err.is_auth());
    }

    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    impl CredentialSource for CountingSource {
        fn credentials(&mut self) -> Result<Credentials> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(creds())
        }
    }

    #[tokio::test]
    async fn test_invalid_request_does_not_ask_for_credentials() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut failures = Vec::new();

        let err = fetch_thread(
            "",
            vec![
                AccessStrategy::Anonymous,
                AccessStrategy::Authenticated(Box::new(CountingSource {
                    calls: calls.clone(),
                })),
            ],
            || Ok(ApiClient::new(MockTransport::new(BASE, vec![]), BASE)),
            |strategy, _| failures.push(strategy.name()),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidRequest(_)));
        assert_eq!(failures, vec!["anonymous"]);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_anonymous_unauthorized_falls_back() {
        let paper = Note::new("f1");
        let mut mocks = vec![
            MockTransport::new(
                BASE,
                vec![(get_note(), error_response(401, "UnauthorizedError", "Login required"))],
            ),
            MockTransport::new(
                BASE,
                vec![
                    (login_request(), token_response("tok")),
                    (get_note(), notes_response(&[paper.clone()], None)),
                    (get_notes(), notes_response(&[paper.clone()], Some(1))),
                ],
            ),
        ];

        let thread = fetch_thread(
            "f1",
            vec![
                AccessStrategy::Anonymous,
                AccessStrategy::Authenticated(Box::new(creds())),
            ],
            || Ok(ApiClient::new(mocks.remove(0), BASE)),
            |_, _| {},
        )
        .await
        .unwrap();

        assert!(thread.authenticated);
    }

    #[tokio::test]
    async fn test_no_strategies() {
        let err = fetch_thread(
            "f1",
            Vec::new(),
            || Ok(ApiClient::new(MockTransport::new(BASE, vec![]), BASE)),
            |_, _| {},
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let debug = format!("{:?}", creds());
        assert!(!debug.contains("pw\""));
        assert!(debug.contains("<redacted>"));
    }
}
