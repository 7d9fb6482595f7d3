//! Command line entry point.
//!
//! Fetches one forum, prints a short summary of the paper and writes the raw
//! note dump plus the rendered conversation tree. Every failure ends in a
//! printed diagnostic; the process itself always exits normally.

use clap::Parser;

use review_thread::access::{fetch_thread, AccessStrategy, Credentials, FetchedThread, TtyPrompt};
use review_thread::config::Config;
use review_thread::net_client::ApiClient;
use review_thread::report::ThreadReport;
use review_thread::threading::ClassifiedNote;
use review_thread::transport::ReqwestTransport;
use review_thread::{logging, Error, Result};

/// Characters of the abstract shown in the console summary.
const ABSTRACT_PREVIEW_CHARS: usize = 300;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::parse();
    logging::init(config.log_format);

    println!("OpenReview thread report");
    println!("{}", "=".repeat(40));
    println!("Forum link: https://openreview.net/forum?id={}", config.forum);

    let mut login_failed = false;
    match fetch(&config, &mut login_failed).await {
        Ok(thread) => {
            if let Err(err) = report(&config, &thread) {
                println!("Failed to write report: {err}");
            }
        }
        Err(err) => {
            for line in failure_message(&config.forum, &err, login_failed) {
                println!("{line}");
            }
        }
    }
}

/// Final diagnostic for a fetch that did not succeed.
///
/// The credentials hint is only given when an authenticated step really ran
/// and failed.
fn failure_message(forum: &str, err: &Error, login_failed: bool) -> Vec<String> {
    if login_failed {
        vec![
            format!("Authenticated access failed as well: {err}"),
            "Please check your credentials and network connection.".to_string(),
        ]
    } else {
        vec![format!("Failed to fetch forum {forum}: {err}")]
    }
}

fn strategies(config: &Config) -> Vec<AccessStrategy> {
    let mut strategies = vec![AccessStrategy::Anonymous];
    if let Some((username, password)) = config.static_credentials() {
        strategies.push(AccessStrategy::Authenticated(Box::new(Credentials {
            username,
            password,
        })));
    } else if !config.no_prompt {
        strategies.push(AccessStrategy::Authenticated(Box::new(TtyPrompt::new(
            "OpenReview",
        ))));
    }
    strategies
}

async fn fetch(config: &Config, login_failed: &mut bool) -> Result<FetchedThread> {
    println!("Fetching forum {}", config.forum);

    let strategies = strategies(config);
    let has_fallback = strategies.len() > 1;

    fetch_thread(
        &config.forum,
        strategies,
        || {
            let transport = ReqwestTransport::new(config.timeout())?;
            Ok(ApiClient::new(transport, config.base_url.as_str()).with_page_size(config.page_size))
        },
        |strategy, err| {
            if matches!(strategy, AccessStrategy::Authenticated(_)) {
                *login_failed = true;
            }
            println!("{} access failed: {err}", capitalize(strategy.name()));
            if has_fallback && err.is_fetch() && matches!(strategy, AccessStrategy::Anonymous) {
                println!();
                println!("=== Trying authenticated access ===");
            }
        },
    )
    .await
}

fn report(config: &Config, thread: &FetchedThread) -> Result<()> {
    if thread.authenticated {
        println!("✓ Authenticated access succeeded");
    } else {
        println!("✓ Fetched forum without authentication");
    }
    print_summary(thread);

    let report = ThreadReport::new(&thread.notes);
    let unreachable = report.tree().unreachable();
    if !unreachable.is_empty() {
        println!(
            "{} replies have no reachable parent and are left out of the tree",
            unreachable.len()
        );
    }
    if config.strict {
        report.tree().validate()?;
    }

    let files = config.report_files();
    report.write_files(&files)?;
    println!("All note fields saved to {}", files.dump.display());
    println!("Conversation tree saved to {}", files.report.display());
    Ok(())
}

fn print_summary(thread: &FetchedThread) {
    println!();
    println!("=== Paper ===");
    println!("ID: {}", thread.paper.id);

    match ClassifiedNote::from_note(&thread.paper) {
        ClassifiedNote::Paper {
            title,
            authors,
            abstract_text,
        } => {
            println!("Title: {title}");
            println!("Authors: {}", authors.join(", "));
            let preview: String = abstract_text.chars().take(ABSTRACT_PREVIEW_CHARS).collect();
            println!("Abstract: {preview}...");
        }
        other => println!("Root note is a {} rather than a paper", other.kind()),
    }

    println!();
    println!("Found {} notes in the forum", thread.notes.len());
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_only_failure_has_no_credentials_hint() {
        let err = Error::Api {
            status: 401,
            name: "UnauthorizedError".to_string(),
            message: "Login required".to_string(),
        };
        let lines = failure_message("f1", &err, false);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Failed to fetch forum f1"));
    }

    #[test]
    fn test_failed_login_mentions_credentials() {
        let err = Error::Authentication("Invalid username or password".to_string());
        let lines = failure_message("f1", &err, true);
        assert!(lines[0].starts_with("Authenticated access failed as well"));
        assert!(lines[1].contains("credentials"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("anonymous"), "Anonymous");
        assert_eq!(capitalize(""), "");
    }
}
