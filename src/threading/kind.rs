//! Note classification.

use std::fmt;

use serde_json::Value;

use crate::note::{Content, Note};

/// The semantic type of a note, derived from which content fields it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteKind {
    /// The submission itself (title, authors and abstract)
    Paper,
    /// Final accept/reject decision
    Decision,
    /// Area chair summary of the reviews
    MetaReview,
    /// Reviewer assessment
    OfficialReview,
    /// Comment titled as an author response or rebuttal
    AuthorResponse,
    /// Any other comment
    Comment,
    /// Content present but matching no known schema
    Other,
    /// No content at all
    Unknown,
}

impl NoteKind {
    /// Classify a note by the presence of content keys.
    ///
    /// Rules are tested in a fixed priority order and the first match wins.
    pub fn classify(note: &Note) -> Self {
        let Some(content) = note.content() else {
            return NoteKind::Unknown;
        };

        let has = |key| content.contains(key);

        if has("title") && has("authors") && has("abstract") {
            NoteKind::Paper
        } else if has("decision") {
            NoteKind::Decision
        } else if has("metareview") {
            NoteKind::MetaReview
        } else if has("review") || has("rating") {
            NoteKind::OfficialReview
        } else if has("title") && has("comment") {
            let title = content.str_value("title").unwrap_or_default().to_lowercase();
            if title.contains("author") || title.contains("response") {
                NoteKind::AuthorResponse
            } else {
                NoteKind::Comment
            }
        } else if has("comment") {
            NoteKind::Comment
        } else {
            NoteKind::Other
        }
    }

    /// Human-readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            NoteKind::Paper => "Paper",
            NoteKind::Decision => "Decision",
            NoteKind::MetaReview => "Meta Review",
            NoteKind::OfficialReview => "Official Review",
            NoteKind::AuthorResponse => "Author Response",
            NoteKind::Comment => "Comment",
            NoteKind::Other => "Other",
            NoteKind::Unknown => "Unknown",
        }
    }

    /// Decisions and meta-reviews lead the first reply level.
    pub fn is_verdict(&self) -> bool {
        matches!(self, NoteKind::Decision | NoteKind::MetaReview)
    }
}

impl fmt::Display for NoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A note viewed through its content schema.
///
/// Produced once from the raw key-presence checks so callers can read typed
/// fields without repeating ad-hoc lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedNote<'a> {
    /// A submission
    Paper {
        /// Paper title
        title: &'a str,
        /// Author names
        authors: Vec<&'a str>,
        /// Abstract text
        abstract_text: &'a str,
    },
    /// A decision
    Decision {
        /// Decision value, e.g. `Accept (Poster)`
        decision: Option<&'a str>,
    },
    /// A meta-review
    MetaReview {
        /// Meta-review text
        metareview: Option<&'a str>,
    },
    /// An official review
    OfficialReview {
        /// Review text, if the venue uses a single `review` field
        review: Option<&'a str>,
        /// Rating value in whatever form the venue uses
        rating: Option<&'a Value>,
    },
    /// An author response
    AuthorResponse {
        /// Response title
        title: &'a str,
        /// Response body
        comment: Option<&'a str>,
    },
    /// A comment
    Comment {
        /// Optional comment title
        title: Option<&'a str>,
        /// Comment body
        comment: Option<&'a str>,
    },
    /// Content that matches no known schema
    Other,
    /// No content
    Unknown,
}

impl<'a> ClassifiedNote<'a> {
    /// View a note through its schema.
    pub fn from_note(note: &'a Note) -> Self {
        let kind = NoteKind::classify(note);
        let Some(content) = note.content() else {
            return ClassifiedNote::Unknown;
        };
        let text = |key| content.str_value(key);

        match kind {
            NoteKind::Paper => ClassifiedNote::Paper {
                title: text("title").unwrap_or_default(),
                authors: string_list(content, "authors"),
                abstract_text: text("abstract").unwrap_or_default(),
            },
            NoteKind::Decision => ClassifiedNote::Decision {
                decision: text("decision"),
            },
            NoteKind::MetaReview => ClassifiedNote::MetaReview {
                metareview: text("metareview"),
            },
            NoteKind::OfficialReview => ClassifiedNote::OfficialReview {
                review: text("review"),
                rating: content.value("rating"),
            },
            NoteKind::AuthorResponse => ClassifiedNote::AuthorResponse {
                title: text("title").unwrap_or_default(),
                comment: text("comment"),
            },
            NoteKind::Comment => ClassifiedNote::Comment {
                title: text("title"),
                comment: text("comment"),
            },
            NoteKind::Other => ClassifiedNote::Other,
            NoteKind::Unknown => ClassifiedNote::Unknown,
        }
    }

    /// The kind this schema corresponds to.
    pub fn kind(&self) -> NoteKind {
        match self {
            ClassifiedNote::Paper { .. } => NoteKind::Paper,
            ClassifiedNote::Decision { .. } => NoteKind::Decision,
            ClassifiedNote::MetaReview { .. } => NoteKind::MetaReview,
            ClassifiedNote::OfficialReview { .. } => NoteKind::OfficialReview,
            ClassifiedNote::AuthorResponse { .. } => NoteKind::AuthorResponse,
            ClassifiedNote::Comment { .. } => NoteKind::Comment,
            ClassifiedNote::Other => NoteKind::Other,
            ClassifiedNote::Unknown => NoteKind::Unknown,
        }
    }
}

fn string_list<'a>(content: &'a Content, key: &str) -> Vec<&'a str> {
    match content.value(key) {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        Some(Value::String(s)) => vec![s.as_str()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn note_with(fields: &[(&str, Value)]) -> Note {
        fields
            .iter()
            .fold(Note::new("n"), |note, (key, value)| {
                note.with_field(*key, value.clone())
            })
    }

    #[test]
    fn test_missing_or_empty_content_is_unknown() {
        assert_eq!(NoteKind::classify(&Note::new("n")), NoteKind::Unknown);

        let mut empty = Note::new("n");
        empty.content = Some(Content::new());
        assert_eq!(NoteKind::classify(&empty), NoteKind::Unknown);
    }

    #[test]
    fn test_paper_wins_over_other_fields() {
        let note = note_with(&[
            ("title", json!("AnalogGenie")),
            ("authors", json!(["A", "B"])),
            ("abstract", json!("We ...")),
            ("decision", json!("Accept")),
            ("review", json!("...")),
            ("comment", json!("...")),
        ]);
        assert_eq!(NoteKind::classify(&note), NoteKind::Paper);
    }

    #[test]
    fn test_priority_order() {
        let decision = note_with(&[("decision", json!("Accept")), ("metareview", json!("x"))]);
        assert_eq!(NoteKind::classify(&decision), NoteKind::Decision);

        let meta = note_with(&[("metareview", json!("x")), ("rating", json!(6))]);
        assert_eq!(NoteKind::classify(&meta), NoteKind::MetaReview);

        let rating_only = note_with(&[("rating", json!("6: marginally above"))]);
        assert_eq!(NoteKind::classify(&rating_only), NoteKind::OfficialReview);

        let review = note_with(&[("review", json!("text")), ("comment", json!("c"))]);
        assert_eq!(NoteKind::classify(&review), NoteKind::OfficialReview);
    }

    #[test]
    fn test_titled_comments() {
        let response = note_with(&[
            ("title", json!("Response to Reviewer abcd")),
            ("comment", json!("Thanks")),
        ]);
        assert_eq!(NoteKind::classify(&response), NoteKind::AuthorResponse);

        let authors = note_with(&[
            ("title", json!("General reply by AUTHORS")),
            ("comment", json!("Thanks")),
        ]);
        assert_eq!(NoteKind::classify(&authors), NoteKind::AuthorResponse);

        let plain = note_with(&[("title", json!("Question")), ("comment", json!("Why?"))]);
        assert_eq!(NoteKind::classify(&plain), NoteKind::Comment);

        let non_string_title = note_with(&[("title", json!(42)), ("comment", json!("Why?"))]);
        assert_eq!(NoteKind::classify(&non_string_title), NoteKind::Comment);
    }

    #[test]
    fn test_comment_and_other() {
        let comment = note_with(&[("comment", json!("Nice"))]);
        assert_eq!(NoteKind::classify(&comment), NoteKind::Comment);

        let title_only = note_with(&[("title", json!("Withdrawal"))]);
        assert_eq!(NoteKind::classify(&title_only), NoteKind::Other);
    }

    #[test]
    fn test_labels() {
        assert_eq!(NoteKind::MetaReview.to_string(), "Meta Review");
        assert_eq!(NoteKind::OfficialReview.label(), "Official Review");
        assert_eq!(NoteKind::AuthorResponse.label(), "Author Response");
        assert!(NoteKind::Decision.is_verdict());
        assert!(!NoteKind::OfficialReview.is_verdict());
    }

    #[test]
    fn test_classified_paper_fields() {
        let note = note_with(&[
            ("title", json!("AnalogGenie")),
            ("authors", json!(["Jian Gao", "Weidong Cao"])),
            ("abstract", json!("The design of analog circuits")),
        ]);
        let classified = ClassifiedNote::from_note(&note);
        assert_eq!(classified.kind(), NoteKind::Paper);
        assert_eq!(
            classified,
            ClassifiedNote::Paper {
                title: "AnalogGenie",
                authors: vec!["Jian Gao", "Weidong Cao"],
                abstract_text: "The design of analog circuits",
            }
        );
    }

    #[test]
    fn test_classified_review_rating() {
        let note = note_with(&[("rating", json!(8)), ("summary", json!("good"))]);
        match ClassifiedNote::from_note(&note) {
            ClassifiedNote::OfficialReview { review, rating } => {
                assert_eq!(review, None);
                assert_eq!(rating, Some(&json!(8)));
            }
            other => panic!("Expected review, got {other:?}"),
        }
    }

    #[test]
    fn test_classified_kind_matches_classifier() {
        let notes = [
            Note::new("u"),
            note_with(&[("decision", json!("Reject"))]),
            note_with(&[("metareview", json!("m"))]),
            note_with(&[("title", json!("Author response")), ("comment", json!("c"))]),
            note_with(&[("comment", json!("c"))]),
            note_with(&[("pdf", json!("/pdf/x.pdf"))]),
        ];
        for note in &notes {
            assert_eq!(ClassifiedNote::from_note(note).kind(), NoteKind::classify(note));
        }
    }
}
