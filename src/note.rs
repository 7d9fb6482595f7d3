//! Note types as returned by the review platform.
//!
//! A [`Note`] is one message in a forum: the paper itself, a review, a
//! comment, a decision or a meta-review. Its `content` is a map from field
//! name to a wrapper object whose `value` key holds the actual data, e.g.
//! `{"title": {"value": "AnalogGenie"}}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The content mapping of a note.
///
/// Field order is preserved exactly as received so the raw dump can
/// reproduce it. Wrapper objects are kept whole (including keys other than
/// `value`, such as per-field `readers`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Content(Map<String, Value>);

impl Content {
    /// Create an empty content mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, wrapping `value` as `{"value": value}`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        let mut wrapper = Map::new();
        wrapper.insert("value".to_string(), value.into());
        self.0.insert(key.into(), Value::Object(wrapper));
    }

    /// Check whether a field is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Get the underlying value of a field.
    ///
    /// Unwraps the `{"value": ...}` wrapper; a wrapper without `value` has
    /// no value. Fields that are not wrapped (older API versions) are
    /// returned as-is.
    pub fn value(&self, key: &str) -> Option<&Value> {
        match self.0.get(key)? {
            Value::Object(wrapper) => wrapper.get("value"),
            other => Some(other),
        }
    }

    /// Get the underlying value of a field if it is a string.
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// Get the underlying value of a field as text.
    ///
    /// Strings are returned verbatim; any other JSON value is rendered in
    /// its compact JSON form.
    pub fn text(&self, key: &str) -> Option<String> {
        self.value(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Field names in received order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw mapping, wrappers included.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Content {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One message in a forum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Unique note id
    pub id: String,
    /// Id of the forum (thread) this note belongs to
    #[serde(default)]
    pub forum: Option<String>,
    /// Id of the note this one replies to; `None` for root notes
    #[serde(default)]
    pub replyto: Option<String>,
    /// Signer ids, e.g. `ICLR.cc/2025/Conference/Submission1/Reviewer_abcd`
    #[serde(default)]
    pub signatures: Vec<String>,
    /// Groups allowed to read the note
    #[serde(default)]
    pub readers: Vec<String>,
    /// Groups allowed to edit the note
    #[serde(default)]
    pub writers: Vec<String>,
    /// Invitations the note was posted under
    #[serde(default)]
    pub invitations: Vec<String>,
    /// Creation time in milliseconds since the epoch
    #[serde(default)]
    pub cdate: Option<i64>,
    /// Modification time in milliseconds since the epoch
    #[serde(default)]
    pub mdate: Option<i64>,
    /// Content fields
    #[serde(default)]
    pub content: Option<Content>,
}

impl Note {
    /// Create a root note with the given id and nothing else.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            forum: None,
            replyto: None,
            signatures: Vec::new(),
            readers: Vec::new(),
            writers: Vec::new(),
            invitations: Vec::new(),
            cdate: None,
            mdate: None,
            content: None,
        }
    }

    /// Set the parent note id.
    pub fn reply_to(mut self, parent: impl Into<String>) -> Self {
        self.replyto = Some(parent.into());
        self
    }

    /// Set the forum id.
    pub fn in_forum(mut self, forum: impl Into<String>) -> Self {
        self.forum = Some(forum.into());
        self
    }

    /// Add a signature.
    pub fn signed_by(mut self, signature: impl Into<String>) -> Self {
        self.signatures.push(signature.into());
        self
    }

    /// Set the creation time (milliseconds).
    pub fn created_at(mut self, cdate: i64) -> Self {
        self.cdate = Some(cdate);
        self
    }

    /// Add a content field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.content
            .get_or_insert_with(Content::new)
            .insert(key, value);
        self
    }

    /// Check if this note is a reply (has a parent).
    pub fn is_reply(&self) -> bool {
        self.replyto.is_some()
    }

    /// The first signer, if any.
    pub fn first_signature(&self) -> Option<&str> {
        self.signatures.first().map(String::as_str)
    }

    /// Content fields, treating an absent mapping as empty.
    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref().filter(|c| !c.is_empty())
    }
}
