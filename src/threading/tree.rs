//! Reply tree construction.
//!
//! The tree is built from the flat list of notes in a single pass: notes
//! without a parent become roots, every other note is grouped under its
//! parent id. No sorting happens here; ordering is applied at render time.

use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::note::Note;

use super::kind::NoteKind;

/// A note together with its cached classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeEntry<'a> {
    /// The note
    pub note: &'a Note,
    /// Its kind, computed once at build time
    pub kind: NoteKind,
}

impl<'a> TreeEntry<'a> {
    fn new(note: &'a Note) -> Self {
        Self {
            note,
            kind: NoteKind::classify(note),
        }
    }

    /// Creation time used for ordering.
    pub fn cdate(&self) -> Option<i64> {
        self.note.cdate
    }
}

/// The reply structure of one forum.
///
/// Built once per run from the fetched notes and read-only afterwards.
#[derive(Debug, Clone)]
pub struct ReplyTree<'a> {
    roots: Vec<TreeEntry<'a>>,
    replies_by_parent: HashMap<&'a str, Vec<TreeEntry<'a>>>,
    unreachable: Vec<&'a str>,
    duplicates: Vec<&'a str>,
}

impl<'a> ReplyTree<'a> {
    /// Partition notes into roots and replies grouped by parent id.
    ///
    /// Replies whose parent is not among the notes (and replies caught in a
    /// parent cycle) cannot be reached from any root. They are kept out of
    /// the rendered tree and listed by [`ReplyTree::unreachable`]. When an id
    /// occurs more than once, only its first occurrence is used.
    pub fn build(notes: &'a [Note]) -> Self {
        let mut seen: HashSet<&str> = HashSet::with_capacity(notes.len());
        let mut duplicates = Vec::new();
        let mut roots = Vec::new();
        let mut replies_by_parent: HashMap<&str, Vec<TreeEntry<'a>>> = HashMap::new();

        for note in notes {
            if !seen.insert(note.id.as_str()) {
                tracing::warn!(id = %note.id, "duplicate note id, keeping first occurrence");
                duplicates.push(note.id.as_str());
                continue;
            }

            let entry = TreeEntry::new(note);
            match note.replyto.as_deref() {
                None => roots.push(entry),
                Some(parent) => replies_by_parent.entry(parent).or_default().push(entry),
            }
        }

        let mut tree = Self {
            roots,
            replies_by_parent,
            unreachable: Vec::new(),
            duplicates,
        };
        tree.unreachable = tree.find_unreachable(notes);

        for id in &tree.unreachable {
            tracing::warn!(id, "reply is not reachable from any root note and will be skipped");
        }

        tree
    }

    /// Root notes in fetch order.
    pub fn roots(&self) -> &[TreeEntry<'a>] {
        &self.roots
    }

    /// Direct replies to a note, in fetch order.
    pub fn replies(&self, parent_id: &str) -> &[TreeEntry<'a>] {
        self.replies_by_parent
            .get(parent_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Ids of replies no root can reach, in fetch order.
    pub fn unreachable(&self) -> &[&'a str] {
        &self.unreachable
    }

    /// Ids that occurred more than once, one entry per extra occurrence.
    pub fn duplicates(&self) -> &[&'a str] {
        &self.duplicates
    }

    /// Number of notes reachable from the roots.
    pub fn reachable_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&TreeEntry<'a>> = self.roots.iter().collect();
        while let Some(entry) = stack.pop() {
            count += 1;
            stack.extend(self.replies(&entry.note.id));
        }
        count
    }

    /// Check that every note is reachable and every id unique.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structure`] naming the offending ids.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();
        if !self.unreachable.is_empty() {
            problems.push(format!(
                "{} unreachable replies ({})",
                self.unreachable.len(),
                self.unreachable.join(", ")
            ));
        }
        if !self.duplicates.is_empty() {
            problems.push(format!(
                "{} duplicate ids ({})",
                self.duplicates.len(),
                self.duplicates.join(", ")
            ));
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Structure(problems.join("; ")))
        }
    }

    /// Walk down from the roots and report every kept note never visited.
    ///
    /// Iterative traversal, so arbitrarily deep threads cannot overflow the stack.
    fn find_unreachable(&self, notes: &'a [Note]) -> Vec<&'a str> {
        let mut reached: HashSet<&str> = HashSet::with_capacity(notes.len());
        let mut stack: Vec<&str> = self.roots.iter().map(|e| e.note.id.as_str()).collect();

        while let Some(id) = stack.pop() {
            if !reached.insert(id) {
                continue;
            }
            stack.extend(self.replies(id).iter().map(|e| e.note.id.as_str()));
        }

        let mut unreachable = Vec::new();
        let mut listed: HashSet<&str> = HashSet::new();
        for note in notes {
            let id = note.id.as_str();
            if !reached.contains(id) && listed.insert(id) {
                unreachable.push(id);
            }
        }
        unreachable
    }
}
