//! Ordered rendering of a reply tree.
//!
//! The walk is depth-first. Each level has its own ordering rule:
//!
//! - **roots**: papers first in fetch order, then every other root, newest first
//! - **level 1**: decisions and meta-reviews newest first, then all remaining
//!   replies (official reviews included) newest first
//! - **level 2 and deeper**: oldest first, so conversations read in order

use std::cmp::Reverse;
use std::io::{self, Write};

use super::kind::NoteKind;
use super::tree::{ReplyTree, TreeEntry};

/// Title written above the rendered tree.
pub const REPORT_TITLE: &str = "OpenReview Conversation Tree";

/// Maximum number of characters of content shown per entry.
pub const EXCERPT_CHARS: usize = 100;

/// Placeholder for notes without signatures.
const UNKNOWN_SIGNER: &str = "Unknown";

/// Content fields checked for an excerpt on root entries, in priority order.
const ROOT_EXCERPT_FIELDS: &[&str] = &["title", "comment", "review"];

/// Content fields checked for an excerpt on reply entries, in priority order.
const REPLY_EXCERPT_FIELDS: &[&str] = &["title", "comment"];

/// Write the title banner followed by the rendered tree.
pub fn render_report<W: Write>(tree: &ReplyTree<'_>, out: &mut W) -> io::Result<()> {
    writeln!(out, "{REPORT_TITLE}")?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)?;
    render_tree(tree, out)
}

/// Write the rendered tree without a banner.
pub fn render_tree<W: Write>(tree: &ReplyTree<'_>, out: &mut W) -> io::Result<()> {
    for root in order_roots(tree.roots()) {
        write_entry(out, root, 0)?;
        render_replies(tree, tree.replies(&root.note.id), 1, out)?;
    }
    Ok(())
}

fn render_replies<W: Write>(
    tree: &ReplyTree<'_>,
    replies: &[TreeEntry<'_>],
    level: usize,
    out: &mut W,
) -> io::Result<()> {
    for reply in order_replies(replies, level) {
        write_entry(out, reply, level)?;
        render_replies(tree, tree.replies(&reply.note.id), level + 1, out)?;
    }
    Ok(())
}

/// Order root entries: papers first, everything else newest first.
pub fn order_roots<'t, 'a>(roots: &'t [TreeEntry<'a>]) -> Vec<&'t TreeEntry<'a>> {
    let (papers, rest): (Vec<&TreeEntry<'a>>, Vec<&TreeEntry<'a>>) =
        roots.iter().partition(|e| e.kind == NoteKind::Paper);
    let (reviews, others): (Vec<_>, Vec<_>) =
        rest.into_iter().partition(|e: &&TreeEntry<'a>| e.kind == NoteKind::OfficialReview);

    let mut non_papers = others;
    non_papers.extend(reviews);
    newest_first(&mut non_papers);

    let mut ordered = papers;
    ordered.extend(non_papers);
    ordered
}

/// Order the replies found at `level` (1 for direct replies to a root).
pub fn order_replies<'t, 'a>(replies: &'t [TreeEntry<'a>], level: usize) -> Vec<&'t TreeEntry<'a>> {
    if level != 1 {
        let mut ordered: Vec<_> = replies.iter().collect();
        ordered.sort_by_key(|e| e.cdate());
        return ordered;
    }

    let (reviews, others): (Vec<&TreeEntry<'a>>, Vec<&TreeEntry<'a>>) =
        replies.iter().partition(|e| e.kind == NoteKind::OfficialReview);
    let (mut verdicts, mut remaining): (Vec<_>, Vec<_>) =
        others.into_iter().partition(|e: &&TreeEntry<'a>| e.kind.is_verdict());

    newest_first(&mut verdicts);
    newest_first(&mut remaining);
    remaining.extend(reviews);
    newest_first(&mut remaining);

    verdicts.extend(remaining);
    verdicts
}

/// Stable sort, newest first. Missing timestamps go last.
fn newest_first(entries: &mut [&TreeEntry<'_>]) {
    entries.sort_by_key(|e| Reverse(e.cdate()));
}

/// First `EXCERPT_CHARS` characters of the first present excerpt field.
fn excerpt(entry: &TreeEntry<'_>, fields: &[&str]) -> String {
    let Some(content) = entry.note.content() else {
        return String::new();
    };
    fields
        .iter()
        .find(|field| content.contains(field))
        .and_then(|field| content.text(field))
        .map(|text| text.chars().take(EXCERPT_CHARS).collect())
        .unwrap_or_default()
}

fn write_entry<W: Write>(out: &mut W, entry: &TreeEntry<'_>, level: usize) -> io::Result<()> {
    let indent = "  ".repeat(level);
    let signer = entry.note.first_signature().unwrap_or(UNKNOWN_SIGNER);
    let created = entry
        .cdate()
        .map(|t| t.to_string())
        .unwrap_or_else(|| "None".to_string());

    let (marker, pad, fields) = if level == 0 {
        ("", "", ROOT_EXCERPT_FIELDS)
    } else {
        ("↳ ", "  ", REPLY_EXCERPT_FIELDS)
    };

    writeln!(out, "{indent}{marker}[{}] {signer}", entry.kind)?;
    writeln!(out, "{indent}{pad}ID: {}", entry.note.id)?;
    let text = excerpt(entry, fields);
    if !text.is_empty() {
        writeln!(out, "{indent}{pad}Content: {text}...")?;
    }
    writeln!(out, "{indent}{pad}Created: {created}")?;
    writeln!(out)
}
