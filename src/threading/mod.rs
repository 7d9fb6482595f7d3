//! Reply trees for review forums.
//!
//! This module turns the flat list of notes fetched for a forum into a
//! readable report:
//!
//! - **Classification**: [`NoteKind`] assigns each note a type from the
//!   content fields it carries; [`ClassifiedNote`] exposes the typed fields
//! - **Tree building**: [`ReplyTree`] groups replies under their parents
//! - **Rendering**: [`render_report`] walks the tree with level-specific ordering
//! - **Dumping**: [`write_dump`] writes every field of every note
//!
//! # Example
//!
//! ```
//! use review_thread::note::Note;
//! use review_thread::threading::{render_tree, ReplyTree};
//!
//! let notes = vec![
//!     Note::new("paper")
//!         .with_field("title", "AnalogGenie")
//!         .with_field("authors", serde_json::json!(["Jian Gao"]))
//!         .with_field("abstract", "..."),
//!     Note::new("review").reply_to("paper").created_at(10).with_field("review", "Solid"),
//! ];
//!
//! let tree = ReplyTree::build(&notes);
//! let mut out = Vec::new();
//! render_tree(&tree, &mut out).unwrap();
//!
//! let text = String::from_utf8(out).unwrap();
//! assert!(text.starts_with("[Paper] Unknown\nID: paper\n"));
//! assert!(text.contains("  ↳ [Official Review] Unknown\n"));
//! ```

mod dump;
mod kind;
mod render;
mod tree;

pub use dump::write_dump;
pub use kind::{ClassifiedNote, NoteKind};
pub use render::{
    order_replies, order_roots, render_report, render_tree, EXCERPT_CHARS, REPORT_TITLE,
};
pub use tree::{ReplyTree, TreeEntry};
