//! Raw dump of note fields.
//!
//! Writes one block per note in fetch order. List fields and the content
//! mapping are written as compact JSON, untruncated, so each block can be
//! parsed back into the original values.

use std::io::{self, Write};

use serde_json::Value;

use crate::note::Note;

/// Write every note as a dump block.
pub fn write_dump<W: Write>(notes: &[Note], out: &mut W) -> io::Result<()> {
    for (i, note) in notes.iter().enumerate() {
        write_block(out, i + 1, note)?;
    }
    Ok(())
}

fn write_block<W: Write>(out: &mut W, number: usize, note: &Note) -> io::Result<()> {
    writeln!(out, "=== Note {number} ===")?;
    writeln!(out, "ID: {}", note.id)?;
    writeln!(out, "Forum: {}", or_none(note.forum.as_deref()))?;
    writeln!(out, "ReplyTo: {}", or_none(note.replyto.as_deref()))?;
    writeln!(out, "Signatures: {}", json_list(&note.signatures))?;
    writeln!(out, "Readers: {}", json_list(&note.readers))?;
    writeln!(out, "Writers: {}", json_list(&note.writers))?;
    writeln!(out, "Invitations: {}", json_list(&note.invitations))?;
    writeln!(out, "CDate: {}", or_none(note.cdate))?;
    writeln!(out, "MDate: {}", or_none(note.mdate))?;

    // An empty mapping has no keys line but still dumps as `{}`.
    match note.content() {
        Some(content) => {
            let keys: Vec<&str> = content.keys().collect();
            writeln!(out, "Content Keys: {}", serde_json::to_string(&keys)?)?;
        }
        None => writeln!(out, "Content Keys: None")?,
    }
    match &note.content {
        Some(content) => writeln!(out, "Content: {}", serde_json::to_string(content)?)?,
        None => writeln!(out, "Content: None")?,
    }

    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(50))?;
    writeln!(out)
}

fn json_list(items: &[String]) -> Value {
    Value::from(items.to_vec())
}

fn or_none<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "None".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::Content;
    use serde_json::json;

    fn dump(notes: &[Note]) -> String {
        let mut out = Vec::new();
        write_dump(notes, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_block_format() {
        let mut note = Note::new("r1")
            .in_forum("p1")
            .reply_to("p1")
            .signed_by("Conf/Reviewer_x")
            .created_at(10)
            .with_field("rating", 6);
        note.readers = vec!["everyone".to_string()];
        note.mdate = Some(20);

        let expected = "\
=== Note 1 ===
ID: r1
Forum: p1
ReplyTo: p1
Signatures: [\"Conf/Reviewer_x\"]
Readers: [\"everyone\"]
Writers: []
Invitations: []
CDate: 10
MDate: 20
Content Keys: [\"rating\"]
Content: {\"rating\":{\"value\":6}}

==================================================

";
        assert_eq!(dump(&[note]), expected);
    }

    #[test]
    fn test_missing_fields() {
        let rendered = dump(&[Note::new("bare")]);
        assert!(rendered.contains("Forum: None\n"));
        assert!(rendered.contains("ReplyTo: None\n"));
        assert!(rendered.contains("CDate: None\n"));
        assert!(rendered.contains("Content Keys: None\n"));
        assert!(rendered.contains("Content: None\n"));
    }

    #[test]
    fn test_empty_content_has_no_keys() {
        let mut note = Note::new("e");
        note.content = Some(Content::new());

        let rendered = dump(&[note]);
        assert!(rendered.contains("Content Keys: None\nContent: {}\n"));
    }

    #[test]
    fn test_content_is_lossless() {
        let long = "x".repeat(5000);
        let content: Content = serde_json::from_value(json!({
            "title": {"value": "Reply"},
            "comment": {"value": long, "readers": ["everyone"]},
            "multiline": {"value": "line one\nline two"}
        }))
        .unwrap();
        let mut note = Note::new("c1");
        note.content = Some(content.clone());

        let rendered = dump(&[note]);
        let line = rendered
            .lines()
            .find_map(|l| l.strip_prefix("Content: "))
            .unwrap();
        let parsed: Content = serde_json::from_str(line).unwrap();
        assert_eq!(parsed, content);
        assert_eq!(
            parsed.keys().collect::<Vec<_>>(),
            vec!["title", "comment", "multiline"]
        );
    }

    #[test]
    fn test_one_block_per_note() {
        let notes = vec![Note::new("a"), Note::new("b"), Note::new("a")];
        let rendered = dump(&notes);
        assert_eq!(rendered.matches("=== Note ").count(), 3);
        assert!(rendered.contains("=== Note 3 ===\nID: a\n"));
    }
}
