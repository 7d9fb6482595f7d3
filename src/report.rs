//! Writing the dump and report files.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::note::Note;
use crate::threading::{render_report, write_dump, ReplyTree};

/// Default file name of the raw dump.
pub const DEFAULT_DUMP_FILE: &str = "openreview_notes_structure.txt";

/// Default file name of the rendered conversation tree.
pub const DEFAULT_REPORT_FILE: &str = "openreview_conversation_tree.txt";

/// Where the two output files go.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFiles {
    /// Raw dump path
    pub dump: PathBuf,
    /// Rendered tree path
    pub report: PathBuf,
}

impl ReportFiles {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            dump: dir.join(DEFAULT_DUMP_FILE),
            report: dir.join(DEFAULT_REPORT_FILE),
        }
    }
}

/// The notes of one forum and their reply tree, ready to be written out.
pub struct ThreadReport<'a> {
    notes: &'a [Note],
    tree: ReplyTree<'a>,
}

impl<'a> ThreadReport<'a> {
    /// Build the reply tree for `notes`.
    pub fn new(notes: &'a [Note]) -> Self {
        Self {
            notes,
            tree: ReplyTree::build(notes),
        }
    }

    /// The reply tree.
    pub fn tree(&self) -> &ReplyTree<'a> {
        &self.tree
    }

    /// The notes in fetch order.
    pub fn notes(&self) -> &'a [Note] {
        self.notes
    }

    /// Render the dump and the report in memory, in that order.
    pub fn render_to_strings(&self) -> Result<(String, String)> {
        let mut dump = Vec::new();
        write_dump(self.notes, &mut dump)?;
        let mut report = Vec::new();
        render_report(&self.tree, &mut report)?;

        Ok((
            String::from_utf8_lossy(&dump).into_owned(),
            String::from_utf8_lossy(&report).into_owned(),
        ))
    }

    /// Create or overwrite both output files.
    pub fn write_files(&self, files: &ReportFiles) -> Result<()> {
        write_file(&files.dump, |out| write_dump(self.notes, out))?;
        tracing::info!(path = %files.dump.display(), notes = self.notes.len(), "wrote note dump");

        write_file(&files.report, |out| render_report(&self.tree, out))?;
        tracing::info!(
            path = %files.report.display(),
            rendered = self.tree.reachable_count(),
            "wrote conversation tree"
        );
        Ok(())
    }
}

/// Open `path`, write through a buffer and flush.
///
/// The handle is closed when this returns, on success and on error alike.
fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    write(&mut out)?;
    out.flush()?;
    Ok(())
}
