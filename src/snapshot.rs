use crate::error::SnapshotError;
use crate::parsers::text;
use crate::results::VehicleRecord;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Text layout of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFormat {
    /// Comma separated with a header row and CRLF line endings
    #[default]
    Csv,
    /// Human readable listing, one vehicle per line
    Listing,
}

impl SnapshotFormat {
    fn header(&self) -> &'static str {
        match self {
            SnapshotFormat::Csv => "location,color,name,sku",
            SnapshotFormat::Listing => "location | color | name | sku",
        }
    }

    fn delimiter(&self) -> (&'static str, char) {
        match self {
            SnapshotFormat::Csv => (",", ','),
            SnapshotFormat::Listing => (" | ", '|'),
        }
    }

    fn line_terminator(&self) -> &'static str {
        match self {
            SnapshotFormat::Csv => "\r\n",
            SnapshotFormat::Listing => "\n",
        }
    }

    /// Attachment file name for this format
    pub fn file_name(&self) -> &'static str {
        match self {
            SnapshotFormat::Csv => "vehicles.csv",
            SnapshotFormat::Listing => "vehicles.txt",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            SnapshotFormat::Csv => "application/csv",
            SnapshotFormat::Listing => "text/plain",
        }
    }

    /// Serializes records into snapshot text.
    ///
    /// The output is a header line followed by one line per record in the
    /// given order, without a trailing line terminator. Equal record
    /// sequences always produce identical text.
    pub fn serialize(&self, records: &[VehicleRecord]) -> String {
        let (delimiter, delimiter_char) = self.delimiter();

        let mut out = String::from(self.header());
        for record in records {
            out.push_str(self.line_terminator());

            let fields = [
                &record.location,
                &record.color,
                &record.name,
                &record.sku,
            ];
            let line = fields
                .iter()
                .map(|field| escape_field(field, delimiter_char))
                .collect::<Vec<_>>()
                .join(delimiter);
            out.push_str(&line);
        }

        out
    }
}

fn escape_field(field: &str, delimiter: char) -> String {
    if text::needs_quoting(field, delimiter) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Whether freshly scraped snapshot text differs from the stored one
pub fn has_changed(new_snapshot: &str, stored_snapshot: &str) -> bool {
    new_snapshot != stored_snapshot
}

/// The single snapshot file plus its pending-notification marker
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the last known snapshot
    pub fn read(&self) -> Result<String, SnapshotError> {
        read_text(&self.path)?.ok_or_else(|| SnapshotError::NotFound(self.path.clone()))
    }

    /// Replace the snapshot with `text` in one step
    pub fn write(&self, text: &str) -> Result<(), SnapshotError> {
        self.stage(text)?.commit()
    }

    /// Write `text` next to the snapshot without replacing it yet.
    ///
    /// Once this succeeds the only step left is a rename, so callers can
    /// check that the snapshot is writable before acting on the change.
    pub fn stage(&self, text: &str) -> Result<StagedSnapshot, SnapshotError> {
        stage_write(&self.path, text)
    }

    /// Remember a snapshot whose notification has not gone out yet
    pub fn mark_pending(&self, text: &str) -> Result<(), SnapshotError> {
        write_atomic(&self.pending_path(), text)
    }

    /// Snapshot still waiting to be delivered, if any
    pub fn pending(&self) -> Result<Option<String>, SnapshotError> {
        read_text(&self.pending_path())
    }

    pub fn clear_pending(&self) -> Result<(), SnapshotError> {
        let path = self.pending_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SnapshotError::Write { path, source }),
        }
    }

    fn pending_path(&self) -> PathBuf {
        sibling(&self.path, ".pending")
    }
}

/// Snapshot text written to a temporary sibling, waiting to replace the target
#[derive(Debug)]
pub struct StagedSnapshot {
    tmp: PathBuf,
    target: PathBuf,
}

impl StagedSnapshot {
    /// Rename the staged file over the target
    pub fn commit(self) -> Result<(), SnapshotError> {
        fs::rename(&self.tmp, &self.target).map_err(|source| SnapshotError::Write {
            path: self.target.clone(),
            source,
        })?;

        ::log::debug!("Replaced {}", self.target.display());
        Ok(())
    }

    /// Remove the staged file, leaving the target untouched
    pub fn discard(self) {
        if let Err(e) = fs::remove_file(&self.tmp) {
            ::log::warn!("Failed to remove {}: {}", self.tmp.display(), e);
        }
    }
}

/// `path` with `suffix` appended to its file name
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("snapshot"));
    name.push(suffix);
    path.with_file_name(name)
}

fn read_text(path: &Path) -> Result<Option<String>, SnapshotError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes to a temporary sibling, then renames over the target
fn write_atomic(path: &Path, text: &str) -> Result<(), SnapshotError> {
    stage_write(path, text)?.commit()
}

/// Creates the parent directory and writes `text` to the `.tmp` sibling
fn stage_write(path: &Path, text: &str) -> Result<StagedSnapshot, SnapshotError> {
    let write_err = |source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp = sibling(path, ".tmp");
    fs::write(&tmp, text).map_err(write_err)?;

    ::log::debug!("Staged {} bytes for {}", text.len(), path.display());
    Ok(StagedSnapshot {
        tmp,
        target: path.to_path_buf(),
    })
}
