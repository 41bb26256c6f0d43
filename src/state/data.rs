/// Shared data structures for the editor state
///
/// These structs represent the data model that flows between
/// the editing session, the submission layer and the UI layer.
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{EditorError, Result};

/// Ceiling for a single pose document (10 MiB)
pub const MAX_POSE_BYTES: u64 = 10 * 1024 * 1024;
/// Ceiling for pose document + replacement image in one upload (10 MiB)
pub const MAX_TOTAL_BYTES: u64 = 10 * 1024 * 1024;
/// Maximum number of tags on a document
pub const MAX_TAGS: usize = 50;

pub const MAX_AUTHOR_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 160;
pub const MAX_VERSION_LEN: usize = 10;

/// The mutable top-level fields of a pose document
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Author,
    Description,
    Version,
    Tags,
    Base64Image,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Author,
        Field::Description,
        Field::Version,
        Field::Tags,
        Field::Base64Image,
    ];

    /// Key used in the document and in the change payload
    pub fn key(&self) -> &'static str {
        match self {
            Field::Author => "Author",
            Field::Description => "Description",
            Field::Version => "Version",
            Field::Tags => "Tags",
            Field::Base64Image => "Base64Image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Original snapshot of a loaded pose document
///
/// Never mutated after load. Edits go to the working copy held by the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub author: String,
    pub description: String,
    pub version: String,
    pub tags: Vec<String>,
    /// Base64 text of the embedded image, `None` when missing, null or empty
    pub embedded_image: Option<String>,
}

impl Document {
    /// Parse a pose document from its JSON text.
    ///
    /// Unknown top-level keys are ignored and a leading byte-order mark is
    /// skipped. Anything that is not a JSON object is rejected with
    /// [`EditorError::Parse`].
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let value: Value = serde_json::from_str(text).map_err(|_| EditorError::Parse)?;
        let object = value.as_object().ok_or(EditorError::Parse)?;

        let tags = match object.get("Tags") {
            Some(Value::Array(items)) => items.iter().map(scalar_text).collect(),
            _ => Vec::new(),
        };

        let embedded_image = match object.get("Base64Image") {
            Some(Value::String(b64)) if !b64.is_empty() => Some(b64.clone()),
            _ => None,
        };

        Ok(Document {
            author: object.get("Author").map(scalar_text).unwrap_or_default(),
            description: object.get("Description").map(scalar_text).unwrap_or_default(),
            version: object.get("Version").map(scalar_text).unwrap_or_default(),
            tags,
            embedded_image,
        })
    }
}

/// Render a JSON value the way a text input would show it
fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The pose document file the user selected
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Filename only (e.g., "ThePose.pose")
    pub name: String,
    /// Size in bytes at selection time
    pub size: u64,
}

impl SelectedFile {
    /// Describe a file on disk, reading its size from metadata
    pub fn from_path(path: &Path) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        Ok(Self {
            path: path.to_path_buf(),
            name: file_name_of(path),
            size,
        })
    }
}

/// A replacement image chosen by the user, uploaded as raw bytes
#[derive(Debug, Clone, PartialEq)]
pub struct StagedImage {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl StagedImage {
    pub fn from_path(path: &Path) -> Result<Self> {
        let size = std::fs::metadata(path)?.len();
        Ok(Self {
            path: path.to_path_buf(),
            name: file_name_of(path),
            size,
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Live length counter shown next to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counter {
    pub current: usize,
    pub max: usize,
}

impl Counter {
    pub fn new(current: usize, max: usize) -> Self {
        Self { current, max }
    }

    pub fn over_limit(&self) -> bool {
        self.current > self.max
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.current, self.max)
    }
}
