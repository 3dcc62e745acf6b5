//! Highlight persistence
//!
//! All highlights live in one JSON blob under [`HIGHLIGHTS_KEY`]: an object
//! mapping document keys to arrays of flat highlight records. Every save is
//! a read-modify-write of the whole blob. Entries are validated one at a
//! time on load, so a single bad record never hides the rest.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::HighlightError;
use crate::model::{DocumentKey, DocumentText, Highlight, Position, Range};

/// Storage key of the highlight blob
pub const HIGHLIGHTS_KEY: &str = "tint.highlights";

/// Persistence collaborator: a key-value store of JSON blobs
pub trait Storage {
    fn read(&self, key: &str) -> Result<Option<Value>>;
    fn write(&mut self, key: &str, value: Value) -> Result<()>;
}

/// A highlight as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedHighlight {
    pub start_line: usize,
    pub start_character: usize,
    pub end_line: usize,
    pub end_character: usize,
    pub color: String,
}

impl From<&Highlight> for PersistedHighlight {
    fn from(highlight: &Highlight) -> Self {
        let start = highlight.range.start();
        let end = highlight.range.end();
        Self {
            start_line: start.line,
            start_character: start.column,
            end_line: end.line,
            end_character: end.column,
            color: highlight.color.as_str().to_string(),
        }
    }
}

impl PersistedHighlight {
    pub fn start(&self) -> Position {
        Position::new(self.start_line, self.start_character)
    }

    pub fn end(&self) -> Position {
        Position::new(self.end_line, self.end_character)
    }

    /// Rebuild the highlight, checking it fits the current document text
    pub fn to_highlight(&self, text: &dyn DocumentText) -> Result<Highlight, String> {
        let (start, end) = (self.start(), self.end());
        if start >= end {
            return Err(format!("range {}..{} is empty or reversed", start, end));
        }
        if self.color.is_empty() {
            return Err("missing color".to_string());
        }
        for pos in [start, end] {
            if !text.can_represent(pos) {
                return Err(format!(
                    "position {} is outside the document ({} lines)",
                    pos,
                    text.line_count()
                ));
            }
        }
        Ok(Highlight::new(Range::new(start, end), self.color.as_str()))
    }
}

fn read_table(storage: &dyn Storage) -> Result<Map<String, Value>> {
    match storage.read(HIGHLIGHTS_KEY)? {
        None => Ok(Map::new()),
        Some(Value::Object(table)) => Ok(table),
        Some(other) => {
            tracing::warn!(
                "Stored highlights are not an object ({}), starting fresh",
                json_kind(&other)
            );
            Ok(Map::new())
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Read the stored records for one document.
///
/// Records that do not match the schema are reported in the second half of
/// the result and left out of the first.
pub fn load_for(
    storage: &dyn Storage,
    key: &DocumentKey,
) -> Result<(Vec<PersistedHighlight>, Vec<HighlightError>)> {
    let mut table = read_table(storage)?;
    let Some(entries) = table.remove(key.as_str()) else {
        return Ok((Vec::new(), Vec::new()));
    };
    let entries = match entries {
        Value::Array(entries) => entries,
        other => {
            let error = HighlightError::CorruptPersistedEntry {
                key: key.to_string(),
                index: 0,
                reason: format!("expected an array, found {}", json_kind(&other)),
            };
            return Ok((Vec::new(), vec![error]));
        }
    };

    let mut loaded = Vec::with_capacity(entries.len());
    let mut skipped = Vec::new();
    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<PersistedHighlight>(entry) {
            Ok(record) => loaded.push(record),
            Err(e) => skipped.push(HighlightError::CorruptPersistedEntry {
                key: key.to_string(),
                index,
                reason: e.to_string(),
            }),
        }
    }
    Ok((loaded, skipped))
}

/// Write the highlights of one document, removing its entry when empty
pub fn save_for(
    storage: &mut dyn Storage,
    key: &DocumentKey,
    highlights: &[Highlight],
) -> Result<()> {
    let mut table = read_table(storage)?;
    if highlights.is_empty() {
        table.remove(key.as_str());
    } else {
        let records: Vec<PersistedHighlight> = highlights.iter().map(Into::into).collect();
        table.insert(
            key.to_string(),
            serde_json::to_value(records).context("Failed to serialize highlights")?,
        );
    }
    storage.write(HIGHLIGHTS_KEY, Value::Object(table))
}

/// Storage that lives only as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    blobs: HashMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a blob directly (e.g. with hand-written or damaged data)
    pub fn with_blob(mut self, key: &str, value: Value) -> Self {
        self.blobs.insert(key.to_string(), value);
        self
    }

    pub fn blob(&self, key: &str) -> Option<&Value> {
        self.blobs.get(key)
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.blobs.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<()> {
        self.blobs.insert(key.to_string(), value);
        Ok(())
    }
}

/// Storage backed by one pretty-printed JSON file per key
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under `~/.config/tint/state/`
    pub fn in_config_dir() -> Result<Self> {
        let dir = crate::config_paths::state_dir().context("No config directory available")?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let value = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(value))
    }

    fn write(&mut self, key: &str, value: Value) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(key);
        let contents = serde_json::to_string_pretty(&value)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!("Saved {} to {}", key, path.display());
        Ok(())
    }
}
