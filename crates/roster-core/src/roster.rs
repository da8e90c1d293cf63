//! Roster file model: load a JSON array of player records, write it back unchanged.
//!
//! Records are opaque beyond `player_name` and `player_image`; every other key
//! is kept as read, in file order, and written back verbatim.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

const NAME_KEY: &str = "player_name";
const IMAGE_KEY: &str = "player_image";

/// Fatal roster errors. Each one stops the run.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("{} not found in the directory.", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to parse {}.", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {} in {} has no string player_name.", .index, .path.display())]
    MalformedRecord { path: PathBuf, index: usize },

    #[error("Failed to read {}.", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}.", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One player entry. Serializes back to exactly the object it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerRecord {
    name: String,
    image: Option<String>,
    fields: Map<String, Value>,
}

impl PlayerRecord {
    /// Build from a decoded JSON object. Returns None when `player_name` is absent or not a string.
    pub fn from_object(fields: Map<String, Value>) -> Option<Self> {
        let name = fields.get(NAME_KEY)?.as_str()?.to_string();
        let image = fields
            .get(IMAGE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            name,
            image,
            fields,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Image URL, or None when the field is absent, empty, or not a string.
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_deref().filter(|u| !u.is_empty())
    }

    /// All fields of the record, in file order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl Serialize for PlayerRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

/// Ordered player records for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    records: Vec<PlayerRecord>,
}

impl Roster {
    pub fn new(records: Vec<PlayerRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayerRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a PlayerRecord;
    type IntoIter = std::slice::Iter<'a, PlayerRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<PlayerRecord> for Roster {
    fn from_iter<I: IntoIterator<Item = PlayerRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Decode roster JSON. `path` is only used in error values.
pub fn parse_roster(data: &[u8], path: &Path) -> Result<Roster, RosterError> {
    let objects: Vec<Map<String, Value>> =
        serde_json::from_slice(data).map_err(|source| RosterError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    objects
        .into_iter()
        .enumerate()
        .map(|(index, obj)| {
            PlayerRecord::from_object(obj).ok_or_else(|| RosterError::MalformedRecord {
                path: path.to_path_buf(),
                index,
            })
        })
        .collect()
}

/// Read and decode the roster at `path`.
pub fn load_roster(path: &Path) -> Result<Roster, RosterError> {
    let data = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => RosterError::NotFound {
            path: path.to_path_buf(),
        },
        _ => RosterError::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let roster = parse_roster(&data, path)?;
    tracing::debug!(path = %path.display(), records = roster.len(), "roster loaded");
    Ok(roster)
}

/// Encode as a JSON array with 4-space indentation.
pub fn to_pretty_json<W: Write>(writer: W, records: &[&PlayerRecord]) -> serde_json::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
    records.serialize(&mut ser)
}

/// Write `records` to `path`, truncating any existing file.
/// Not atomic: a failure part-way can leave the file truncated.
pub fn save_roster(path: &Path, records: &[&PlayerRecord]) -> Result<(), RosterError> {
    let write_err = |source: io::Error| RosterError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    to_pretty_json(&mut writer, records).map_err(|e| write_err(e.into()))?;
    writer.flush().map_err(write_err)?;
    tracing::debug!(path = %path.display(), records = records.len(), "roster saved");
    Ok(())
}
