//! File-backed [`HistoryStore`].
//!
//! Each search keeps its history in `<dir>/immo_ads-<key>.json`: a JSON array
//! of listings, newest-first, stored verbatim with 4-space indentation. A
//! missing file and a zero-length file both mean "no history yet".
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so a reader never sees a half-written history.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use immo_ads_core::{HistoryError, HistoryKey, HistoryStore, Listing};

const FILE_PREFIX: &str = "immo_ads-";

/// Returns `<dir>/immo_ads-<key>.<extension>`.
pub fn search_file_path(dir: &Path, key: &HistoryKey, extension: &str) -> PathBuf {
    dir.join(format!("{}{}.{}", FILE_PREFIX, key, extension))
}

/// Stores one JSON file per search under a directory.
pub struct FileHistoryStore {
    dir: PathBuf,
}

impl FileHistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &HistoryKey) -> PathBuf {
        search_file_path(&self.dir, key, "json")
    }
}

fn encode(listings: &[Listing]) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    listings.serialize(&mut ser)?;
    Ok(buf)
}

impl HistoryStore for FileHistoryStore {
    fn load(&self, key: &HistoryKey) -> Result<Vec<Listing>, HistoryError> {
        let path = self.path_for(key);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no history file yet");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(HistoryError::Io {
                    key: key.clone(),
                    action: "read",
                    source,
                })
            }
        };

        if content.is_empty() {
            tracing::debug!(path = %path.display(), "history file is empty");
            return Ok(Vec::new());
        }

        let listings: Vec<Listing> =
            serde_json::from_slice(&content).map_err(|source| HistoryError::Malformed {
                key: key.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), entries = listings.len(), "loaded history");
        Ok(listings)
    }

    fn replace(&self, key: &HistoryKey, listings: &[Listing]) -> Result<(), HistoryError> {
        let path = self.path_for(key);
        let io_err = |source| HistoryError::Io {
            key: key.clone(),
            action: "written",
            source,
        };

        let content = encode(listings).map_err(|source| HistoryError::Encode {
            key: key.clone(),
            source,
        })?;

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;

        tracing::info!(path = %path.display(), entries = listings.len(), "saved history");
        Ok(())
    }
}
