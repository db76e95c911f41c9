//! Station Directory
//!
//! Code → display-name lookup for observing stations, loaded once at
//! startup from a local JSON file or an HTTP resource and immutable
//! afterwards. Lookup misses fall back to the raw code so an incomplete
//! directory degrades names, never alerting.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur loading the station directory.
#[derive(Debug, Error)]
pub enum StationsError {
    /// Failed to read the directory file
    #[error("Failed to read station directory at {}: {source}", path.display())]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse the JSON mapping
    #[error("Failed to parse station directory: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Failed to fetch the directory over HTTP
    #[error("Failed to fetch station directory: {0}")]
    FetchError(#[from] reqwest::Error),
}

/// Immutable station code → display name mapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StationDirectory {
    names: HashMap<String, String>,
}

impl StationDirectory {
    /// An empty directory: every lookup falls back to the raw code.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a directory from code/name pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            names: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Load the directory from a local JSON file (`{"code": "name", ...}`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON
    /// object of strings.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StationsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| StationsError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let names: HashMap<String, String> = serde_json::from_str(&text)?;
        Ok(Self { names })
    }

    /// Fetch the directory from an HTTP resource, once at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a JSON
    /// object of strings.
    pub async fn fetch(url: &str) -> Result<Self, StationsError> {
        let names: HashMap<String, String> = reqwest::get(url).await?.json().await?;
        Ok(Self { names })
    }

    /// Resolve a station code to its display name, falling back to the
    /// raw code when unknown.
    #[must_use]
    pub fn display_name<'a>(&'a self, code: &'a str) -> &'a str {
        self.names.get(code).map_or(code, String::as_str)
    }

    /// Number of known stations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the directory has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn known_code_resolves_to_name() {
        let dir = StationDirectory::from_pairs([("A1", "Chiba")]);
        assert_eq!(dir.display_name("A1"), "Chiba");
    }

    #[test]
    fn unknown_code_falls_back_to_raw_code() {
        let dir = StationDirectory::from_pairs([("A1", "Chiba")]);
        assert_eq!(dir.display_name("B7"), "B7");
        assert_eq!(StationDirectory::empty().display_name("A1"), "A1");
    }

    #[test]
    fn load_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"A1": "Chiba", "A2": "Saitama"}"#)
            .unwrap();

        let dir = StationDirectory::load(file.path()).unwrap();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.display_name("A2"), "Saitama");
    }

    #[test]
    fn load_missing_file_reports_path() {
        let err = StationDirectory::load("/nonexistent/stations.json").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("/nonexistent/stations.json"), "{msg}");
    }

    #[test]
    fn load_malformed_json_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[1, 2, 3]").unwrap();

        let err = StationDirectory::load(file.path()).unwrap_err();
        assert!(matches!(err, StationsError::ParseError(_)));
    }
}
