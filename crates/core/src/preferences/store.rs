use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;
use tracing::{info, warn};

use crate::preferences::sanitize_lofts;

pub const CURRENT_CLUB_LOFTS_KEY: &str = "current_club_lofts";

#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("invalid preference key `{0}`")]
    InvalidKey(String),
    #[error("could not write preference `{key}`: {source}")]
    Write { key: String, source: io::Error },
    #[error("could not encode preference `{key}`: {source}")]
    Encode { key: String, source: serde_json::Error },
    #[error("preference store lock poisoned")]
    Poisoned,
}

/// Keyed storage for JSON arrays of lofts.
///
/// Reads are best effort: a missing or unreadable value loads as empty.
pub trait PreferenceStore: Send + Sync {
    fn load_lofts(&self, key: &str) -> Vec<f64>;
    fn save_lofts(&self, key: &str, lofts: &[f64]) -> Result<Vec<f64>, PreferenceError>;
}

fn validate_key(key: &str) -> Result<(), PreferenceError> {
    let valid = !key.is_empty()
        && key.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(PreferenceError::InvalidKey(key.to_string()))
    }
}

/// One `<key>.json` file per preference inside a directory.
#[derive(Clone, Debug)]
pub struct JsonFilePreferenceStore {
    directory: PathBuf,
}

impl JsonFilePreferenceStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{key}.json"))
    }
}

impl PreferenceStore for JsonFilePreferenceStore {
    fn load_lofts(&self, key: &str) -> Vec<f64> {
        if validate_key(key).is_err() {
            return Vec::new();
        }
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(error) => {
                warn!(
                    event_name = "preferences.load.failed",
                    path = %path.display(),
                    error = %error,
                    "could not read saved lofts"
                );
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<f64>>(&raw) {
            Ok(lofts) => sanitize_lofts(&lofts),
            Err(error) => {
                warn!(
                    event_name = "preferences.load.malformed",
                    path = %path.display(),
                    error = %error,
                    "ignoring malformed saved lofts"
                );
                Vec::new()
            }
        }
    }

    fn save_lofts(&self, key: &str, lofts: &[f64]) -> Result<Vec<f64>, PreferenceError> {
        validate_key(key)?;
        let lofts = sanitize_lofts(lofts);
        let encoded = serde_json::to_string(&lofts)
            .map_err(|source| PreferenceError::Encode { key: key.to_string(), source })?;

        fs::create_dir_all(&self.directory)
            .and_then(|()| fs::write(self.path_for(key), encoded))
            .map_err(|source| PreferenceError::Write { key: key.to_string(), source })?;

        info!(
            event_name = "preferences.saved",
            key,
            count = lofts.len(),
            "saved club lofts"
        );
        Ok(lofts)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    values: RwLock<HashMap<String, Vec<f64>>>,
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn load_lofts(&self, key: &str) -> Vec<f64> {
        self.values
            .read()
            .ok()
            .and_then(|values| values.get(key).cloned())
            .unwrap_or_default()
    }

    fn save_lofts(&self, key: &str, lofts: &[f64]) -> Result<Vec<f64>, PreferenceError> {
        validate_key(key)?;
        let lofts = sanitize_lofts(lofts);
        self.values
            .write()
            .map_err(|_| PreferenceError::Poisoned)?
            .insert(key.to_string(), lofts.clone());
        Ok(lofts)
    }
}
