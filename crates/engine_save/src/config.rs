//! Where save files live.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SaveError;

/// Save location settings.
///
/// The defaults put a world saved as `level1` at `save/level1.sav`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    /// Directory save files are written to and read from.
    pub directory: PathBuf,
    /// File extension, without the leading dot.
    pub extension: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("save"),
            extension: "sav".to_owned(),
        }
    }
}

impl SaveConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Path of the save file for `name`.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.directory.join(format!("{name}.{}", self.extension))
    }

    /// Parse a JSON configuration. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`SaveError::Config`] if `json` is not a valid configuration.
    pub fn from_json_str(json: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// [`SaveError::Io`] if the file cannot be read, [`SaveError::Config`] if
    /// it is not a valid configuration.
    pub fn from_json_file(path: &Path) -> Result<Self, SaveError> {
        let json = std::fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
