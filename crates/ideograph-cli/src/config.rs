//! Run configuration.
//!
//! Defaults, then an optional JSON file, then command-line flags.
//!
//! ```json
//! { "data_dir": "data", "out_dir": "out", "write_bom": false }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decomposition, replacement and IDS inputs.
    pub data_dir: PathBuf,
    pub unihan_dir: PathBuf,
    pub out_dir: PathBuf,
    pub char_data: String,
    pub replacements: String,
    pub ids: String,
    pub irg_sources: String,
    pub readings: String,
    pub dictionary: String,
    pub variants: String,
    /// Prefix report files with a byte-order mark (never the rewritten data).
    pub write_bom: bool,
    pub log_level: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            unihan_dir: PathBuf::from("./unihan"),
            out_dir: PathBuf::from("./out"),
            char_data: "charData.txt".to_string(),
            replacements: "replaceChars.txt".to_string(),
            ids: "ids.txt".to_string(),
            irg_sources: "Unihan_IRGSources.txt".to_string(),
            readings: "Unihan_Readings.txt".to_string(),
            dictionary: "Unihan_DictionaryLikeData.txt".to_string(),
            variants: "Unihan_Variants.txt".to_string(),
            write_bom: true,
            log_level: "info".to_string(),
        }
    }
}

impl ReportConfig {
    /// Defaults, overlaid by `path` when given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn char_data_path(&self) -> PathBuf {
        self.data_dir.join(&self.char_data)
    }

    pub fn replacements_path(&self) -> PathBuf {
        self.data_dir.join(&self.replacements)
    }

    pub fn ids_path(&self) -> PathBuf {
        self.data_dir.join(&self.ids)
    }

    pub fn irg_path(&self) -> PathBuf {
        self.unihan_dir.join(&self.irg_sources)
    }

    pub fn readings_path(&self) -> PathBuf {
        self.unihan_dir.join(&self.readings)
    }

    pub fn dictionary_path(&self) -> PathBuf {
        self.unihan_dir.join(&self.dictionary)
    }

    pub fn variants_path(&self) -> PathBuf {
        self.unihan_dir.join(&self.variants)
    }
}
