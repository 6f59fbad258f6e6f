//! Persistent CLI defaults.

use std::path::{Path, PathBuf};

use rac_core::util::normalize_text_option;
use rac_core::RecordDraft;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cli-config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    /// Unit preselected for new records
    #[serde(default)]
    pub default_unit: Option<String>,
    /// Duration preselected for new records
    #[serde(default)]
    pub default_duration: Option<String>,
}

const fn default_config_version() -> u32 {
    1
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            default_unit: None,
            default_duration: None,
        }
    }
}

pub fn default_config_path() -> Result<PathBuf, String> {
    dirs::config_dir()
        .map(|dir| dir.join("rac").join(CONFIG_FILE_NAME))
        .ok_or_else(|| "Failed to resolve CLI config directory".to_string())
}

impl CliConfig {
    pub fn load() -> Result<Self, String> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|error| format!("Failed to read config at {}: {}", path.display(), error))?;
        let mut config = serde_json::from_str::<Self>(&raw)
            .map_err(|error| format!("Failed to parse config at {}: {}", path.display(), error))?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, String> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|error| {
                format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    error
                )
            })?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)
            .map_err(|error| format!("Failed to serialize config: {error}"))?;
        std::fs::write(path, serialized)
            .map_err(|error| format!("Failed to write config at {}: {}", path.display(), error))
    }

    /// Overwrite the taxonomy-seeded unit and duration of a fresh draft.
    pub fn apply_defaults(&self, draft: &mut RecordDraft) {
        if let Some(unit) = &self.default_unit {
            draft.unit.clone_from(unit);
        }
        if let Some(duration) = &self.default_duration {
            draft.duration.clone_from(duration);
        }
    }

    fn normalize(&mut self) {
        if self.version == 0 {
            self.version = default_config_version();
        }
        self.default_unit = normalize_text_option(self.default_unit.take());
        self.default_duration = normalize_text_option(self.default_duration.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rac_core::Taxonomy;

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CliConfig::load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(loaded, CliConfig::default());
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn config_roundtrip_trims_and_drops_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = CliConfig {
            version: 1,
            default_unit: Some("  NLC ".to_string()),
            default_duration: Some("   ".to_string()),
        };
        config.save_to_path(&path).unwrap();

        let loaded = CliConfig::load_from_path(&path).unwrap();
        assert_eq!(loaded.default_unit.as_deref(), Some("NLC"));
        assert_eq!(loaded.default_duration, None);
    }

    #[test]
    fn default_config_matches_an_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{}").unwrap();

        assert_eq!(CliConfig::load_from_path(&path).unwrap(), CliConfig::default());
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "{ nope").unwrap();

        let error = CliConfig::load_from_path(&path).unwrap_err();
        assert!(error.starts_with("Failed to parse config"));
    }

    #[test]
    fn apply_defaults_overrides_taxonomy_seed() {
        let mut draft = RecordDraft::new(&Taxonomy::default());
        let config = CliConfig {
            version: 1,
            default_unit: Some("NLC".to_string()),
            default_duration: None,
        };

        config.apply_defaults(&mut draft);
        assert_eq!(draft.unit, "NLC");
        assert_eq!(draft.duration, "Até 5 min");
    }
}
