use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
    /// Where CSV exports go; `exports/` next to the executable when unset
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default)]
    pub open_after_export: bool,
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            font_scale: default_font_scale(),
            export_dir: None,
            open_after_export: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "qualplan", "qualplan")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    pub fn resolved_export_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.export_dir {
            return Ok(dir.clone());
        }
        let exe_path = std::env::current_exe()
            .context("Failed to get exe path")?;
        let exe_dir = exe_path.parent()
            .context("Failed to get exe directory")?;
        Ok(exe_dir.join("exports"))
    }

    pub fn with_font_scale(&self, scale: f32) -> Self {
        Self {
            font_scale: scale.clamp(0.75, 2.5),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"open_after_export": true}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.open_after_export);
        assert_eq!(config.font_scale, 1.0);
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn saved_config_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            font_scale: 1.25,
            export_dir: Some(dir.path().join("out")),
            open_after_export: true,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn export_dir_override_wins() {
        let config = Config {
            export_dir: Some(PathBuf::from("/tmp/quals")),
            ..Config::default()
        };
        assert_eq!(config.resolved_export_dir().unwrap(), PathBuf::from("/tmp/quals"));
    }

    #[test]
    fn font_scale_is_clamped() {
        assert_eq!(Config::default().with_font_scale(10.0).font_scale, 2.5);
        assert_eq!(Config::default().with_font_scale(0.1).font_scale, 0.75);
    }
}
