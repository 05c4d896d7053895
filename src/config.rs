//! Viewer settings, read from an optional TOML file and `SJKVIEW_*` variables.
//!

use std::path::{Path, PathBuf};

use color_eyre::Result;
use config;
use log::*;
use serde::{Deserialize, Serialize};

use crate::table::{SortDirection, SortField};

pub const DEFAULT_FILE: &str = "sjkview.toml";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Thread table rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub theme: ThemeName,
    #[serde(default)]
    pub sort_field: SortField,
    #[serde(default)]
    pub sort_direction: SortDirection,
    /// Reload the dump when it changes on disk.
    #[serde(default = "default_watch")]
    pub watch: bool,
}

fn default_page_size() -> usize {
    30
}

fn default_watch() -> bool {
    true
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            theme: ThemeName::default(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            watch: default_watch(),
        }
    }
}

impl ViewerConfig {
    /// Layer the file (if it exists) and the environment over the defaults.
    pub fn load(file_path: &Path) -> Result<ViewerConfig> {
        if file_path.exists() {
            info!(target: "Config", "Reading {:?}", file_path);
        } else {
            debug!(target: "Config", "No config at {:?}, using defaults", file_path);
        }
        let raw = config::Config::builder()
            .add_source(config::File::from(PathBuf::from(file_path)).required(false))
            .add_source(config::Environment::with_prefix("SJKVIEW"))
            .build()?;
        let mut loaded: ViewerConfig = raw.try_deserialize()?;
        if loaded.page_size == 0 {
            warn!(target: "Config", "page_size must be positive, using {}", default_page_size());
            loaded.page_size = default_page_size();
        }
        Ok(loaded)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_file_gives_defaults() {
        let loaded = ViewerConfig::load(Path::new("/nonexistent/sjkview.toml")).unwrap();
        assert_eq!(loaded, ViewerConfig::default());
        assert_eq!(loaded.page_size, 30);
    }

    #[test]
    fn file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("sjkview-config-{}.toml", std::process::id()));
        fs::write(
            &path,
            "page_size = 10\ntheme = \"light\"\nsort_field = \"name\"\nsort_direction = \"asc\"\n",
        )
        .unwrap();
        let loaded = ViewerConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.page_size, 10);
        assert_eq!(loaded.theme, ThemeName::Light);
        assert_eq!(loaded.sort_field, SortField::Name);
        assert_eq!(loaded.sort_direction, SortDirection::Asc);
        assert!(loaded.watch);
    }

    #[test]
    fn zero_page_size_falls_back() {
        let path = std::env::temp_dir().join(format!("sjkview-zero-{}.toml", std::process::id()));
        fs::write(&path, "page_size = 0\n").unwrap();
        let loaded = ViewerConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.page_size, 30);
    }

    #[test]
    fn renders_as_toml() {
        let text = ViewerConfig::default().to_toml().unwrap();
        assert!(text.contains("page_size = 30"), "{}", text);
        assert!(text.contains("theme = \"dark\""), "{}", text);
        assert!(text.contains("sort_field = \"cpu_usage\""), "{}", text);
    }
}
