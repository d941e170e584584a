use crate::viewport::LayoutConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DATA_DIR_NAME: &str = "data";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerConfig {
    pub source: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct ViewerConfigFile {
    #[serde(default)]
    data_dir: Option<PathBuf>,
    #[serde(default)]
    layout: LayoutConfig,
}

impl ViewerConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => discover_config_path(),
        };
        match path {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let parsed: ViewerConfigFile = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config {}", path.display()))?;

        // Relative data dirs are taken from the config file's own directory.
        let data_dir = parsed.data_dir.map(|dir| {
            if dir.is_relative() {
                path.parent()
                    .map(|parent| parent.join(&dir))
                    .unwrap_or(dir)
            } else {
                dir
            }
        });

        Ok(Self {
            source: Some(path.to_path_buf()),
            data_dir,
            layout: parsed.layout,
        })
    }

    /// Picks the table directory: command line, then config, then a `data`
    /// directory next to the executable, then `./data`.
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(dir) = cli_override {
            return dir.to_path_buf();
        }
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Ok(exe) = std::env::current_exe()
            && let Some(exe_dir) = exe.parent()
        {
            let candidate = exe_dir.join(DATA_DIR_NAME);
            if candidate.is_dir() {
                return candidate;
            }
        }
        PathBuf::from(DATA_DIR_NAME)
    }
}

fn discover_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("STEEL_TABLES_CONFIG")
        && !path.trim().is_empty()
    {
        return Some(PathBuf::from(path));
    }

    let cwd_candidates = [
        PathBuf::from("steel-tables.yaml"),
        PathBuf::from("steel-tables.yml"),
        PathBuf::from(".steel-tables.yaml"),
    ];
    for candidate in cwd_candidates {
        if candidate.exists() {
            return Some(candidate);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user_candidates = [
            PathBuf::from(&home).join(".config/steel-tables/config.yaml"),
            PathBuf::from(&home).join(".config/steel-tables/config.yml"),
        ];
        for candidate in user_candidates {
            if candidate.exists() {
                return Some(candidate);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::ViewerConfig;
    use crate::viewport::LayoutConfig;
    use std::fs;
    use std::path::Path;

    #[test]
    fn partial_layout_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("steel-tables.yaml");
        fs::write(
            &path,
            "data_dir: tables\nlayout:\n  column_width: 14\n  reserved_lines: 8\n",
        )
        .unwrap();

        let config = ViewerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
        assert_eq!(config.data_dir, Some(dir.path().join("tables")));
        assert_eq!(config.layout.column_width, 14);
        assert_eq!(config.layout.reserved_lines, 8);
        assert_eq!(
            config.layout.label_column_width,
            LayoutConfig::default().label_column_width
        );
    }

    #[test]
    fn malformed_config_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "layout: [1, 2").unwrap();

        let error = ViewerConfig::load_from(&path).unwrap_err();
        assert!(format!("{error:#}").contains("failed to parse config"));
    }

    #[test]
    fn cli_data_dir_wins() {
        let config = ViewerConfig {
            data_dir: Some("/from/config".into()),
            ..ViewerConfig::default()
        };
        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/from/cli"))),
            Path::new("/from/cli")
        );
        assert_eq!(config.resolve_data_dir(None), Path::new("/from/config"));
    }
}
