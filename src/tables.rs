use crate::model::PropertyRecord;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const TABLE_SUFFIX: &str = "_PROPS";
const TABLE_EXTENSION: &str = ".json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMatch {
    pub section: String,
    pub table: String,
}

#[derive(Debug, Deserialize)]
struct SectionName {
    #[serde(rename = "Section", default)]
    section: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TableStore {
    data_dir: PathBuf,
}

impl TableStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut tables = self
            .table_files()?
            .into_iter()
            .map(|(name, _)| name)
            .collect::<Vec<_>>();
        tables.sort();
        Ok(tables)
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = self.data_dir.join(table_file_name(name));
        path.is_file().then_some(path)
    }

    pub fn load(&self, path: &Path) -> Result<Vec<PropertyRecord>> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read table {}", path.display()))?;
        let records: Vec<PropertyRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse table {}", path.display()))?;
        debug!("loaded {} sections from {}", records.len(), path.display());
        Ok(records)
    }

    /// Finds sections across every table whose name contains any of the
    /// `+`-separated terms in `query`, ignoring case.
    pub fn find_sections(&self, query: &str) -> Result<Vec<SectionMatch>> {
        let terms = query
            .to_uppercase()
            .split('+')
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty())
            .collect::<Vec<_>>();
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut files = self.table_files()?;
        files.sort();

        let mut matches = Vec::new();
        for (table, path) in files {
            let names = match load_section_names(&path) {
                Ok(names) => names,
                Err(error) => {
                    warn!("skipping table {table}: {error:#}");
                    continue;
                }
            };
            for section in names.into_iter().filter_map(|name| name.section) {
                let upper = section.to_uppercase();
                if terms.iter().any(|term| upper.contains(term.as_str())) {
                    matches.push(SectionMatch {
                        section,
                        table: table.clone(),
                    });
                }
            }
        }
        Ok(matches)
    }

    fn table_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let entries = fs::read_dir(&self.data_dir).with_context(|| {
            format!("failed to read data directory {}", self.data_dir.display())
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("failed to read data directory {}", self.data_dir.display())
            })?;
            let file_name = entry.file_name().to_string_lossy().to_string();
            let Some(stem) = file_name.strip_suffix(TABLE_EXTENSION) else {
                continue;
            };
            let display = stem.strip_suffix(TABLE_SUFFIX).unwrap_or(stem).to_string();
            files.push((display, entry.path()));
        }
        Ok(files)
    }
}

fn load_section_names(path: &Path) -> Result<Vec<SectionName>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read table {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse table {}", path.display()))
}

pub fn table_file_name(name: &str) -> String {
    let mut file_name = name.trim().to_uppercase();
    if let Some(stem) = file_name.strip_suffix(".JSON") {
        file_name = stem.to_string();
    }
    if !file_name.ends_with(TABLE_SUFFIX) {
        file_name.push_str(TABLE_SUFFIX);
    }
    file_name.push_str(TABLE_EXTENSION);
    file_name
}

pub fn table_display_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(TABLE_EXTENSION)
        .unwrap_or(&file_name);
    stem.strip_suffix(TABLE_SUFFIX).unwrap_or(stem).to_string()
}
