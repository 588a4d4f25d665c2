//! Prompt catalog: discovery and resolution of instruction documents
//!
//! Instruction texts live in a directory tree of the form
//! `<root>/<level-dir>/<topic>.txt`. Level directories are selectable
//! groupings except for the reserved `System` directory, which holds
//! non-selectable system prompts such as the diagnostic-mode instruction.
//! The catalog is scanned once and is read-only afterwards; sessions never
//! mutate it.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reserved directory name for non-selectable system prompts.
const SYSTEM_DIR: &str = "System";

/// File extension for instruction documents.
const TOPIC_EXTENSION: &str = "txt";

/// Diagnostic-mode instruction, used whenever no level/topic is selected.
const DIAGNOSTIC_FILE: &str = "Diagnostic_Mode.txt";

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The locator does not resolve to an instruction document. Recoverable:
    /// surfaced to the user, never fatal to the process.
    #[error("prompt not found: {0}")]
    NotFound(PathBuf),

    #[error("failed to read prompt {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A selectable topic within a level.
#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    /// Display name: file stem with underscores mapped to spaces.
    pub display_name: String,
    /// Opaque locator resolving to the instruction content.
    pub locator: PathBuf,
}

/// A proficiency level grouping topics.
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    /// Display name: on-disk name with any `prefix_` segment stripped
    /// (e.g. `01_Nivel_A1` becomes `Nivel A1`).
    pub display_name: String,
    pub topics: Vec<Topic>,
}

/// Read-only catalog of available instruction documents.
#[derive(Debug, Clone, Serialize)]
pub struct PromptCatalog {
    pub levels: Vec<Level>,
    #[serde(skip)]
    root: PathBuf,
}

impl PromptCatalog {
    /// Scan `root` and build the catalog.
    ///
    /// A missing root yields an empty catalog rather than an error. Levels
    /// and topics are ordered lexicographically by on-disk name so the
    /// result is deterministic across scans.
    pub fn scan(root: impl Into<PathBuf>) -> Self {
        let root = root.into();

        let mut level_dirs: Vec<(String, PathBuf)> = match std::fs::read_dir(&root) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_dir())
                .map(|e| (e.file_name().to_string_lossy().to_string(), e.path()))
                .filter(|(name, _)| name != SYSTEM_DIR)
                .collect(),
            Err(_) => Vec::new(),
        };
        level_dirs.sort_by(|a, b| a.0.cmp(&b.0));

        let levels = level_dirs
            .into_iter()
            .map(|(dir_name, dir_path)| Level {
                display_name: level_display_name(&dir_name),
                topics: scan_topics(&dir_path),
            })
            .collect();

        Self { levels, root }
    }

    /// Read the instruction document behind `locator` verbatim.
    pub fn resolve(&self, locator: &Path) -> Result<String, CatalogError> {
        if !locator.is_file() {
            return Err(CatalogError::NotFound(locator.to_path_buf()));
        }
        std::fs::read_to_string(locator).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => CatalogError::NotFound(locator.to_path_buf()),
            _ => CatalogError::Io {
                path: locator.to_path_buf(),
                source,
            },
        })
    }

    /// Locator of the diagnostic-mode instruction, the fallback when no
    /// explicit level/topic is selected.
    pub fn diagnostic_locator(&self) -> PathBuf {
        self.root.join(SYSTEM_DIR).join(DIAGNOSTIC_FILE)
    }

    /// Look up a topic locator by level and topic display names.
    pub fn find_topic(&self, level: &str, topic: &str) -> Option<&Topic> {
        self.levels
            .iter()
            .find(|l| l.display_name == level)?
            .topics
            .iter()
            .find(|t| t.display_name == topic)
    }
}

/// Derive a level display name from its on-disk directory name.
///
/// Directory names carry a numeric ordering prefix (`01_Nivel_A1`); the
/// display name is everything after the first underscore, with remaining
/// underscores mapped to spaces. Names without an underscore are used
/// verbatim.
fn level_display_name(dir_name: &str) -> String {
    match dir_name.split_once('_') {
        Some((_, rest)) => rest.replace('_', " "),
        None => dir_name.to_string(),
    }
}

fn scan_topics(level_dir: &Path) -> Vec<Topic> {
    let mut files: Vec<PathBuf> = match std::fs::read_dir(level_dir) {
        Ok(entries) => entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.is_file() && p.extension().is_some_and(|ext| ext == TOPIC_EXTENSION)
            })
            .collect(),
        Err(_) => Vec::new(),
    };
    files.sort();

    files
        .into_iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default();
            Topic {
                display_name: stem.replace('_', " "),
                locator: path,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_prompt(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn sample_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write_prompt(root, "02_Nivel_B1/Viajes_y_Turismo.txt", "brief b1 viajes");
        write_prompt(root, "01_Nivel_A1/Saludos.txt", "brief a1 saludos");
        write_prompt(root, "01_Nivel_A1/Colores_Basicos.txt", "brief a1 colores");
        write_prompt(root, "System/Diagnostic_Mode.txt", "diagnostic brief");
        // Non-topic files are ignored
        write_prompt(root, "01_Nivel_A1/notes.md", "not a topic");
        dir
    }

    #[test]
    fn scan_orders_levels_and_strips_prefixes() {
        let dir = sample_tree();
        let catalog = PromptCatalog::scan(dir.path());

        let names: Vec<&str> = catalog
            .levels
            .iter()
            .map(|l| l.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["Nivel A1", "Nivel B1"]);
    }

    #[test]
    fn scan_excludes_system_directory() {
        let dir = sample_tree();
        let catalog = PromptCatalog::scan(dir.path());
        assert!(catalog.levels.iter().all(|l| l.display_name != "System"));
    }

    #[test]
    fn topics_are_sorted_with_spaces_for_underscores() {
        let dir = sample_tree();
        let catalog = PromptCatalog::scan(dir.path());

        let a1 = &catalog.levels[0];
        let topics: Vec<&str> = a1.topics.iter().map(|t| t.display_name.as_str()).collect();
        assert_eq!(topics, vec!["Colores Basicos", "Saludos"]);
    }

    #[test]
    fn non_txt_files_are_ignored() {
        let dir = sample_tree();
        let catalog = PromptCatalog::scan(dir.path());
        assert!(catalog.levels[0]
            .topics
            .iter()
            .all(|t| t.display_name != "notes"));
    }

    #[test]
    fn missing_root_yields_empty_catalog() {
        let catalog = PromptCatalog::scan("/nonexistent/prompt/tree");
        assert!(catalog.levels.is_empty());
    }

    #[test]
    fn resolve_returns_content_verbatim() {
        let dir = sample_tree();
        let catalog = PromptCatalog::scan(dir.path());
        let topic = catalog.find_topic("Nivel B1", "Viajes y Turismo").unwrap();
        assert_eq!(catalog.resolve(&topic.locator).unwrap(), "brief b1 viajes");
    }

    #[test]
    fn resolve_missing_locator_is_not_found() {
        let dir = sample_tree();
        let catalog = PromptCatalog::scan(dir.path());
        let err = catalog.resolve(Path::new("/nope/missing.txt")).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn diagnostic_locator_points_into_system_dir() {
        let dir = sample_tree();
        let catalog = PromptCatalog::scan(dir.path());
        assert_eq!(
            catalog.resolve(&catalog.diagnostic_locator()).unwrap(),
            "diagnostic brief"
        );
    }

    #[test]
    fn level_without_underscore_is_verbatim() {
        assert_eq!(level_display_name("Avanzado"), "Avanzado");
        assert_eq!(level_display_name("01_Nivel_A1"), "Nivel A1");
    }
}
