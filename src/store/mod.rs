pub mod course;
pub mod emit;
pub mod flat;
pub mod patch;

use serde_yaml::{Mapping, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{Result, ReviewError};
use crate::record::{QuestionEdits, QuestionRecord};

pub use course::CourseStore;
pub use flat::FlatStore;

/// Addresses the backing storage of one question: a file for the flat
/// layout, a directory for the course layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub path: PathBuf,
    pub label: String,
}

impl Locator {
    fn new(path: PathBuf) -> Self {
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, label }
    }
}

/// Files touched by a save. Empty when nothing changed on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    pub written: Vec<PathBuf>,
}

impl SaveOutcome {
    pub fn is_noop(&self) -> bool {
        self.written.is_empty()
    }
}

/// Sole owner of question file I/O.
pub trait QuestionStore: Send {
    /// Ordered locators under `root`. Fails with `NotFound` when the root is
    /// missing or holds no valid entry.
    fn list_questions(&self, root: &Path) -> Result<Vec<Locator>>;

    fn load(&self, locator: &Locator) -> Result<QuestionRecord>;

    fn save(&self, locator: &Locator, edits: &QuestionEdits) -> Result<SaveOutcome>;
}

fn read_dir_sorted(root: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            ReviewError::NotFound(format!("question directory {}", root.display()))
        }
        _ => ReviewError::io(root, e),
    })?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ReviewError::io(root, e))?;
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        if !hidden {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ReviewError::NotFound(format!("question file {}", path.display())),
        _ => ReviewError::io(path, e),
    })
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|e| ReviewError::io(path, e))
}

/// Parses a question file into its top-level mapping. An empty document
/// reads as an empty mapping so every field takes its default.
fn parse_mapping(path: &Path, text: &str) -> Result<Mapping> {
    let value: Value = serde_yaml::from_str(text).map_err(|e| ReviewError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ReviewError::Parse {
            path: path.to_path_buf(),
            message: "top level is not a mapping".to_string(),
        }),
    }
}

fn not_empty(locators: Vec<Locator>, root: &Path) -> Result<Vec<Locator>> {
    if locators.is_empty() {
        Err(ReviewError::NotFound(format!(
            "no questions under {}",
            root.display()
        )))
    } else {
        Ok(locators)
    }
}
