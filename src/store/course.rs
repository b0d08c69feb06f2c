//! Course layout: `<courses>/<course>/quizz/<NNN>/{question.yml, en.yml}`.
//!
//! Saves patch only the blocks whose value changed and leave a file alone
//! when none of its fields did.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use super::emit::{FieldValue, field_lines};
use super::{Locator, QuestionStore, SaveOutcome, patch};
use crate::error::{Result, ReviewError};
use crate::record::{
    QuestionEdits, QuestionRecord, duration_field, flag_field, list_field, text_field,
};

pub const QUIZ_DIR: &str = "quizz";
pub const METADATA_FILE: &str = "question.yml";
pub const CONTENT_FILE: &str = "en.yml";

type Changes<'a> = Vec<(&'a str, Vec<String>)>;

#[derive(Debug, Clone, Copy, Default)]
pub struct CourseStore;

impl CourseStore {
    /// Course directory names under `courses_root` that contain a quiz directory.
    pub fn list_courses(courses_root: &Path) -> Result<Vec<String>> {
        let courses = super::read_dir_sorted(courses_root)?
            .into_iter()
            .filter(|path| path.join(QUIZ_DIR).is_dir())
            .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        Ok(courses)
    }

    pub fn quiz_root(courses_root: &Path, course: &str) -> PathBuf {
        courses_root.join(course).join(QUIZ_DIR)
    }

    fn course_of(locator: &Locator) -> String {
        locator
            .path
            .parent()
            .and_then(Path::parent)
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn read(path: &Path) -> Result<Mapping> {
        let text = super::read_text(path)?;
        super::parse_mapping(path, &text)
    }

    /// Patched text for `path`, or `None` when none of its fields changed.
    /// The result must parse to the original mapping with exactly the
    /// changed fields replaced; anything else is refused before writing.
    fn patch_file(path: &Path, changes: &Changes<'_>) -> Result<Option<String>> {
        if changes.is_empty() {
            return Ok(None);
        }
        let text = super::read_text(path)?;
        let mut expected = super::parse_mapping(path, &text)?;
        for (key, lines) in changes {
            let field = super::parse_mapping(path, &lines.join("\n"))?;
            let value = field.get(*key).cloned().unwrap_or(Value::Null);
            expected.insert(Value::String(key.to_string()), value);
        }

        let patched = patch::patch(&text, changes);
        let reread = super::parse_mapping(path, &patched).map_err(|e| ReviewError::Parse {
            path: path.to_path_buf(),
            message: format!("patch would leave an unreadable file: {e}"),
        })?;
        if reread != expected {
            return Err(ReviewError::Parse {
                path: path.to_path_buf(),
                message: "layout not supported by the line patcher, file left unchanged"
                    .to_string(),
            });
        }
        Ok(Some(patched))
    }

    fn write_patched(
        path: &Path,
        patched: Option<String>,
        changes: &Changes<'_>,
        outcome: &mut SaveOutcome,
    ) -> Result<()> {
        let Some(patched) = patched else {
            return Ok(());
        };
        super::write_text(path, &patched)?;
        tracing::debug!(
            path = %path.display(),
            fields = ?changes.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
            "question file patched"
        );
        outcome.written.push(path.to_path_buf());
        Ok(())
    }
}

fn question_number(path: &Path) -> Option<u64> {
    let name = path.file_name()?.to_str()?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    name.parse().ok()
}

fn push_if<'a>(changes: &mut Changes<'a>, changed: bool, key: &'a str, value: FieldValue<'_>) {
    if changed {
        changes.push((key, field_lines(key, &value)));
    }
}

impl QuestionStore for CourseStore {
    fn list_questions(&self, root: &Path) -> Result<Vec<Locator>> {
        let mut numbered: Vec<(u64, PathBuf)> = super::read_dir_sorted(root)?
            .into_iter()
            .filter(|path| path.join(METADATA_FILE).is_file() && path.join(CONTENT_FILE).is_file())
            .filter_map(|path| question_number(&path).map(|n| (n, path)))
            .collect();
        numbered.sort();
        let locators = numbered
            .into_iter()
            .map(|(_, path)| Locator::new(path))
            .collect();
        super::not_empty(locators, root)
    }

    fn load(&self, locator: &Locator) -> Result<QuestionRecord> {
        let meta = Self::read(&locator.path.join(METADATA_FILE))?;
        let content = Self::read(&locator.path.join(CONTENT_FILE))?;

        let mut id = text_field(&meta, "id");
        if id.is_empty() {
            id = locator.label.clone();
        }
        Ok(QuestionRecord {
            id,
            course: Self::course_of(locator),
            part: String::new(),
            chapter: text_field(&meta, "chapterId"),
            difficulty: text_field(&meta, "difficulty"),
            duration: duration_field(&meta, "duration"),
            author: text_field(&meta, "author"),
            tags: list_field(&meta, "tags"),
            question: text_field(&content, "question"),
            answer: text_field(&content, "answer"),
            wrong_answers: list_field(&content, "wrong_answers"),
            explanation: text_field(&content, "explanation"),
            reviewed: flag_field(&content, "reviewed"),
        })
    }

    fn save(&self, locator: &Locator, edits: &QuestionEdits) -> Result<SaveOutcome> {
        let current = QuestionEdits::from(&self.load(locator)?);

        let mut meta = Changes::new();
        push_if(
            &mut meta,
            edits.difficulty != current.difficulty,
            "difficulty",
            FieldValue::Text(&edits.difficulty),
        );
        push_if(
            &mut meta,
            edits.duration != current.duration,
            "duration",
            FieldValue::Integer(edits.duration),
        );
        push_if(
            &mut meta,
            edits.author != current.author,
            "author",
            FieldValue::Text(&edits.author),
        );
        push_if(
            &mut meta,
            edits.tags != current.tags,
            "tags",
            FieldValue::List(&edits.tags),
        );

        let mut content = Changes::new();
        push_if(
            &mut content,
            edits.question != current.question,
            "question",
            FieldValue::Text(&edits.question),
        );
        push_if(
            &mut content,
            edits.answer != current.answer,
            "answer",
            FieldValue::Text(&edits.answer),
        );
        push_if(
            &mut content,
            edits.wrong_answers != current.wrong_answers,
            "wrong_answers",
            FieldValue::List(&edits.wrong_answers),
        );
        push_if(
            &mut content,
            edits.explanation != current.explanation,
            "explanation",
            FieldValue::Wrapped(&edits.explanation),
        );
        push_if(
            &mut content,
            edits.reviewed != current.reviewed,
            "reviewed",
            FieldValue::Flag(edits.reviewed),
        );

        // both files are checked before either is written
        let meta_path = locator.path.join(METADATA_FILE);
        let content_path = locator.path.join(CONTENT_FILE);
        let patched_meta = Self::patch_file(&meta_path, &meta)?;
        let patched_content = Self::patch_file(&content_path, &content)?;

        let mut outcome = SaveOutcome::default();
        Self::write_patched(&meta_path, patched_meta, &meta, &mut outcome)?;
        Self::write_patched(&content_path, patched_content, &content, &mut outcome)?;
        if outcome.is_noop() {
            tracing::debug!(question = %locator.label, "nothing changed, no file written");
        }
        Ok(outcome)
    }
}
