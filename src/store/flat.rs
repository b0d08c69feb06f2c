//! One YAML file per question in a single directory, rewritten in full on save.

use serde_yaml::{Mapping, Value};
use std::path::Path;

use super::{Locator, QuestionStore, SaveOutcome};
use crate::error::{Result, ReviewError};
use crate::record::{
    QuestionEdits, QuestionRecord, duration_field, flag_field, list_field, text_field,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatStore;

impl FlatStore {
    fn record_from(locator: &Locator, map: &Mapping) -> QuestionRecord {
        let id = locator
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        QuestionRecord {
            id,
            course: text_field(map, "course"),
            part: text_field(map, "part"),
            chapter: text_field(map, "chapter"),
            difficulty: text_field(map, "difficulty"),
            duration: duration_field(map, "duration"),
            author: text_field(map, "author"),
            tags: list_field(map, "tags"),
            question: text_field(map, "question"),
            answer: text_field(map, "answer"),
            wrong_answers: list_field(map, "wrong_answers"),
            explanation: text_field(map, "explanation"),
            reviewed: flag_field(map, "reviewed"),
        }
    }
}

impl QuestionStore for FlatStore {
    fn list_questions(&self, root: &Path) -> Result<Vec<Locator>> {
        let locators = super::read_dir_sorted(root)?
            .into_iter()
            .filter(|path| path.is_file())
            .map(Locator::new)
            .collect();
        super::not_empty(locators, root)
    }

    fn load(&self, locator: &Locator) -> Result<QuestionRecord> {
        let text = super::read_text(&locator.path)?;
        let map = super::parse_mapping(&locator.path, &text)?;
        Ok(Self::record_from(locator, &map))
    }

    fn save(&self, locator: &Locator, edits: &QuestionEdits) -> Result<SaveOutcome> {
        let text = super::read_text(&locator.path)?;
        let mut map = super::parse_mapping(&locator.path, &text)?;

        // existing keys keep their position, unknown keys survive
        let strings = |items: &[String]| {
            Value::Sequence(items.iter().cloned().map(Value::String).collect())
        };
        let fields = [
            ("difficulty", Value::String(edits.difficulty.clone())),
            ("duration", Value::Number(edits.duration.into())),
            ("author", Value::String(edits.author.clone())),
            ("tags", strings(&edits.tags)),
            ("question", Value::String(edits.question.clone())),
            ("answer", Value::String(edits.answer.clone())),
            ("wrong_answers", strings(&edits.wrong_answers)),
            ("explanation", Value::String(edits.explanation.clone())),
            ("reviewed", Value::Bool(edits.reviewed)),
        ];
        for (key, value) in fields {
            map.insert(Value::String(key.to_string()), value);
        }

        let rendered = serde_yaml::to_string(&Value::Mapping(map)).map_err(|e| {
            ReviewError::Parse {
                path: locator.path.clone(),
                message: e.to_string(),
            }
        })?;
        super::write_text(&locator.path, &rendered)?;
        tracing::debug!(path = %locator.path.display(), "question rewritten");

        Ok(SaveOutcome {
            written: vec![locator.path.clone()],
        })
    }
}
