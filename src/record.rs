use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub const DEFAULT_DURATION: u32 = 15;

/// One question as shown in the review form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRecord {
    pub id: String,
    pub course: String,
    pub part: String,
    pub chapter: String,
    pub difficulty: String,
    pub duration: u32,
    pub author: String,
    pub tags: Vec<String>,
    pub question: String,
    pub answer: String,
    pub wrong_answers: Vec<String>,
    pub explanation: String,
    pub reviewed: bool,
}

impl Default for QuestionRecord {
    fn default() -> Self {
        Self {
            id: String::new(),
            course: String::new(),
            part: String::new(),
            chapter: String::new(),
            difficulty: String::new(),
            duration: DEFAULT_DURATION,
            author: String::new(),
            tags: Vec::new(),
            question: String::new(),
            answer: String::new(),
            wrong_answers: Vec::new(),
            explanation: String::new(),
            reviewed: false,
        }
    }
}

/// The fields a reviewer may change. Identifiers are not editable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionEdits {
    pub difficulty: String,
    pub duration: u32,
    pub author: String,
    pub tags: Vec<String>,
    pub question: String,
    pub answer: String,
    pub wrong_answers: Vec<String>,
    pub explanation: String,
    pub reviewed: bool,
}

impl From<&QuestionRecord> for QuestionEdits {
    fn from(record: &QuestionRecord) -> Self {
        Self {
            difficulty: record.difficulty.clone(),
            duration: record.duration,
            author: record.author.clone(),
            tags: record.tags.clone(),
            question: record.question.clone(),
            answer: record.answer.clone(),
            wrong_answers: record.wrong_answers.clone(),
            explanation: record.explanation.clone(),
            reviewed: record.reviewed,
        }
    }
}

// --- Lenient field extraction ---

pub fn text_field(map: &Mapping, key: &str) -> String {
    map.get(key).and_then(scalar_to_string).unwrap_or_default()
}

pub fn duration_field(map: &Mapping, key: &str) -> u32 {
    let parsed = match map.get(key) {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.filter(|d| *d > 0).unwrap_or(DEFAULT_DURATION)
}

pub fn flag_field(map: &Mapping, key: &str) -> bool {
    match map.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => parse_flag(s),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

pub fn list_field(map: &Mapping, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Sequence(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => scalar_to_string(other).into_iter().collect(),
    }
}

pub fn parse_flag(s: &str) -> bool {
    matches!(s.trim(), "true" | "True" | "TRUE" | "yes" | "Yes" | "on" | "1")
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
