//! Turns a submitted review form into a [`ReviewRequest`].
//!
//! The body is taken as ordered name/value pairs so repeated `tag` and
//! `wrong_answer` inputs keep the order the reviewer typed them in.

use crate::enums::action::Action;
use crate::enums::review_request::ReviewRequest;
use crate::error::{Result, ReviewError};
use crate::record::{DEFAULT_DURATION, QuestionEdits, parse_flag};

pub type FormPairs = Vec<(String, String)>;

struct Fields<'a> {
    pairs: &'a [(String, String)],
}

impl<'a> Fields<'a> {
    fn first(&self, name: &str) -> Option<&'a str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn required(&self, name: &str) -> Result<String> {
        self.first(name)
            .map(unix_newlines)
            .ok_or_else(|| ReviewError::Validation(format!("missing field `{name}`")))
    }

    /// Every non-blank value submitted under `name`, in order.
    fn all(&self, name: &str) -> Vec<String> {
        self.pairs
            .iter()
            .filter(|(n, v)| n == name && !v.trim().is_empty())
            .map(|(_, v)| unix_newlines(v))
            .collect()
    }

    fn duration(&self) -> Result<u32> {
        match self.first("duration").map(str::trim) {
            None | Some("") => Ok(DEFAULT_DURATION),
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|d| *d > 0)
                .ok_or_else(|| {
                    ReviewError::Validation(format!(
                        "duration must be a positive number of minutes, got `{raw}`"
                    ))
                }),
        }
    }

    fn action(&self) -> Result<Option<Action>> {
        let mut found: Option<Action> = None;
        for (name, value) in self.pairs {
            let Some(action) = Action::from_marker(name) else {
                continue;
            };
            if value.is_empty() {
                continue;
            }
            match found {
                Some(previous) if previous != action => {
                    return Err(ReviewError::Validation(format!(
                        "conflicting actions `{}` and `{}`",
                        previous.marker(),
                        action.marker()
                    )));
                }
                _ => found = Some(action),
            }
        }
        Ok(found)
    }
}

/// Browsers submit textarea line breaks as CRLF; stored text uses `\n`.
fn unix_newlines(value: &str) -> String {
    value.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn parse_submission(pairs: &[(String, String)]) -> Result<ReviewRequest> {
    let fields = Fields { pairs };
    let Some(action) = fields.action()? else {
        return Ok(ReviewRequest::View);
    };

    let edits = QuestionEdits {
        difficulty: fields.required("difficulty")?,
        duration: fields.duration()?,
        author: fields.required("author")?,
        tags: fields.all("tag"),
        question: fields.required("question")?,
        answer: fields.required("answer")?,
        wrong_answers: fields.all("wrong_answer"),
        explanation: fields.required("explanation")?,
        reviewed: fields.first("reviewed").is_some_and(parse_flag),
    };
    Ok(ReviewRequest::Submit { action, edits })
}

/// The error page's buttons carry only an action marker.
pub fn parse_skip(pairs: &[(String, String)]) -> Result<ReviewRequest> {
    Ok(match (Fields { pairs }).action()? {
        Some(action) => ReviewRequest::Skip(action),
        None => ReviewRequest::View,
    })
}
