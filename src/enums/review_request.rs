use crate::enums::action::Action;
use crate::record::QuestionEdits;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewRequest {
    /// Plain view: nothing saved, cursor untouched.
    View,

    Submit {
        action: Action,
        edits: QuestionEdits,
    },

    /// Move without saving, e.g. away from a question that fails to load.
    Skip(Action),
}
