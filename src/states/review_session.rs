use serde::Serialize;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::cursor::Cursor;
use crate::enums::action::Action;
use crate::enums::review_request::ReviewRequest;
use crate::error::{Result, ReviewError};
use crate::record::QuestionRecord;
use crate::store::{CourseStore, FlatStore, Locator, QuestionStore, SaveOutcome};

/// Where the questions live on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    Flat {
        root: PathBuf,
    },
    Courses {
        courses_root: PathBuf,
        course: Option<String>,
    },
}

#[derive(Debug)]
enum Phase {
    Uninitialized,
    Ready {
        locators: Vec<Locator>,
        cursor: Cursor,
    },
    Error(String),
}

/// Everything the page needs to show the current question.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewView {
    pub record: QuestionRecord,
    pub position: usize,
    pub count: usize,
    pub label: String,
    pub labels: Vec<String>,
    pub course: Option<String>,
    pub saved_files: usize,
}

pub struct ReviewSession {
    layout: Layout,
    store: Box<dyn QuestionStore>,
    phase: Phase,
}

impl ReviewSession {
    pub fn new(layout: Layout) -> Self {
        let store: Box<dyn QuestionStore> = match layout {
            Layout::Flat { .. } => Box::new(FlatStore),
            Layout::Courses { .. } => Box::new(CourseStore),
        };
        Self {
            layout,
            store,
            phase: Phase::Uninitialized,
        }
    }

    /// Courses the reviewer can pick from. Always empty for the flat layout.
    pub fn available_courses(&self) -> Result<Vec<String>> {
        match &self.layout {
            Layout::Flat { .. } => Ok(Vec::new()),
            Layout::Courses { courses_root, .. } => CourseStore::list_courses(courses_root),
        }
    }

    /// Switches to `name` and rebuilds the question list from its first entry.
    /// A course without questions is refused and the previous choice stays.
    pub fn select_course(&mut self, name: &str) -> Result<()> {
        let Layout::Courses { courses_root, .. } = &self.layout else {
            return Err(ReviewError::Validation(
                "course selection needs the course layout".to_string(),
            ));
        };
        if !CourseStore::list_courses(courses_root)?.iter().any(|c| c == name) {
            return Err(ReviewError::NotFound(format!("course `{name}`")));
        }
        let root = CourseStore::quiz_root(courses_root, name);
        let locators = self.store.list_questions(&root).inspect_err(|e| {
            tracing::warn!(course = name, error = %e, "course has no reviewable questions");
        })?;

        if let Layout::Courses { course, .. } = &mut self.layout {
            *course = Some(name.to_string());
        }
        tracing::info!(course = name, count = locators.len(), "course selected");
        self.phase = Phase::Ready {
            locators,
            cursor: Cursor::default(),
        };
        Ok(())
    }

    fn root(&self) -> Result<PathBuf> {
        match &self.layout {
            Layout::Flat { root } => Ok(root.clone()),
            Layout::Courses {
                courses_root,
                course: Some(course),
            } => Ok(CourseStore::quiz_root(courses_root, course)),
            Layout::Courses { course: None, .. } => Err(ReviewError::CourseNotSelected),
        }
    }

    fn ensure_ready(&mut self) -> Result<()> {
        if matches!(self.phase, Phase::Ready { .. }) {
            return Ok(());
        }
        if let Phase::Error(previous) = &self.phase {
            tracing::debug!(%previous, "retrying session initialisation");
        }
        match self.root().and_then(|root| self.store.list_questions(&root)) {
            Ok(locators) => {
                tracing::info!(count = locators.len(), "question list ready");
                self.phase = Phase::Ready {
                    locators,
                    cursor: Cursor::default(),
                };
                Ok(())
            }
            Err(ReviewError::CourseNotSelected) => Err(ReviewError::CourseNotSelected),
            Err(e) => {
                tracing::error!(error = %e, "could not initialise review session");
                self.phase = Phase::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Runs one request: save if asked, move the cursor, show the new current
    /// question. The cursor only moves once the target question has loaded,
    /// so a failed request leaves the session where it was.
    pub fn handle(&mut self, request: ReviewRequest) -> Result<ReviewView> {
        self.ensure_ready()?;
        let Phase::Ready { locators, cursor } = &self.phase else {
            return Err(ReviewError::NotFound("question list".to_string()));
        };
        let count = NonZeroUsize::new(locators.len())
            .ok_or_else(|| ReviewError::NotFound("question list is empty".to_string()))?;
        let cursor = *cursor;

        let (target, saved) = match request {
            ReviewRequest::View => (cursor, SaveOutcome::default()),
            ReviewRequest::Submit { action, edits } => {
                let current = &locators[cursor.current()];
                let saved = self.store.save(current, &edits)?;
                tracing::info!(
                    question = %current.label,
                    action = action.marker(),
                    files = saved.written.len(),
                    "question submitted"
                );
                (step(cursor, action, count), saved)
            }
            ReviewRequest::Skip(action) => {
                tracing::info!(action = action.marker(), "moving without saving");
                (step(cursor, action, count), SaveOutcome::default())
            }
        };

        let locator = &locators[target.current()];
        let record = self.store.load(locator)?;
        let view = ReviewView {
            record,
            position: target.current(),
            count: count.get(),
            label: locator.label.clone(),
            labels: locators.iter().map(|l| l.label.clone()).collect(),
            course: match &self.layout {
                Layout::Courses { course, .. } => course.clone(),
                Layout::Flat { .. } => None,
            },
            saved_files: saved.written.len(),
        };

        if let Phase::Ready { cursor, .. } = &mut self.phase {
            *cursor = target;
        }
        Ok(view)
    }
}

fn step(cursor: Cursor, action: Action, count: NonZeroUsize) -> Cursor {
    match action {
        Action::Save => cursor,
        Action::Previous => cursor.previous(count),
        Action::Next => cursor.next(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::QuestionEdits;
    use crate::store::course::{CONTENT_FILE, METADATA_FILE};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_course_question(quiz: &Path, name: &str, tags: &str, reviewed: bool) {
        let dir = quiz.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join(METADATA_FILE),
            format!("id: {name}\nchapterId: 1\ndifficulty: easy\nduration: 10\nauthor: ada\ntags: {tags}\n"),
        )
        .unwrap();
        fs::write(
            dir.join(CONTENT_FILE),
            format!("question: Question {name}\nanswer: A\nwrong_answers: []\nexplanation: E\nreviewed: {reviewed}\n"),
        )
        .unwrap();
    }

    fn two_question_course() -> (TempDir, ReviewSession) {
        let root = TempDir::new().unwrap();
        let quiz = CourseStore::quiz_root(root.path(), "rust");
        write_course_question(&quiz, "001", "[intro]", false);
        write_course_question(&quiz, "002", "[]", true);
        let session = ReviewSession::new(Layout::Courses {
            courses_root: root.path().to_path_buf(),
            course: Some("rust".to_string()),
        });
        (root, session)
    }

    fn position(session: &ReviewSession) -> Option<usize> {
        match &session.phase {
            Phase::Ready { cursor, .. } => Some(cursor.current()),
            _ => None,
        }
    }

    fn submit(action: Action, edits: QuestionEdits) -> ReviewRequest {
        ReviewRequest::Submit { action, edits }
    }

    #[test]
    fn test_next_saves_then_wraps() {
        let (_root, mut session) = two_question_course();
        let first = session.handle(ReviewRequest::View).unwrap();
        assert_eq!(first.position, 0);
        assert_eq!(first.count, 2);
        assert_eq!(first.record.tags, vec!["intro"]);

        let mut edits = QuestionEdits::from(&first.record);
        edits.author = "grace".to_string();
        edits.reviewed = true;
        let second = session.handle(submit(Action::Next, edits)).unwrap();
        assert_eq!(second.position, 1);
        assert_eq!(second.label, "002");
        assert_eq!(second.record.question, "Question 002");
        assert!(second.record.tags.is_empty());
        assert_eq!(second.saved_files, 2);

        let unchanged = QuestionEdits::from(&second.record);
        let wrapped = session.handle(submit(Action::Next, unchanged)).unwrap();
        assert_eq!(wrapped.position, 0);
        assert_eq!(wrapped.saved_files, 0);
        assert_eq!(wrapped.record.author, "grace");
        assert!(wrapped.record.reviewed);
    }

    #[test]
    fn test_previous_from_first_wraps_to_last() {
        let (_root, mut session) = two_question_course();
        let first = session.handle(ReviewRequest::View).unwrap();
        let view = session
            .handle(submit(Action::Previous, QuestionEdits::from(&first.record)))
            .unwrap();
        assert_eq!(view.position, 1);
        assert_eq!(position(&session), Some(1));
    }

    #[test]
    fn test_save_keeps_position() {
        let (_root, mut session) = two_question_course();
        let first = session.handle(ReviewRequest::View).unwrap();
        let mut edits = QuestionEdits::from(&first.record);
        edits.tags.push("ownership".to_string());
        let view = session.handle(submit(Action::Save, edits)).unwrap();
        assert_eq!(view.position, 0);
        assert_eq!(view.record.tags, vec!["intro", "ownership"]);
    }

    #[test]
    fn test_empty_root_fails_with_not_found() {
        let root = TempDir::new().unwrap();
        let mut session = ReviewSession::new(Layout::Flat {
            root: root.path().to_path_buf(),
        });
        assert!(matches!(
            session.handle(ReviewRequest::View),
            Err(ReviewError::NotFound(_))
        ));
        assert!(matches!(session.phase, Phase::Error(_)));
        assert_eq!(position(&session), None);

        // the next request retries once the directory has content
        fs::write(root.path().join("q1.yml"), "question: now there is one\n").unwrap();
        let view = session.handle(ReviewRequest::View).unwrap();
        assert_eq!(view.record.question, "now there is one");
    }

    #[test]
    fn test_failed_load_keeps_cursor() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("a.yml"), "question: fine\n").unwrap();
        fs::write(root.path().join("b.yml"), "question: [broken\n").unwrap();
        let mut session = ReviewSession::new(Layout::Flat {
            root: root.path().to_path_buf(),
        });
        let first = session.handle(ReviewRequest::View).unwrap();

        let result = session.handle(submit(Action::Next, QuestionEdits::from(&first.record)));
        assert!(matches!(result, Err(ReviewError::Parse { .. })));
        assert_eq!(position(&session), Some(0));
        assert!(session.handle(ReviewRequest::View).is_ok());
    }

    #[test]
    fn test_skip_moves_off_broken_question() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("a.yml"), "question: [broken\n").unwrap();
        fs::write(root.path().join("b.yml"), "question: fine\n").unwrap();
        let before = fs::read_to_string(root.path().join("a.yml")).unwrap();
        let mut session = ReviewSession::new(Layout::Flat {
            root: root.path().to_path_buf(),
        });
        assert!(matches!(
            session.handle(ReviewRequest::View),
            Err(ReviewError::Parse { .. })
        ));

        let view = session.handle(ReviewRequest::Skip(Action::Next)).unwrap();
        assert_eq!(view.position, 1);
        assert_eq!(view.record.question, "fine");
        assert_eq!(view.saved_files, 0);
        assert_eq!(
            fs::read_to_string(root.path().join("a.yml")).unwrap(),
            before
        );
    }

    #[test]
    fn test_course_must_be_selected() {
        let (root, _) = two_question_course();
        let mut session = ReviewSession::new(Layout::Courses {
            courses_root: root.path().to_path_buf(),
            course: None,
        });
        assert!(matches!(
            session.handle(ReviewRequest::View),
            Err(ReviewError::CourseNotSelected)
        ));
        assert_eq!(session.available_courses().unwrap(), vec!["rust"]);
        assert!(matches!(
            session.select_course("haskell"),
            Err(ReviewError::NotFound(_))
        ));

        session.select_course("rust").unwrap();
        let view = session.handle(ReviewRequest::View).unwrap();
        assert_eq!(view.course.as_deref(), Some("rust"));
        assert_eq!(view.labels, vec!["001", "002"]);
    }

    #[test]
    fn test_empty_course_keeps_previous_choice() {
        let (root, _) = two_question_course();
        fs::create_dir_all(CourseStore::quiz_root(root.path(), "empty")).unwrap();
        let mut session = ReviewSession::new(Layout::Courses {
            courses_root: root.path().to_path_buf(),
            course: None,
        });

        assert!(matches!(
            session.select_course("empty"),
            Err(ReviewError::NotFound(_))
        ));
        assert!(matches!(
            session.handle(ReviewRequest::View),
            Err(ReviewError::CourseNotSelected)
        ));

        session.select_course("rust").unwrap();
        assert!(session.select_course("empty").is_err());
        let view = session.handle(ReviewRequest::View).unwrap();
        assert_eq!(view.course.as_deref(), Some("rust"));
    }
}
