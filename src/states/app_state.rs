use crate::states::review_session::ReviewSession;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Process-wide review state handed to every handler.
///
/// The mutex only makes the session shareable between handlers. There is no
/// file locking or versioning, so concurrent reviewers race on the cursor and
/// on the file being written.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<ReviewSession>>,
}

impl AppState {
    pub fn new(session: ReviewSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Locks the session, recovering it if an earlier request panicked.
    pub fn session(&self) -> MutexGuard<'_, ReviewSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
