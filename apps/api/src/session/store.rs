//! In-memory session map. No persistence — sessions are gone on restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

use crate::session::RecommendationSession;

/// Shared, process-wide store of live sessions.
///
/// The mutex is only ever held for short synchronous bookkeeping — never
/// across the pipeline's await point. Load-more concurrency is handled by
/// the per-session busy flag, not by holding this lock.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, RecommendationSession>>>,
}

impl SessionStore {
    pub fn insert(&self, session: RecommendationSession) {
        let mut sessions = self.inner.lock().expect("session store lock poisoned");
        sessions.insert(session.id, session);
    }

    /// Runs `f` against the session, if present.
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut RecommendationSession) -> R,
    ) -> Option<R> {
        let mut sessions = self.inner.lock().expect("session store lock poisoned");
        sessions.get_mut(&id).map(f)
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut sessions = self.inner.lock().expect("session store lock poisoned");
        sessions.remove(&id).is_some()
    }
}
