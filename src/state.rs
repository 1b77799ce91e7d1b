use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::{Error, Result};

/// Open share sessions, keyed by the id handed to the frontend.
pub struct SessionRegistry<S> {
    sessions: Arc<Mutex<HashMap<Uuid, S>>>,
}

impl<S: Clone> SessionRegistry<S> {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, S>> {
        match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("session registry mutex was poisoned");
                poisoned.into_inner()
            }
        }
    }

    pub fn insert(&self, session: S) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_with_id(id, session);
        id
    }

    pub fn insert_with_id(&self, id: Uuid, session: S) {
        self.lock().insert(id, session);
    }

    pub fn get(&self, id: &Uuid) -> Result<S> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::UnknownSession(id.to_string()))
    }

    pub fn remove(&self, id: &Uuid) -> Result<()> {
        self.lock()
            .remove(id)
            .map(drop)
            .ok_or_else(|| Error::UnknownSession(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut sessions = self.lock();
        log::debug!("dropping {} share sessions", sessions.len());
        sessions.clear();
    }
}

impl<S: Clone> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
