//! In-memory session store for front-ends that keep per-user state between
//! scoring requests.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Free-form values a front-end wants to remember
    #[serde(default, flatten)]
    pub values: Map<String, Value>,
}

/// Session id -> data, guarded by one lock.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionData>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of a session; empty data for an unknown id.
    pub fn get(&self, session_id: &str) -> SessionData {
        self.lock().get(session_id).cloned().unwrap_or_default()
    }

    pub fn set(&self, session_id: &str, data: SessionData) {
        self.lock().insert(session_id.to_string(), data);
    }

    pub fn append_message(&self, session_id: &str, role: &str, text: &str) {
        self.lock()
            .entry(session_id.to_string())
            .or_default()
            .messages
            .push(Message {
                role: role.to_string(),
                text: text.to_string(),
            });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
