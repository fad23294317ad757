//! Stub backend — no network. Succeeds or fails as constructed and counts
//! attempts. Used by tests and `driver = "stub"` offline runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::database::DbError;

#[derive(Debug, Clone)]
pub struct StubConnector {
    fail_with: Option<String>,
    attempts: Arc<AtomicUsize>,
}

impl StubConnector {
    pub fn succeeding() -> Self {
        Self { fail_with: None, attempts: Arc::default() }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self { fail_with: Some(reason.into()), attempts: Arc::default() }
    }

    /// Connection attempts made through this stub and its clones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub async fn connect(&self, _uri: &str) -> Result<(), DbError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            None => Ok(()),
            Some(reason) => Err(DbError::Connect(reason.clone())),
        }
    }
}
