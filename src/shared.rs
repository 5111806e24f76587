use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::{
    evaluator::{EvaluationError, Evaluator},
    history::HistoryEntry,
    token::Token,
};

/// A cloneable handle to one `Evaluator` for callers on several threads.
///
/// Each call holds the lock from the first token scanned until the history
/// entry is appended, so a reader never sees a history whose last entry does
/// not match the value most recently returned.
#[derive(Debug, Clone, Default)]
pub struct SharedEvaluator {
    inner: Arc<Mutex<Evaluator>>,
}

impl SharedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&self, tokens: &[Token]) -> Result<f64, EvaluationError> {
        self.lock().evaluate(tokens)
    }

    pub fn latest(&self) -> Option<f64> {
        self.lock().history().latest()
    }

    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.lock().history().all().to_vec()
    }

    // Evaluation cannot panic between computing a value and appending it, so
    // a poisoned lock still guards a consistent history.
    fn lock(&self) -> MutexGuard<'_, Evaluator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Evaluator> for SharedEvaluator {
    fn from(evaluator: Evaluator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(evaluator)),
        }
    }
}
