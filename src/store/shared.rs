use std::sync::{Mutex, MutexGuard};

use crate::expression::ClassExpression;
use crate::store::{IdStore, Identified};
use crate::{ZpError, ZpResult};

/// Thread safe wrapper around an [`IdStore`]
///
/// The lookup of a fingerprint and the allocation of a new identifier
/// happen while holding a single lock, so concurrent callers can never
/// assign two identifiers to the same expression.
#[derive(Debug, Default)]
pub struct SharedIdStore {
    inner: Mutex<IdStore>,
}

impl SharedIdStore {
    /// Wraps `store`
    pub fn new(store: IdStore) -> Self {
        Self {
            inner: Mutex::new(store),
        }
    }

    /// Thread safe version of [`IdStore::identify`]
    ///
    /// # Errors
    ///
    /// - See [`IdStore::identify`]
    /// - [`ZpError::InvariantViolation`] if another thread panicked while holding the lock
    pub fn identify(&self, expression: &ClassExpression, label: &str) -> ZpResult<Identified> {
        self.lock()?.identify(expression, label)
    }

    /// Number of records in the store
    ///
    /// # Errors
    ///
    /// [`ZpError::InvariantViolation`] if another thread panicked while holding the lock
    pub fn len(&self) -> ZpResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Unwraps the inner [`IdStore`]
    ///
    /// # Errors
    ///
    /// [`ZpError::InvariantViolation`] if another thread panicked while holding the lock
    pub fn into_inner(self) -> ZpResult<IdStore> {
        self.inner
            .into_inner()
            .map_err(|_| ZpError::InvariantViolation("identifier store is poisoned".to_string()))
    }

    fn lock(&self) -> ZpResult<MutexGuard<'_, IdStore>> {
        self.inner
            .lock()
            .map_err(|_| ZpError::InvariantViolation("identifier store is poisoned".to_string()))
    }
}
