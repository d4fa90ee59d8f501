//! Entity context: connection handle, staged changes and unit state
//!
//! One context exists per unit of work and is shared by every repository
//! handle the unit hands out. Nothing in here talks to the database except
//! through the changes it stages; reads go straight to the connection.

use crate::config::ConcurrencyPolicy;
use crate::contract::{StoreError, UnitState};
use crate::domain::ChangeEvent;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use sea_orm::{DatabaseConnection, DatabaseTransaction};
use std::sync::Arc;
use uuid::Uuid;

/// A mutation waiting for commit
#[async_trait]
pub(crate) trait PendingChange: Send + Sync {
    /// Apply the change inside the commit transaction
    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        policy: ConcurrencyPolicy,
    ) -> Result<(), StoreError>;

    /// Event published once the change is durable
    fn event(&self, unit_id: Uuid) -> ChangeEvent;
}

/// Settings a context needs from store configuration
#[derive(Debug, Clone, Copy)]
pub(crate) struct ContextSettings {
    pub policy: ConcurrencyPolicy,
    pub max_page_size: u64,
}

pub(crate) struct EntityContext {
    unit_id: Uuid,
    db: Arc<DatabaseConnection>,
    settings: ContextSettings,
    state: RwLock<UnitState>,
    pending: Mutex<Vec<Box<dyn PendingChange>>>,
}

impl EntityContext {
    pub fn new(db: Arc<DatabaseConnection>, settings: ContextSettings) -> Self {
        Self {
            unit_id: Uuid::new_v4(),
            db,
            settings,
            state: RwLock::new(UnitState::Open),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn unit_id(&self) -> Uuid {
        self.unit_id
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn policy(&self) -> ConcurrencyPolicy {
        self.settings.policy
    }

    pub fn max_page_size(&self) -> u64 {
        self.settings.max_page_size
    }

    pub fn state(&self) -> UnitState {
        *self.state.read()
    }

    pub fn set_state(&self, state: UnitState) {
        *self.state.write() = state;
    }

    /// Reads are valid until the unit is disposed
    pub fn ensure_readable(&self) -> Result<(), StoreError> {
        match self.state() {
            UnitState::Disposed => Err(StoreError::Disposed),
            _ => Ok(()),
        }
    }

    /// Staging and commit are only valid while the unit is open
    pub fn ensure_open(&self, operation: &'static str) -> Result<(), StoreError> {
        match self.state() {
            UnitState::Open => Ok(()),
            UnitState::Disposed => Err(StoreError::Disposed),
            state => Err(StoreError::InvalidState { state, operation }),
        }
    }

    pub fn stage(
        &self,
        operation: &'static str,
        change: Box<dyn PendingChange>,
    ) -> Result<(), StoreError> {
        // State checks and queue mutations happen under the pending lock so
        // a concurrent commit cannot drain the queue between check and push.
        let mut pending = self.pending.lock();
        self.ensure_open(operation)?;
        pending.push(change);
        Ok(())
    }

    pub fn pending_len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Drain staged changes for commit
    ///
    /// The unit counts as rolled back until the caller marks it committed,
    /// so an abandoned commit never leaves it open.
    pub fn drain_for_commit(&self) -> Result<Vec<Box<dyn PendingChange>>, StoreError> {
        let mut pending = self.pending.lock();
        self.ensure_open("commit")?;
        self.set_state(UnitState::RolledBack);
        Ok(std::mem::take(&mut *pending))
    }

    /// Discard staged changes of an open unit
    pub fn rollback(&self) -> Result<usize, StoreError> {
        let mut pending = self.pending.lock();
        self.ensure_open("roll back")?;
        self.set_state(UnitState::RolledBack);
        Ok(std::mem::take(&mut *pending).len())
    }

    /// Give up on a commit that never finished
    ///
    /// An open unit moves to `RolledBack`; a unit whose commit already
    /// drained the queue is left as it is. Returns the discarded count.
    pub fn abandon(&self) -> usize {
        let mut pending = self.pending.lock();
        if self.state() != UnitState::Open {
            return 0;
        }
        self.set_state(UnitState::RolledBack);
        std::mem::take(&mut *pending).len()
    }

    /// Move to `next` and discard whatever is still staged
    ///
    /// Returns the previous state and the number of discarded changes.
    /// A disposed context is left untouched.
    pub fn close(&self, next: UnitState) -> (UnitState, usize) {
        let mut pending = self.pending.lock();
        let previous = self.state();
        if previous == UnitState::Disposed {
            return (previous, 0);
        }
        self.set_state(next);
        (previous, std::mem::take(&mut *pending).len())
    }
}
