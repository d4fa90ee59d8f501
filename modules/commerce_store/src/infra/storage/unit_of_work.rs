//! Unit of work: request-scoped transaction boundary and repository factory
//!
//! A unit is created per external request by `Store::begin`. Repository
//! handles obtained from it share one entity context, so everything they
//! stage lands in the same transaction at `commit`. The transaction only
//! exists while `commit` runs; between operations the unit holds no
//! connection.
//!
//! State machine: `Open -> Committed | RolledBack -> Disposed`.

use super::context::{ContextSettings, EntityContext, PendingChange};
use super::record::Record;
use super::repository::SeaOrmRepository;
use crate::contract::{StoreError, UnitState};
use crate::domain::EventPublisher;
use parking_lot::Mutex;
use sea_orm::{DatabaseConnection, TransactionTrait};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

type RepositoryCache = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

pub struct UnitOfWork {
    ctx: Arc<EntityContext>,
    repositories: Mutex<RepositoryCache>,
    publisher: Arc<dyn EventPublisher>,
    opened_at: Instant,
}

impl UnitOfWork {
    pub(crate) fn new(
        db: Arc<DatabaseConnection>,
        settings: ContextSettings,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        let ctx = Arc::new(EntityContext::new(db, settings));
        tracing::debug!(unit_id = %ctx.unit_id(), "unit of work opened");
        Self {
            ctx,
            repositories: Mutex::new(HashMap::new()),
            publisher,
            opened_at: Instant::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.ctx.unit_id()
    }

    pub fn state(&self) -> UnitState {
        self.ctx.state()
    }

    /// Number of changes staged and not yet committed
    pub fn pending_changes(&self) -> usize {
        self.ctx.pending_len()
    }

    /// Repository handle for `R`, created on first use and cached for the
    /// lifetime of this unit.
    pub fn repository<R: Record>(&self) -> Arc<SeaOrmRepository<R>> {
        let mut cache = self.repositories.lock();
        let key = TypeId::of::<R>();

        if let Some(existing) = cache.get(&key) {
            if let Ok(repository) = Arc::clone(existing).downcast::<SeaOrmRepository<R>>() {
                return repository;
            }
        }

        let repository = Arc::new(SeaOrmRepository::<R>::new(Arc::clone(&self.ctx)));
        cache.insert(key, repository.clone() as Arc<dyn Any + Send + Sync>);
        repository
    }

    /// Apply every staged change atomically
    ///
    /// Returns the number of applied changes. On failure the transaction is
    /// rolled back, the store is unchanged and the unit ends `RolledBack`.
    /// Dropping the returned future before the transaction commits also
    /// rolls back.
    pub async fn commit(&self) -> Result<usize, StoreError> {
        let changes = self.commit_changes().await?;
        self.publish(&changes).await;
        Ok(changes.len())
    }

    /// `commit`, aborted when `cancel` fires before the transaction commits
    ///
    /// A cancelled commit rolls back the in-flight transaction, discards the
    /// staged changes and fails with `StoreError::Cancelled`. Once the
    /// transaction has committed the token is no longer consulted.
    pub async fn commit_or_cancel(&self, cancel: &CancellationToken) -> Result<usize, StoreError> {
        self.ctx.ensure_open("commit")?;

        let changes = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                let discarded = self.ctx.abandon();
                tracing::warn!(unit_id = %self.id(), discarded, "commit cancelled");
                return Err(StoreError::Cancelled);
            }
            result = self.commit_changes() => result?,
        };

        self.publish(&changes).await;
        Ok(changes.len())
    }

    /// Discard staged changes without touching the store
    pub fn rollback(&self) -> Result<usize, StoreError> {
        let discarded = self.ctx.rollback()?;
        tracing::info!(unit_id = %self.id(), discarded, "unit of work rolled back");
        Ok(discarded)
    }

    /// End the unit's scope and return the state it ended in
    ///
    /// Always completes. Uncommitted changes are discarded (implicit
    /// rollback) and outstanding repository handles start failing with
    /// `StoreError::Disposed`.
    pub fn dispose(self) -> UnitState {
        self.release()
    }

    /// Drain, apply and commit; the unit is `Committed` only on success
    async fn commit_changes(&self) -> Result<Vec<Box<dyn PendingChange>>, StoreError> {
        let changes = self.ctx.drain_for_commit()?;
        let unit_id = self.id();
        let span = tracing::info_span!("commit", %unit_id, changes = changes.len());

        let started = Instant::now();
        match self.apply(&changes).instrument(span).await {
            Ok(()) => {
                self.ctx.set_state(UnitState::Committed);
                tracing::info!(
                    %unit_id,
                    changes = changes.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "unit of work committed"
                );
                Ok(changes)
            }
            Err(err) => {
                tracing::warn!(
                    %unit_id,
                    changes = changes.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "unit of work rolled back"
                );
                Err(err)
            }
        }
    }

    async fn apply(&self, changes: &[Box<dyn PendingChange>]) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }

        let txn = self.ctx.connection().begin().await?;
        let policy = self.ctx.policy();

        for change in changes {
            if let Err(err) = change.apply(&txn, policy).await {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(unit_id = %self.id(), error = %rollback_err, "rollback failed");
                }
                return Err(err);
            }
        }

        txn.commit().await?;
        Ok(())
    }

    async fn publish(&self, changes: &[Box<dyn PendingChange>]) {
        if changes.is_empty() {
            return;
        }

        let unit_id = self.id();
        let events = changes.iter().map(|change| change.event(unit_id)).collect();
        if let Err(err) = self.publisher.publish(events).await {
            tracing::warn!(%unit_id, error = %err, "failed to publish change events");
        }
    }

    fn release(&self) -> UnitState {
        let (previous, discarded) = self.ctx.close(UnitState::Disposed);
        if previous == UnitState::Disposed {
            return previous;
        }

        self.repositories.lock().clear();
        if discarded > 0 {
            tracing::info!(
                unit_id = %self.id(),
                discarded,
                "disposed with uncommitted changes; discarding"
            );
        }
        tracing::debug!(
            unit_id = %self.id(),
            final_state = %previous,
            lifetime_ms = self.opened_at.elapsed().as_millis() as u64,
            "unit of work disposed"
        );
        previous
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("id", &self.id())
            .field("state", &self.state())
            .field("pending_changes", &self.pending_changes())
            .finish()
    }
}
