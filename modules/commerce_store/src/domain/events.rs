//! Change events emitted after a unit of work commits
//!
//! One event is produced per applied change, in staging order. Events are
//! only published once the transaction is durable; a failed or cancelled
//! commit publishes nothing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of change applied to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Removed,
}

/// A committed change to one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Unit of work that committed the change
    pub unit_id: Uuid,
    /// Entity kind (product, order, ...)
    pub entity: String,
    /// Record identifier
    pub entity_id: String,
    pub kind: ChangeKind,
    /// Commit time
    pub timestamp: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new(unit_id: Uuid, entity: &str, entity_id: String, kind: ChangeKind) -> Self {
        Self {
            unit_id,
            entity: entity.to_string(),
            entity_id,
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Event publisher trait for committed changes
///
/// Implementations should handle delivery (outbox table, message bus) and
/// their own retries. A publishing failure never undoes the commit.
#[async_trait::async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish the events of one commit
    async fn publish(&self, events: Vec<ChangeEvent>) -> anyhow::Result<()>;
}

/// No-op event publisher for testing or when events are disabled
pub struct NoOpEventPublisher;

#[async_trait::async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish(&self, _events: Vec<ChangeEvent>) -> anyhow::Result<()> {
        Ok(())
    }
}
