//! Common test utilities: in-memory store, tenants and an event recorder

#![allow(dead_code)]

use async_trait::async_trait;
use commerce_store::{ChangeEvent, ConcurrencyPolicy, EventPublisher, Store, StoreConfig};
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// Two storefront tenants sharing one database
#[derive(Debug, Clone)]
pub struct TestTenants {
    pub acme: Uuid,
    pub globex: Uuid,
}

impl TestTenants {
    pub fn new() -> Self {
        Self {
            acme: Uuid::new_v4(),
            globex: Uuid::new_v4(),
        }
    }
}

impl Default for TestTenants {
    fn default() -> Self {
        Self::new()
    }
}

/// Single-connection config: every pooled connection to `sqlite::memory:`
/// would otherwise be a separate database.
pub fn memory_config() -> StoreConfig {
    let mut config = StoreConfig::new("sqlite::memory:");
    config.max_connections = 1;
    config.min_connections = 1;
    config
}

pub async fn memory_store() -> Store {
    memory_store_with(memory_config()).await
}

pub async fn memory_store_with(config: StoreConfig) -> Store {
    Store::connect(&config)
        .await
        .expect("in-memory store should connect and migrate")
}

pub async fn memory_store_with_policy(policy: ConcurrencyPolicy) -> Store {
    let mut config = memory_config();
    config.concurrency = policy;
    memory_store_with(config).await
}

/// Publisher that keeps every published batch
#[derive(Default)]
pub struct RecordingPublisher {
    batches: Mutex<Vec<Vec<ChangeEvent>>>,
}

impl RecordingPublisher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn batches(&self) -> Vec<Vec<ChangeEvent>> {
        self.batches.lock().clone()
    }

    pub fn event_count(&self) -> usize {
        self.batches.lock().iter().map(Vec::len).sum()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, events: Vec<ChangeEvent>) -> anyhow::Result<()> {
        self.batches.lock().push(events);
        Ok(())
    }
}

/// Publisher that always fails, to show commits do not depend on delivery
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _events: Vec<ChangeEvent>) -> anyhow::Result<()> {
        anyhow::bail!("message bus unavailable")
    }
}
