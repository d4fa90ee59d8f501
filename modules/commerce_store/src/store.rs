//! Store: process-wide registry that owns the connection pool and opens
//! units of work
//!
//! Built once at startup and passed explicitly to whatever handles requests;
//! each request calls `begin` for its own `UnitOfWork`.

use crate::config::StoreConfig;
use crate::domain::{EventPublisher, NoOpEventPublisher};
use crate::infra::storage::context::ContextSettings;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::unit_of_work::UnitOfWork;
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Applied and pending schema migrations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: Vec<String>,
    pub pending: Vec<String>,
}

#[derive(Clone)]
pub struct Store {
    db: Arc<DatabaseConnection>,
    settings: ContextSettings,
    publisher: Arc<dyn EventPublisher>,
}

impl Store {
    /// Connect using `config`, applying migrations when `run_migrations` is set
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        config.validate()?;

        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connect_timeout)
            .acquire_timeout(config.acquire_timeout)
            .sqlx_logging(config.sqlx_logging);

        let db = Database::connect(options)
            .await
            .context("failed to connect to the commerce database")?;

        let store = Self::from_connection(db, config);
        if config.run_migrations {
            store.migrate().await?;
        }

        tracing::info!(
            max_connections = config.max_connections,
            concurrency = ?config.concurrency,
            "commerce store initialized"
        );
        Ok(store)
    }

    /// Wrap an existing connection; no migrations are run
    pub fn from_connection(db: DatabaseConnection, config: &StoreConfig) -> Self {
        Self {
            db: Arc::new(db),
            settings: ContextSettings {
                policy: config.concurrency,
                max_page_size: config.max_page_size,
            },
            publisher: Arc::new(NoOpEventPublisher),
        }
    }

    /// Publish committed change events through `publisher`
    pub fn with_event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Open a unit of work for one request
    pub fn begin(&self) -> UnitOfWork {
        UnitOfWork::new(
            Arc::clone(&self.db),
            self.settings,
            Arc::clone(&self.publisher),
        )
    }

    pub async fn migrate(&self) -> Result<()> {
        Migrator::up(&*self.db, None)
            .await
            .context("failed to apply commerce store migrations")?;
        tracing::info!("commerce store migrations completed");
        Ok(())
    }

    pub async fn migration_status(&self) -> Result<MigrationStatus> {
        let applied = Migrator::get_applied_migrations(&*self.db)
            .await
            .context("failed to read applied migrations")?;
        let pending = Migrator::get_pending_migrations(&*self.db)
            .await
            .context("failed to read pending migrations")?;

        Ok(MigrationStatus {
            applied: applied.iter().map(|m| m.name().to_string()).collect(),
            pending: pending.iter().map(|m| m.name().to_string()).collect(),
        })
    }

    /// Round-trip to the database
    pub async fn ping(&self) -> Result<()> {
        self.db.ping().await.context("commerce database is unreachable")
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}
