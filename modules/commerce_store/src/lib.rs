//! Commerce Store
//!
//! Persistence core of a multi-tenant commerce backend: a generic repository
//! over SeaORM and a request-scoped unit of work that commits staged changes
//! atomically.

// Public exports
pub mod contract;
pub use contract::{ListQuery, Page, SortDirection, StoreError, UnitState};

pub mod config;
pub use config::{ConcurrencyPolicy, StoreConfig};

pub mod store;
pub use store::{MigrationStatus, Store};

pub mod domain;
pub use domain::{ChangeEvent, ChangeKind, Entity, EventPublisher, NoOpEventPublisher, Repository};

pub mod logging;

// Storage internals are reachable for custom records and migrations
#[doc(hidden)]
pub mod infra;
pub use infra::storage::{Record, SeaOrmRepository, UnitOfWork};
