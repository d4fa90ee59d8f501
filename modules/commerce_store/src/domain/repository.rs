//! Repository trait for data access
//!
//! Domain services depend on this trait only. The SeaORM implementation is
//! in infra/storage/repository.rs.

use super::entity::Entity;
use crate::contract::{ListQuery, StoreError};
use async_trait::async_trait;

/// Uniform data access over a single entity type
///
/// Reads hit the committed state of the store. Mutations are staged in the
/// owning unit of work and only take effect when it commits.
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Find an entity by identifier
    async fn get(&self, id: &T::Id) -> Result<T, StoreError>;

    /// List entities matching the query's filter, ordered and paged
    async fn list(&self, query: &ListQuery<T::Filter, T::SortKey>) -> Result<Vec<T>, StoreError>;

    /// Check whether an entity exists
    async fn exists(&self, id: &T::Id) -> Result<bool, StoreError>;

    /// Count entities matching a filter
    async fn count(&self, filter: &T::Filter) -> Result<u64, StoreError>;

    /// Stage an insertion
    fn add(&self, entity: T) -> Result<(), StoreError>;

    /// Stage a modification, checked against the stored version at commit
    fn update(&self, entity: T) -> Result<(), StoreError>;

    /// Stage a deletion, checked for existence at commit
    fn remove(&self, id: &T::Id) -> Result<(), StoreError>;
}
