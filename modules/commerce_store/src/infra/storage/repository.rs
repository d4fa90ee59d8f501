//! Generic SeaORM repository

use super::context::{EntityContext, PendingChange};
use super::record::Record;
use crate::config::ConcurrencyPolicy;
use crate::contract::model::timestamp_now;
use crate::contract::{ListQuery, SortDirection, StoreError};
use crate::domain::{ChangeEvent, ChangeKind, Entity, Repository};
use async_trait::async_trait;
use sea_orm::{
    prelude::Expr, ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::marker::PhantomData;
use std::sync::Arc;

/// Repository handle for one record type, bound to a unit of work
pub struct SeaOrmRepository<R: Record> {
    ctx: Arc<EntityContext>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> SeaOrmRepository<R> {
    pub(crate) fn new(ctx: Arc<EntityContext>) -> Self {
        Self {
            ctx,
            _record: PhantomData,
        }
    }

    fn validated(entity: &R) -> Result<(), StoreError> {
        entity.validate().map_err(|message| StoreError::Validation {
            entity: R::KIND,
            message,
        })
    }
}

#[async_trait]
impl<R: Record> Repository<R> for SeaOrmRepository<R> {
    async fn get(&self, id: &R::Id) -> Result<R, StoreError> {
        self.ctx.ensure_readable()?;

        let row = <R::Table as EntityTrait>::find()
            .filter(R::id_column().eq(R::id_value(id)))
            .one(self.ctx.connection())
            .await?;

        match row {
            Some(row) => R::from_row(row),
            None => Err(StoreError::not_found(R::KIND, id)),
        }
    }

    async fn list(&self, query: &ListQuery<R::Filter, R::SortKey>) -> Result<Vec<R>, StoreError> {
        self.ctx.ensure_readable()?;

        let limit = query.page.limit.min(self.ctx.max_page_size());
        if limit == 0 {
            return Ok(Vec::new());
        }

        let sort_column = R::sort_column(query.sort);
        let select =
            <R::Table as EntityTrait>::find().filter(R::filter_condition(&query.filter));
        let select = match query.direction {
            SortDirection::Asc => select.order_by_asc(sort_column),
            SortDirection::Desc => select.order_by_desc(sort_column),
        };

        let rows = select
            .order_by_asc(R::id_column())
            .limit(limit)
            .offset(query.page.offset)
            .all(self.ctx.connection())
            .await?;

        rows.into_iter().map(R::from_row).collect()
    }

    async fn exists(&self, id: &R::Id) -> Result<bool, StoreError> {
        self.ctx.ensure_readable()?;

        let count = <R::Table as EntityTrait>::find()
            .filter(R::id_column().eq(R::id_value(id)))
            .count(self.ctx.connection())
            .await?;

        Ok(count > 0)
    }

    async fn count(&self, filter: &R::Filter) -> Result<u64, StoreError> {
        self.ctx.ensure_readable()?;

        let count = <R::Table as EntityTrait>::find()
            .filter(R::filter_condition(filter))
            .count(self.ctx.connection())
            .await?;

        Ok(count)
    }

    fn add(&self, entity: R) -> Result<(), StoreError> {
        Self::validated(&entity)?;
        tracing::debug!(unit_id = %self.ctx.unit_id(), entity = R::KIND, id = %entity.id(), "staged insert");
        self.ctx.stage("add", Box::new(StagedChange::Insert(entity)))
    }

    fn update(&self, entity: R) -> Result<(), StoreError> {
        Self::validated(&entity)?;
        tracing::debug!(unit_id = %self.ctx.unit_id(), entity = R::KIND, id = %entity.id(), "staged update");
        self.ctx.stage("update", Box::new(StagedChange::Update(entity)))
    }

    fn remove(&self, id: &R::Id) -> Result<(), StoreError> {
        tracing::debug!(unit_id = %self.ctx.unit_id(), entity = R::KIND, id = %id, "staged removal");
        self.ctx.stage("remove", Box::new(StagedChange::<R>::Delete(id.clone())))
    }
}

// ===== Staged changes =====

enum StagedChange<R: Record> {
    Insert(R),
    Update(R),
    Delete(R::Id),
}

#[async_trait]
impl<R: Record> PendingChange for StagedChange<R> {
    async fn apply(
        &self,
        txn: &DatabaseTransaction,
        policy: ConcurrencyPolicy,
    ) -> Result<(), StoreError> {
        match self {
            Self::Insert(entity) => {
                <R::Table as EntityTrait>::insert(entity.to_active())
                    .exec_without_returning(txn)
                    .await?;
                Ok(())
            }
            Self::Update(entity) => apply_update(txn, entity, policy).await,
            Self::Delete(id) => {
                let result = <R::Table as EntityTrait>::delete_many()
                    .filter(R::id_column().eq(R::id_value(id)))
                    .exec(txn)
                    .await?;

                if result.rows_affected == 0 {
                    return Err(StoreError::not_found(R::KIND, id));
                }
                Ok(())
            }
        }
    }

    fn event(&self, unit_id: uuid::Uuid) -> ChangeEvent {
        let (entity_id, kind) = match self {
            Self::Insert(entity) => (entity.id().to_string(), ChangeKind::Inserted),
            Self::Update(entity) => (entity.id().to_string(), ChangeKind::Updated),
            Self::Delete(id) => (id.to_string(), ChangeKind::Removed),
        };
        ChangeEvent::new(unit_id, R::KIND, entity_id, kind)
    }
}

/// Write every column of `entity`, bumping the version column in SQL.
///
/// `updated_at` is stamped by the store; the caller's value is ignored.
///
/// With `ConcurrencyPolicy::Enforce` and a versioned record the statement
/// only matches the row when the stored version equals the entity's.
async fn apply_update<R: Record>(
    txn: &DatabaseTransaction,
    entity: &R,
    policy: ConcurrencyPolicy,
) -> Result<(), StoreError> {
    let id = entity.id();
    let mut active = entity.to_active();
    let mut update =
        <R::Table as EntityTrait>::update_many().filter(R::id_column().eq(R::id_value(&id)));

    if let Some(updated_at_column) = R::updated_at_column() {
        active.not_set(updated_at_column);
        update = update.col_expr(updated_at_column, Expr::value(timestamp_now()));
    }

    let mut expected_version = None;
    if let Some(version_column) = R::version_column() {
        active.not_set(version_column);
        if policy == ConcurrencyPolicy::Enforce {
            if let Some(expected) = entity.version() {
                update = update.filter(version_column.eq(expected));
                expected_version = Some(expected);
            }
        }
        update = update
            .set(active)
            .col_expr(version_column, Expr::col(version_column).add(1));
    } else {
        update = update.set(active);
    }

    let result = update.exec(txn).await?;
    if result.rows_affected > 0 {
        return Ok(());
    }

    // Nothing matched: either the row is gone or its version moved on.
    let current = <R::Table as EntityTrait>::find()
        .filter(R::id_column().eq(R::id_value(&id)))
        .one(txn)
        .await?;

    match (current, expected_version) {
        (Some(row), Some(expected)) => {
            let actual = R::from_row(row)?.version().unwrap_or_default();
            Err(StoreError::ConcurrencyConflict {
                entity: R::KIND,
                id: id.to_string(),
                expected,
                actual,
            })
        }
        _ => Err(StoreError::not_found(R::KIND, &id)),
    }
}
