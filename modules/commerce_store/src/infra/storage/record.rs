//! Binding between a domain entity and its SeaORM table

use crate::contract::StoreError;
use crate::domain::Entity;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, Condition, EntityTrait, FromQueryResult,
    IntoActiveModel, Value,
};

/// Column type of a record's table
pub type RecordColumn<R> = <<R as Record>::Table as EntityTrait>::Column;

/// An entity the generic repository can persist
///
/// Implementations map rows to records and back, name the id and version
/// columns, and translate the record's filter and sort key into SeaORM
/// terms. Single-column primary keys only.
pub trait Record: Entity {
    type Table: EntityTrait<Model = Self::Row, ActiveModel = Self::Active>;
    type Row: FromQueryResult + IntoActiveModel<Self::Active> + Send + Sync + 'static;
    type Active: ActiveModelTrait<Entity = Self::Table> + ActiveModelBehavior + Send + Sync + 'static;

    fn id_column() -> RecordColumn<Self>;

    /// Column holding the optimistic concurrency token, if the table has one
    fn version_column() -> Option<RecordColumn<Self>> {
        None
    }

    /// Modification timestamp, set by the store on every update
    fn updated_at_column() -> Option<RecordColumn<Self>> {
        None
    }

    fn id_value(id: &Self::Id) -> Value;

    fn from_row(row: Self::Row) -> Result<Self, StoreError>;

    /// Active model with every column set from the record
    fn to_active(&self) -> Self::Active;

    fn filter_condition(filter: &Self::Filter) -> Condition;

    fn sort_column(key: Self::SortKey) -> RecordColumn<Self>;
}
