use sea_orm::entity::prelude::*;

/// Coupons table entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub tenant_id: Uuid,

    /// Unique per tenant
    pub code: String,

    pub percent_off: i32,

    pub max_redemptions: Option<i32>,

    pub redeemed: i32,

    pub expires_at: Option<DateTimeUtc>,

    pub version: i64,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
