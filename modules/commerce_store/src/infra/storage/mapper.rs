//! Entity to record mappers
//!
//! Conversions between SeaORM models and contract records, plus the
//! filter/sort mappings each record exposes to list queries.

use super::entity::{coupon, inventory_transaction, order, product, user};
use super::record::Record;
use crate::contract::{
    Coupon, CouponFilter, CouponSortKey, InventoryFilter, InventorySortKey, InventoryTransaction,
    Order, OrderFilter, OrderSortKey, OrderStatus, Product, ProductFilter, ProductSortKey,
    StoreError, User, UserFilter, UserRole, UserSortKey,
};
use crate::domain::Entity;
use sea_orm::ActiveValue::Set;
use sea_orm::{ColumnTrait, Condition, Value};
use uuid::Uuid;

// ===== Product =====

impl Record for Product {
    type Table = product::Entity;
    type Row = product::Model;
    type Active = product::ActiveModel;

    fn id_column() -> product::Column {
        product::Column::Id
    }

    fn version_column() -> Option<product::Column> {
        Some(product::Column::Version)
    }

    fn updated_at_column() -> Option<product::Column> {
        Some(product::Column::UpdatedAt)
    }

    fn id_value(id: &Uuid) -> Value {
        (*id).into()
    }

    fn from_row(row: product::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id,
            tenant_id: row.tenant_id,
            sku: row.sku,
            name: row.name,
            price_cents: row.price_cents,
            currency: row.currency,
            active: row.active,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> product::ActiveModel {
        product::ActiveModel {
            id: Set(self.id),
            tenant_id: Set(self.tenant_id),
            sku: Set(self.sku.clone()),
            name: Set(self.name.clone()),
            price_cents: Set(self.price_cents),
            currency: Set(self.currency.clone()),
            active: Set(self.active),
            version: Set(self.version),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }

    fn filter_condition(filter: &ProductFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(tenant_id) = filter.tenant_id {
            condition = condition.add(product::Column::TenantId.eq(tenant_id));
        }
        if let Some(sku) = &filter.sku {
            condition = condition.add(product::Column::Sku.eq(sku.as_str()));
        }
        if let Some(active) = filter.active {
            condition = condition.add(product::Column::Active.eq(active));
        }
        if let Some(text) = &filter.name_contains {
            condition = condition.add(product::Column::Name.contains(text.as_str()));
        }
        if let Some(min) = filter.min_price_cents {
            condition = condition.add(product::Column::PriceCents.gte(min));
        }
        if let Some(max) = filter.max_price_cents {
            condition = condition.add(product::Column::PriceCents.lte(max));
        }
        condition
    }

    fn sort_column(key: ProductSortKey) -> product::Column {
        match key {
            ProductSortKey::CreatedAt => product::Column::CreatedAt,
            ProductSortKey::Name => product::Column::Name,
            ProductSortKey::Sku => product::Column::Sku,
            ProductSortKey::Price => product::Column::PriceCents,
        }
    }
}

// ===== User =====

impl Record for User {
    type Table = user::Entity;
    type Row = user::Model;
    type Active = user::ActiveModel;

    fn id_column() -> user::Column {
        user::Column::Id
    }

    fn version_column() -> Option<user::Column> {
        Some(user::Column::Version)
    }

    fn updated_at_column() -> Option<user::Column> {
        Some(user::Column::UpdatedAt)
    }

    fn id_value(id: &Uuid) -> Value {
        (*id).into()
    }

    fn from_row(row: user::Model) -> Result<Self, StoreError> {
        let role = row
            .role
            .parse::<UserRole>()
            .map_err(|message| StoreError::Decode {
                entity: Self::KIND,
                message,
            })?;

        Ok(Self {
            id: row.id,
            tenant_id: row.tenant_id,
            email: row.email,
            display_name: row.display_name,
            role,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> user::ActiveModel {
        user::ActiveModel {
            id: Set(self.id),
            tenant_id: Set(self.tenant_id),
            email: Set(self.email.clone()),
            display_name: Set(self.display_name.clone()),
            role: Set(self.role.as_str().to_string()),
            version: Set(self.version),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }

    fn filter_condition(filter: &UserFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(tenant_id) = filter.tenant_id {
            condition = condition.add(user::Column::TenantId.eq(tenant_id));
        }
        if let Some(email) = &filter.email {
            condition = condition.add(user::Column::Email.eq(email.as_str()));
        }
        if let Some(role) = filter.role {
            condition = condition.add(user::Column::Role.eq(role.as_str()));
        }
        condition
    }

    fn sort_column(key: UserSortKey) -> user::Column {
        match key {
            UserSortKey::CreatedAt => user::Column::CreatedAt,
            UserSortKey::Email => user::Column::Email,
            UserSortKey::DisplayName => user::Column::DisplayName,
        }
    }
}

// ===== Coupon =====

impl Record for Coupon {
    type Table = coupon::Entity;
    type Row = coupon::Model;
    type Active = coupon::ActiveModel;

    fn id_column() -> coupon::Column {
        coupon::Column::Id
    }

    fn version_column() -> Option<coupon::Column> {
        Some(coupon::Column::Version)
    }

    fn updated_at_column() -> Option<coupon::Column> {
        Some(coupon::Column::UpdatedAt)
    }

    fn id_value(id: &Uuid) -> Value {
        (*id).into()
    }

    fn from_row(row: coupon::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id,
            tenant_id: row.tenant_id,
            code: row.code,
            percent_off: row.percent_off,
            max_redemptions: row.max_redemptions,
            redeemed: row.redeemed,
            expires_at: row.expires_at,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> coupon::ActiveModel {
        coupon::ActiveModel {
            id: Set(self.id),
            tenant_id: Set(self.tenant_id),
            code: Set(self.code.clone()),
            percent_off: Set(self.percent_off),
            max_redemptions: Set(self.max_redemptions),
            redeemed: Set(self.redeemed),
            expires_at: Set(self.expires_at),
            version: Set(self.version),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }

    fn filter_condition(filter: &CouponFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(tenant_id) = filter.tenant_id {
            condition = condition.add(coupon::Column::TenantId.eq(tenant_id));
        }
        if let Some(code) = &filter.code {
            condition = condition.add(coupon::Column::Code.eq(code.as_str()));
        }
        if let Some(at) = filter.valid_at {
            condition = condition.add(
                Condition::any()
                    .add(coupon::Column::ExpiresAt.is_null())
                    .add(coupon::Column::ExpiresAt.gt(at)),
            );
        }
        condition
    }

    fn sort_column(key: CouponSortKey) -> coupon::Column {
        match key {
            CouponSortKey::CreatedAt => coupon::Column::CreatedAt,
            CouponSortKey::Code => coupon::Column::Code,
            CouponSortKey::ExpiresAt => coupon::Column::ExpiresAt,
        }
    }
}

// ===== Order =====

impl Record for Order {
    type Table = order::Entity;
    type Row = order::Model;
    type Active = order::ActiveModel;

    fn id_column() -> order::Column {
        order::Column::Id
    }

    fn version_column() -> Option<order::Column> {
        Some(order::Column::Version)
    }

    fn updated_at_column() -> Option<order::Column> {
        Some(order::Column::UpdatedAt)
    }

    fn id_value(id: &Uuid) -> Value {
        (*id).into()
    }

    fn from_row(row: order::Model) -> Result<Self, StoreError> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|message| StoreError::Decode {
                entity: Self::KIND,
                message,
            })?;

        Ok(Self {
            id: row.id,
            tenant_id: row.tenant_id,
            user_id: row.user_id,
            status,
            total_cents: row.total_cents,
            currency: row.currency,
            coupon_code: row.coupon_code,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_active(&self) -> order::ActiveModel {
        order::ActiveModel {
            id: Set(self.id),
            tenant_id: Set(self.tenant_id),
            user_id: Set(self.user_id),
            status: Set(self.status.as_str().to_string()),
            total_cents: Set(self.total_cents),
            currency: Set(self.currency.clone()),
            coupon_code: Set(self.coupon_code.clone()),
            version: Set(self.version),
            created_at: Set(self.created_at),
            updated_at: Set(self.updated_at),
        }
    }

    fn filter_condition(filter: &OrderFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(tenant_id) = filter.tenant_id {
            condition = condition.add(order::Column::TenantId.eq(tenant_id));
        }
        if let Some(user_id) = filter.user_id {
            condition = condition.add(order::Column::UserId.eq(user_id));
        }
        if let Some(status) = filter.status {
            condition = condition.add(order::Column::Status.eq(status.as_str()));
        }
        if let Some(after) = filter.created_after {
            condition = condition.add(order::Column::CreatedAt.gt(after));
        }
        condition
    }

    fn sort_column(key: OrderSortKey) -> order::Column {
        match key {
            OrderSortKey::CreatedAt => order::Column::CreatedAt,
            OrderSortKey::Total => order::Column::TotalCents,
            OrderSortKey::Status => order::Column::Status,
        }
    }
}

// ===== Inventory =====

impl Record for InventoryTransaction {
    type Table = inventory_transaction::Entity;
    type Row = inventory_transaction::Model;
    type Active = inventory_transaction::ActiveModel;

    fn id_column() -> inventory_transaction::Column {
        inventory_transaction::Column::Id
    }

    fn id_value(id: &Uuid) -> Value {
        (*id).into()
    }

    fn from_row(row: inventory_transaction::Model) -> Result<Self, StoreError> {
        Ok(Self {
            id: row.id,
            tenant_id: row.tenant_id,
            product_id: row.product_id,
            quantity_delta: row.quantity_delta,
            reason: row.reason,
            order_id: row.order_id,
            created_at: row.created_at,
        })
    }

    fn to_active(&self) -> inventory_transaction::ActiveModel {
        inventory_transaction::ActiveModel {
            id: Set(self.id),
            tenant_id: Set(self.tenant_id),
            product_id: Set(self.product_id),
            quantity_delta: Set(self.quantity_delta),
            reason: Set(self.reason.clone()),
            order_id: Set(self.order_id),
            created_at: Set(self.created_at),
        }
    }

    fn filter_condition(filter: &InventoryFilter) -> Condition {
        let mut condition = Condition::all();
        if let Some(tenant_id) = filter.tenant_id {
            condition = condition.add(inventory_transaction::Column::TenantId.eq(tenant_id));
        }
        if let Some(product_id) = filter.product_id {
            condition = condition.add(inventory_transaction::Column::ProductId.eq(product_id));
        }
        if let Some(order_id) = filter.order_id {
            condition = condition.add(inventory_transaction::Column::OrderId.eq(order_id));
        }
        condition
    }

    fn sort_column(key: InventorySortKey) -> inventory_transaction::Column {
        match key {
            InventorySortKey::CreatedAt => inventory_transaction::Column::CreatedAt,
            InventorySortKey::QuantityDelta => inventory_transaction::Column::QuantityDelta,
        }
    }
}
