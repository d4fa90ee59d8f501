//! The `Entity` abstraction every persisted record implements

use super::validation::{
    require_non_empty, require_non_negative, validate_code, validate_currency, validate_email,
};
use crate::contract::{
    Coupon, CouponFilter, CouponSortKey, InventoryFilter, InventorySortKey, InventoryTransaction,
    Order, OrderFilter, OrderSortKey, Product, ProductFilter, ProductSortKey, User, UserFilter,
    UserSortKey,
};
use std::fmt::{Debug, Display};
use uuid::Uuid;

/// A domain record with a unique identifier
///
/// `version` returns the optimistic concurrency token when the record type
/// carries one. `validate` runs before the record is staged for insert or
/// update.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    type Id: Clone + Debug + Display + PartialEq + Send + Sync + 'static;
    type Filter: Clone + Debug + Default + Send + Sync + 'static;
    type SortKey: Copy + Debug + Default + Send + Sync + 'static;

    /// Stable name used in errors, logs and change events
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    fn version(&self) -> Option<i64> {
        None
    }

    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Entity for Product {
    type Id = Uuid;
    type Filter = ProductFilter;
    type SortKey = ProductSortKey;

    const KIND: &'static str = "product";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> Option<i64> {
        Some(self.version)
    }

    fn validate(&self) -> Result<(), String> {
        validate_code("sku", &self.sku)?;
        require_non_empty("name", &self.name)?;
        require_non_negative("price_cents", self.price_cents)?;
        validate_currency(&self.currency)
    }
}

impl Entity for User {
    type Id = Uuid;
    type Filter = UserFilter;
    type SortKey = UserSortKey;

    const KIND: &'static str = "user";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> Option<i64> {
        Some(self.version)
    }

    fn validate(&self) -> Result<(), String> {
        validate_email(&self.email)?;
        require_non_empty("display_name", &self.display_name)
    }
}

impl Entity for Coupon {
    type Id = Uuid;
    type Filter = CouponFilter;
    type SortKey = CouponSortKey;

    const KIND: &'static str = "coupon";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> Option<i64> {
        Some(self.version)
    }

    fn validate(&self) -> Result<(), String> {
        validate_code("code", &self.code)?;
        if !(1..=100).contains(&self.percent_off) {
            return Err(format!(
                "percent_off must be between 1 and 100 (got {})",
                self.percent_off
            ));
        }
        require_non_negative("redeemed", i64::from(self.redeemed))?;
        if let Some(max) = self.max_redemptions {
            if self.redeemed > max {
                return Err(format!(
                    "redeemed ({}) exceeds max_redemptions ({})",
                    self.redeemed, max
                ));
            }
        }
        Ok(())
    }
}

impl Entity for Order {
    type Id = Uuid;
    type Filter = OrderFilter;
    type SortKey = OrderSortKey;

    const KIND: &'static str = "order";

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> Option<i64> {
        Some(self.version)
    }

    fn validate(&self) -> Result<(), String> {
        require_non_negative("total_cents", self.total_cents)?;
        validate_currency(&self.currency)?;
        if let Some(code) = &self.coupon_code {
            validate_code("coupon_code", code)?;
        }
        Ok(())
    }
}

// Inventory rows are append-only, so they carry no version token.
impl Entity for InventoryTransaction {
    type Id = Uuid;
    type Filter = InventoryFilter;
    type SortKey = InventorySortKey;

    const KIND: &'static str = "inventory_transaction";

    fn id(&self) -> Uuid {
        self.id
    }

    fn validate(&self) -> Result<(), String> {
        if self.quantity_delta == 0 {
            return Err("quantity_delta cannot be zero".to_string());
        }
        require_non_empty("reason", &self.reason)
    }
}
