//! Contract models for the commerce store
//!
//! These models are transport-agnostic and shared with domain services.
//! NO ORM derives - table mappings live in infra/storage.

use chrono::{DateTime, SubsecRound, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Current time truncated to microseconds, the finest precision every
/// supported backend stores.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Lifecycle state of a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Accepting staged changes
    Open,
    /// Staged changes were applied atomically
    Committed,
    /// Staged changes were discarded or the commit failed
    RolledBack,
    /// Scope ended; no further operations are valid
    Disposed,
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Open => "open",
            Self::Committed => "committed",
            Self::RolledBack => "rolled back",
            Self::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

// ===== Product =====

/// Catalog product owned by a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Stock keeping unit, unique per tenant
    pub sku: String,
    pub name: String,
    /// Unit price in minor currency units
    pub price_cents: i64,
    /// ISO 4217 currency code
    pub currency: String,
    pub active: bool,
    /// Optimistic concurrency token
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        tenant_id: Uuid,
        sku: impl Into<String>,
        name: impl Into<String>,
        price_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            sku: sku.into(),
            name: name.into(),
            price_cents,
            currency: currency.into(),
            active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub tenant_id: Option<Uuid>,
    pub sku: Option<String>,
    pub active: Option<bool>,
    /// Substring match on the product name
    pub name_contains: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSortKey {
    #[default]
    CreatedAt,
    Name,
    Sku,
    Price,
}

// ===== User =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Customer,
    Staff,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Staff => "staff",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "staff" => Ok(Self::Staff),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown user role '{}'", other)),
        }
    }
}

/// Storefront account scoped to a tenant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Login email, unique per tenant
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        tenant_id: Uuid,
        email: impl Into<String>,
        display_name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            email: email.into(),
            display_name: display_name.into(),
            role,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub tenant_id: Option<Uuid>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSortKey {
    #[default]
    CreatedAt,
    Email,
    DisplayName,
}

// ===== Coupon =====

/// Percentage discount code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coupon {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// Redemption code, unique per tenant
    pub code: String,
    /// Discount in percent, 1..=100
    pub percent_off: i32,
    /// `None` means unlimited
    pub max_redemptions: Option<i32>,
    pub redeemed: i32,
    pub expires_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    pub fn new(tenant_id: Uuid, code: impl Into<String>, percent_off: i32) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            code: code.into(),
            percent_off,
            max_redemptions: None,
            redeemed: 0,
            expires_at: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CouponFilter {
    pub tenant_id: Option<Uuid>,
    pub code: Option<String>,
    /// Only coupons that have not expired at this instant
    pub valid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CouponSortKey {
    #[default]
    CreatedAt,
    Code,
    ExpiresAt,
}

// ===== Order =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub currency: String,
    pub coupon_code: Option<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(
        tenant_id: Uuid,
        user_id: Uuid,
        total_cents: i64,
        currency: impl Into<String>,
    ) -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            user_id,
            status: OrderStatus::Pending,
            total_cents,
            currency: currency.into(),
            coupon_code: None,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub tenant_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
    pub created_after: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderSortKey {
    #[default]
    CreatedAt,
    Total,
    Status,
}

// ===== Inventory =====

/// Append-only stock movement for a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryTransaction {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    /// Positive for restock, negative for sale or shrinkage
    pub quantity_delta: i32,
    pub reason: String,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl InventoryTransaction {
    pub fn new(
        tenant_id: Uuid,
        product_id: Uuid,
        quantity_delta: i32,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            product_id,
            quantity_delta,
            reason: reason.into(),
            order_id: None,
            created_at: timestamp_now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryFilter {
    pub tenant_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InventorySortKey {
    #[default]
    CreatedAt,
    QuantityDelta,
}
