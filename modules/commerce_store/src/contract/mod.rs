//! Contract layer - public types shared by the store and its callers
//!
//! This layer contains transport-agnostic record models, list queries and
//! the store error type. Records carry no ORM derives.

pub mod error;
pub mod model;
pub mod query;

pub use error::StoreError;
pub use model::{
    Coupon, CouponFilter, CouponSortKey, InventoryFilter, InventorySortKey, InventoryTransaction,
    Order, OrderFilter, OrderSortKey, OrderStatus, Product, ProductFilter, ProductSortKey,
    UnitState, User, UserFilter, UserRole, UserSortKey,
};
pub use query::{ListQuery, Page, SortDirection};
