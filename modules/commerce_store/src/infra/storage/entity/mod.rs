//! SeaORM entities for database tables

pub mod coupon;
pub mod inventory_transaction;
pub mod order;
pub mod product;
pub mod user;
