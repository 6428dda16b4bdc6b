//! Behaviour contracts for storefront backends.
//!
//! Each concern gets its own trait: the read/write catalog ([`CatalogManagement`]), the per-user cart
//! ([`CartManagement`]) and the order ledger ([`OrderManagement`]). [`StorefrontDatabase`] sits on top of all
//! three and owns the flows that must be atomic: checkout, status transitions and order deletion.

mod cart_management;
mod catalog_management;
mod order_management;
mod storefront_database;

pub use cart_management::{CartError, CartManagement};
pub use catalog_management::{CatalogError, CatalogManagement};
pub use order_management::OrderManagement;
pub use storefront_database::{OrderFlowError, StorefrontDatabase};
