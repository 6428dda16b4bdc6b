//! NeonArcade storefront engine
//!
//! The engine holds the core logic for the NeonArcade digital games store: the catalog, per-user carts, the
//! checkout flow that atomically converts a cart into an order, and the order lifecycle state machine that
//! governs status changes afterwards. It is provider-agnostic.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need
//!    to access the database directly; use the public APIs instead. The exception is the data types used in the
//!    database, which are defined in the [`db_types`] module and are public.
//! 2. The public storefront API ([`mod@api`]): [`OrderFlowApi`] for checkout and the order lifecycle,
//!    [`CartApi`] for cart mutation, and [`CatalogApi`] for browsing and catalog administration. Backends
//!    implement the traits in [`mod@traits`] to power these APIs.
pub mod api;
pub mod db_types;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use api::{
    cart_api::CartApi,
    catalog_api::CatalogApi,
    catalog_objects::GameQueryFilter,
    order_flow_api::OrderFlowApi,
    order_objects::{FullOrder, OrderChanged},
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{
    CartError,
    CartManagement,
    CatalogError,
    CatalogManagement,
    OrderFlowError,
    OrderManagement,
    StorefrontDatabase,
};
