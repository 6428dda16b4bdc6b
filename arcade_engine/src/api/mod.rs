//! The public storefront APIs.
//!
//! These are thin facades over a [`crate::traits::StorefrontDatabase`] backend. They add logging and
//! service-level validation; all atomicity lives in the backend.

pub mod cart_api;
pub mod catalog_api;
pub mod catalog_objects;
pub mod order_flow_api;
pub mod order_objects;
