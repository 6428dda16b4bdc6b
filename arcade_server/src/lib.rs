//! # NeonArcade server
//! This module hosts the HTTP front-end for the NeonArcade storefront. It is responsible for:
//! Exposing the game catalog, per-user carts and the checkout flow over a REST API.
//! Authenticating callers and enforcing the admin role on catalog and order administration.
//! Mapping engine errors onto HTTP status codes.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: liveness check, no authentication.
//! * `/api/games`: public catalog browsing; mutation requires the `Admin` role.
//! * `/api/cart`: the authenticated user's cart.
//! * `/api/orders`: checkout and order history; lifecycle administration requires the `Admin` role.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
