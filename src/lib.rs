//! Panelsync — external service catalog synchronization engine.
//!
//! Talks to third-party SMM panel reseller APIs (key-action form-POST
//! protocol), discovers their sellable services, classifies them onto the
//! local platform/category taxonomy, upserts them into the catalog
//! idempotently, and relays order lifecycle calls.

pub mod config;
pub mod errors;
pub mod models;
pub mod orders;
pub mod panel;
pub mod store;
pub mod sync;
