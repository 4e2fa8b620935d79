//! Balcao Core - Shared types library.
//!
//! This crate provides common types used across all Balcao components:
//! - `engine` - Shipping quotes, backup/restore, WooCommerce sync
//! - `cli` - Command-line tools for backups, sync runs and stock checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no persistence, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the Product/Client/Vendor/Sale records,
//!   plus the ephemeral shipping-quote types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
