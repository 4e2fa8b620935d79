//! Core types for Balcao.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod party;
pub mod price;
pub mod product;
pub mod sale;
pub mod shipping;

pub use id::*;
pub use party::{Client, Vendor};
pub use price::Price;
pub use product::{Dimensions, Product};
pub use sale::{PaymentMethod, Sale, SaleItem};
pub use shipping::{
    Carrier, DeliveryEstimate, DeliveryUnit, PackageInfo, RouteInfo, ShippingOption,
};
