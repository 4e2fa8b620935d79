//! Shipping quote calculator.
//!
//! A pure function over the package, the route and a static carrier
//! catalog; no side effects. The [`QuoteProvider`] trait is the seam for
//! substituting a real carrier API client behind the same signature.

mod carriers;

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use balcao_core::{PackageInfo, RouteInfo, ShippingOption};

use carriers::CATALOG;

/// Errors that can occur when computing a quote.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShippingError {
    /// A request parameter is missing or malformed. Raised before any
    /// computation is attempted.
    #[error("invalid input: {field} {problem}")]
    InvalidInput {
        field: &'static str,
        problem: &'static str,
    },
}

fn require_positive(field: &'static str, value: Decimal) -> Result<(), ShippingError> {
    if value <= Decimal::ZERO {
        return Err(ShippingError::InvalidInput {
            field,
            problem: "must be a positive number",
        });
    }
    Ok(())
}

fn require_nonempty(field: &'static str, value: &str) -> Result<(), ShippingError> {
    if value.trim().is_empty() {
        return Err(ShippingError::InvalidInput {
            field,
            problem: "must not be empty",
        });
    }
    Ok(())
}

/// Base price formula: R$ 5 per kilogram plus a volumetric component of
/// R$ 0.000001 per cubic centimetre.
fn base_price(package: &PackageInfo) -> Decimal {
    package.weight * Decimal::new(5, 0) + package.volume() * Decimal::new(1, 6)
}

/// Compute the quote list for a package over a route.
///
/// Returns every service of the catalog, priced from the package's base
/// price and sorted ascending by raw `price`. The `discount` field is
/// informational and intentionally not part of the sort key (legacy
/// ranking behavior, kept as-is). Exactly one option carries
/// `is_cheapest` and exactly one carries `is_fastest`; ties go to the
/// earlier option.
///
/// # Errors
///
/// Returns [`ShippingError::InvalidInput`] if any package measurement is
/// not strictly positive or either CEP is empty, before any computation.
pub fn calculate_shipping(
    package: &PackageInfo,
    route: &RouteInfo,
) -> Result<Vec<ShippingOption>, ShippingError> {
    require_positive("weight", package.weight)?;
    require_positive("length", package.length)?;
    require_positive("width", package.width)?;
    require_positive("height", package.height)?;
    require_nonempty("zip_code_origin", &route.zip_code_origin)?;
    require_nonempty("zip_code_destination", &route.zip_code_destination)?;

    let base = base_price(package);
    let mut options: Vec<ShippingOption> = CATALOG.iter().map(|spec| spec.quote(base)).collect();

    // Raw price, not price minus discount.
    options.sort_by(|a, b| a.price.cmp(&b.price));

    if let Some(cheapest) = options.first_mut() {
        cheapest.is_cheapest = true;
    }
    if let Some(fastest) = options
        .iter_mut()
        .min_by_key(|option| option.delivery_time.max)
    {
        fastest.is_fastest = true;
    }

    Ok(options)
}

/// A source of shipping quotes.
///
/// The calculator ships with [`SimulatedCarriers`]; a real carrier API
/// client implements the same trait and slots in unchanged.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn quote(
        &self,
        package: &PackageInfo,
        route: &RouteInfo,
    ) -> Result<Vec<ShippingOption>, ShippingError>;
}

/// The built-in simulated provider. Optionally sleeps to mimic carrier
/// API latency; never fails beyond input validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedCarriers {
    latency: Duration,
}

impl SimulatedCarriers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latency: Duration::ZERO,
        }
    }

    /// Simulate carrier API latency on every quote.
    #[must_use]
    pub const fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl QuoteProvider for SimulatedCarriers {
    async fn quote(
        &self,
        package: &PackageInfo,
        route: &RouteInfo,
    ) -> Result<Vec<ShippingOption>, ShippingError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        calculate_shipping(package, route)
    }
}
