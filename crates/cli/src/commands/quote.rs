//! Shipping quote command.
//!
//! # Usage
//!
//! ```bash
//! balcao quote -w 1 -l 20 -W 15 -H 10 --origin 01000-000 --destination 20000-000
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use balcao_core::{PackageInfo, RouteInfo};
use balcao_engine::shipping::{QuoteProvider, ShippingError, SimulatedCarriers};

/// Errors that can occur while quoting.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

/// Compute and print the quote table for a package.
///
/// # Errors
///
/// Returns an error when the package or route is invalid.
pub async fn run(
    weight: Decimal,
    length: Decimal,
    width: Decimal,
    height: Decimal,
    origin: &str,
    destination: &str,
) -> Result<(), QuoteError> {
    let package = PackageInfo {
        weight,
        length,
        width,
        height,
    };
    let route = RouteInfo {
        zip_code_origin: origin.to_string(),
        zip_code_destination: destination.to_string(),
    };

    let options = SimulatedCarriers::new().quote(&package, &route).await?;
    print_options(&options);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_options(options: &[balcao_core::ShippingOption]) {
    println!(
        "{:<12} {:<10} {:>10} {:>10} {:>8}  {}",
        "Transportadora", "Servico", "Preco", "Desconto", "Prazo", ""
    );
    for option in options {
        let mut tags = Vec::new();
        if option.is_cheapest {
            tags.push("mais barato");
        }
        if option.is_fastest {
            tags.push("mais rapido");
        }
        println!(
            "{:<12} {:<10} {:>10} {:>10} {:>5}-{:<2}  {}",
            option.carrier.name,
            option.service,
            option.price.display(),
            option.discount.display(),
            option.delivery_time.min,
            option.delivery_time.max,
            tags.join(", "),
        );
    }
}
