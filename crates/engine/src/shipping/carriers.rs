//! The simulated carrier catalog.
//!
//! Six carrier/service combinations with fixed price multipliers,
//! delivery windows, feature lists and promotional discounts. Prices are
//! a deterministic multiple of the base price computed from the package.

use rust_decimal::Decimal;

use balcao_core::{
    Carrier, DeliveryEstimate, DeliveryUnit, Price, ShippingOption,
};

/// One row of the carrier/service catalog.
pub(super) struct ServiceSpec {
    carrier_id: &'static str,
    carrier_name: &'static str,
    carrier_color: &'static str,
    service: &'static str,
    /// Price multiplier in hundredths (100 = 1.00x the base price).
    multiplier_centi: i64,
    /// Delivery window in days (min, max).
    delivery_days: (u32, u32),
    /// Promotional discount as a percentage of the final price.
    discount_pct: i64,
    features: &'static [&'static str],
}

impl ServiceSpec {
    /// Price this service for the given base price.
    pub(super) fn quote(&self, base_price: Decimal) -> ShippingOption {
        let price = (base_price * Decimal::new(self.multiplier_centi, 2)).round_dp(2);
        let discount = (price * Decimal::new(self.discount_pct, 2)).round_dp(2);
        ShippingOption {
            carrier: Carrier {
                id: self.carrier_id.to_string(),
                name: self.carrier_name.to_string(),
                color: self.carrier_color.to_string(),
            },
            service: self.service.to_string(),
            price: Price::new(price),
            delivery_time: DeliveryEstimate {
                min: self.delivery_days.0,
                max: self.delivery_days.1,
                unit: DeliveryUnit::Dias,
            },
            features: self.features.iter().map(ToString::to_string).collect(),
            discount: Price::new(discount),
            is_cheapest: false,
            is_fastest: false,
        }
    }
}

/// The fixed catalog. PAC anchors the scale at 1.00x (the economy
/// service); expedited services range up to 2.50x.
pub(super) const CATALOG: &[ServiceSpec] = &[
    ServiceSpec {
        carrier_id: "correios",
        carrier_name: "Correios",
        carrier_color: "#FFD400",
        service: "PAC",
        multiplier_centi: 100,
        delivery_days: (5, 9),
        discount_pct: 0,
        features: &["Rastreamento incluso", "Entrega economica"],
    },
    ServiceSpec {
        carrier_id: "correios",
        carrier_name: "Correios",
        carrier_color: "#FFD400",
        service: "SEDEX",
        multiplier_centi: 180,
        delivery_days: (1, 3),
        discount_pct: 0,
        features: &["Rastreamento incluso", "Entrega expressa"],
    },
    ServiceSpec {
        carrier_id: "jadlog",
        carrier_name: "Jadlog",
        carrier_color: "#C8102E",
        service: ".Package",
        multiplier_centi: 125,
        delivery_days: (3, 6),
        discount_pct: 10,
        features: &["Rastreamento incluso", "Coleta agendada"],
    },
    ServiceSpec {
        carrier_id: "jadlog",
        carrier_name: "Jadlog",
        carrier_color: "#C8102E",
        service: ".Com",
        multiplier_centi: 160,
        delivery_days: (2, 4),
        discount_pct: 5,
        features: &["Rastreamento incluso", "Entrega expressa"],
    },
    ServiceSpec {
        carrier_id: "loggi",
        carrier_name: "Loggi",
        carrier_color: "#00BAFF",
        service: "Expresso",
        multiplier_centi: 220,
        delivery_days: (1, 2),
        discount_pct: 0,
        features: &["Rastreamento em tempo real", "Seguro incluso"],
    },
    ServiceSpec {
        carrier_id: "azul",
        carrier_name: "Azul Cargo",
        carrier_color: "#003DA5",
        service: "Amanha",
        multiplier_centi: 250,
        delivery_days: (1, 1),
        discount_pct: 15,
        features: &["Entrega no proximo dia util", "Seguro incluso"],
    },
];
