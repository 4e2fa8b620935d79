//! Integration tests for Balcao.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p balcao-integration-tests
//! ```
//!
//! The WooCommerce tests are `#[ignore]`d by default: they need a
//! reachable store and credentials in the environment (`WOOCOMMERCE_URL`,
//! `WOOCOMMERCE_CONSUMER_KEY`, `WOOCOMMERCE_CONSUMER_SECRET`).
//!
//! # Test Categories
//!
//! - `backup_roundtrip` - Full archive round-trips across all renderers
//! - `restore_errors` - Invalid/empty/partially-corrupt containers
//! - `woocommerce_live` - Live sync against a real store (ignored)

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use balcao_core::{Client, PaymentMethod, Price, Product, Sale, SaleItem, Vendor};
use balcao_engine::store::{
    LocalStore, NewClient, NewProduct, NewSale, NewVendor, Store,
};

/// Seed a representative dataset: 3 products, 2 clients, 1 vendor,
/// 1 sale, plus the four scalar settings documents.
pub async fn seed_representative(store: &LocalStore) {
    let products = [
        ("Caneca de ceramica", "Cozinha", 2500, 12),
        ("Tabua de corte", "Cozinha", 4890, 7),
        ("Vaso autoirrigavel", "Jardim", 3250, 3),
    ];
    for (description, category, centavos, quantity) in products {
        store
            .insert_product(NewProduct {
                description: description.to_string(),
                item_description: format!("{description} (demo)"),
                price: Price::from_centavos(centavos),
                quantity,
                category: category.to_string(),
                image: None,
                dimensions: None,
                weight: Some(Decimal::new(40, 2)),
            })
            .await
            .unwrap();
    }

    for (name, document) in [
        ("Maria Souza", "123.456.789-00"),
        ("Joao Lima", "987.654.321-00"),
    ] {
        store
            .insert_client(NewClient {
                name: name.to_string(),
                document: document.to_string(),
                cep: Some("01000-000".to_string()),
                phone: None,
                email: None,
            })
            .await
            .unwrap();
    }

    store
        .insert_vendor(NewVendor {
            name: "Distribuidora Horizonte".to_string(),
            document: "12.345.678/0001-00".to_string(),
            cep: None,
            phone: None,
            email: None,
        })
        .await
        .unwrap();

    store
        .record_sale(NewSale {
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            time: chrono::NaiveTime::from_hms_opt(10, 15, 0).unwrap(),
            client: "Maria Souza".to_string(),
            vendor: "Balcao".to_string(),
            items: vec![SaleItem {
                description: "Caneca de ceramica".to_string(),
                quantity: 2,
                price: Price::from_centavos(2500),
            }],
            payment_method: PaymentMethod::Pix,
            total: Price::from_centavos(5000),
        })
        .await
        .unwrap();

    for (key, value) in [
        ("configuracoes", serde_json::json!({"tema": "claro", "impressora": "termica-80mm"})),
        ("usuarios", serde_json::json!([{"nome": "operador", "perfil": "caixa"}])),
        ("rastreamento", serde_json::json!({"transportadora_padrao": "correios"})),
        ("logistica", serde_json::json!({"cep_origem": "01000-000"})),
    ] {
        store.put_setting(key, value).await.unwrap();
    }
}

/// A product stripped of its store-assigned primary key, for deep
/// comparison across a restore.
#[must_use]
pub fn product_identity(product: &Product) -> (String, String, Price, u32, String) {
    (
        product.description.clone(),
        product.item_description.clone(),
        product.price,
        product.quantity,
        product.category.clone(),
    )
}

/// A client stripped of its primary key.
#[must_use]
pub fn client_identity(client: &Client) -> (String, String, Option<String>) {
    (client.name.clone(), client.document.clone(), client.cep.clone())
}

/// A vendor stripped of its primary key.
#[must_use]
pub fn vendor_identity(vendor: &Vendor) -> (String, String) {
    (vendor.name.clone(), vendor.document.clone())
}

/// Sales keep their primary keys across restores, so they compare whole.
#[must_use]
pub fn sale_identity(sale: &Sale) -> Sale {
    sale.clone()
}
