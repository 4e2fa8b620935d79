//! Seed the local store with demo data.
//!
//! Inserts a handful of products, clients and vendors so the quote,
//! backup and sync commands have something to chew on. Safe to run on a
//! fresh store; refuses to touch a store that already has products.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::info;

use balcao_core::{Dimensions, Price};
use balcao_engine::store::{NewClient, NewProduct, NewVendor, Store, StoreError};

use super::OpenError;

/// Errors that can occur while seeding.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Backup(#[from] super::backup::BackupCommandError),

    #[error("store already has products; refusing to seed")]
    NotEmpty,
}

/// Seed demo data into the configured store.
///
/// # Errors
///
/// Returns [`SeedError::NotEmpty`] when the store already has products.
pub async fn run() -> Result<(), SeedError> {
    let (config, store) = super::open_store().await?;

    if !store.products().await?.is_empty() {
        return Err(SeedError::NotEmpty);
    }

    for draft in demo_products() {
        store.insert_product(draft).await?;
    }
    for draft in demo_clients() {
        store.insert_client(draft).await?;
    }
    for draft in demo_vendors() {
        store.insert_vendor(draft).await?;
    }

    info!("demo data seeded");
    super::backup::auto_backup_if_enabled(&config, &store).await?;
    Ok(())
}

fn demo_products() -> Vec<NewProduct> {
    vec![
        NewProduct {
            description: "Caneca de ceramica".to_string(),
            item_description: "Caneca de ceramica esmaltada, 300ml".to_string(),
            price: Price::from_centavos(2500),
            quantity: 12,
            category: "Cozinha".to_string(),
            image: None,
            dimensions: Some(Dimensions {
                length: Decimal::new(12, 0),
                width: Decimal::new(9, 0),
                height: Decimal::new(10, 0),
            }),
            weight: Some(Decimal::new(35, 2)),
        },
        NewProduct {
            description: "Tabua de corte".to_string(),
            item_description: "Tabua de bambu 30x20cm".to_string(),
            price: Price::from_centavos(4890),
            quantity: 7,
            category: "Cozinha".to_string(),
            image: None,
            dimensions: Some(Dimensions {
                length: Decimal::new(30, 0),
                width: Decimal::new(20, 0),
                height: Decimal::new(2, 0),
            }),
            weight: Some(Decimal::new(60, 2)),
        },
        NewProduct {
            description: "Vaso autoirrigavel".to_string(),
            item_description: "Vaso plastico com reservatorio, cor areia".to_string(),
            price: Price::from_centavos(3250),
            quantity: 3,
            category: "Jardim".to_string(),
            image: None,
            dimensions: None,
            weight: Some(Decimal::new(40, 2)),
        },
    ]
}

fn demo_clients() -> Vec<NewClient> {
    vec![
        NewClient {
            name: "Maria Souza".to_string(),
            document: "123.456.789-00".to_string(),
            cep: Some("01000-000".to_string()),
            phone: Some("(11) 98888-0001".to_string()),
            email: Some("maria@example.com".to_string()),
        },
        NewClient {
            name: "Joao Lima".to_string(),
            document: "987.654.321-00".to_string(),
            cep: Some("20000-000".to_string()),
            phone: None,
            email: None,
        },
    ]
}

fn demo_vendors() -> Vec<NewVendor> {
    vec![NewVendor {
        name: "Distribuidora Horizonte".to_string(),
        document: "12.345.678/0001-00".to_string(),
        cep: Some("30000-000".to_string()),
        phone: Some("(31) 3333-0000".to_string()),
        email: Some("vendas@horizonte.example.com".to_string()),
    }]
}
