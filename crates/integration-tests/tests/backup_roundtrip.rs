//! Backup round-trip tests.
//!
//! For every renderer: create an archive from a seeded store, restore it
//! into a fresh store, and check the collections are deep-equal to the
//! originals except for reassigned product/client/vendor primary keys.

#![allow(clippy::unwrap_used)]

use balcao_engine::backup::{
    apply_restore, create_backup, restore_backup, BackupFormat,
};
use balcao_engine::store::{LocalStore, Store};
use balcao_integration_tests::{
    client_identity, product_identity, seed_representative, vendor_identity,
};

async fn roundtrip(format: BackupFormat) {
    let source = LocalStore::in_memory();
    seed_representative(&source).await;

    let bytes = create_backup(&source, format).await.unwrap();
    let restored = restore_backup(&bytes).unwrap();
    assert_eq!(restored.sections.len(), 8, "{format}: all sections recovered");

    let manifest = restored.manifest.as_ref().unwrap();
    assert_eq!(manifest.format, format);
    assert_eq!(manifest.sections["Produtos"], 3);
    assert_eq!(manifest.sections["Clientes"], 2);

    let target = LocalStore::in_memory();
    let report = apply_restore(&target, &restored).await.unwrap();
    assert_eq!(report.sections_restored, 8);
    assert_eq!(report.records_failed, 0, "{format}: no write failures");
    assert!(report.skipped.is_empty());

    // Collections match modulo reassigned primary keys.
    let source_products: Vec<_> = source
        .products()
        .await
        .unwrap()
        .iter()
        .map(product_identity)
        .collect();
    let target_products: Vec<_> = target
        .products()
        .await
        .unwrap()
        .iter()
        .map(product_identity)
        .collect();
    assert_eq!(source_products, target_products, "{format}: products");

    let source_clients: Vec<_> = source
        .clients()
        .await
        .unwrap()
        .iter()
        .map(client_identity)
        .collect();
    let target_clients: Vec<_> = target
        .clients()
        .await
        .unwrap()
        .iter()
        .map(client_identity)
        .collect();
    assert_eq!(source_clients, target_clients, "{format}: clients");

    let source_vendors: Vec<_> = source
        .vendors()
        .await
        .unwrap()
        .iter()
        .map(vendor_identity)
        .collect();
    let target_vendors: Vec<_> = target
        .vendors()
        .await
        .unwrap()
        .iter()
        .map(vendor_identity)
        .collect();
    assert_eq!(source_vendors, target_vendors, "{format}: vendors");

    // Sales are immutable and keep their IDs: whole-record equality.
    assert_eq!(
        source.sales().await.unwrap(),
        target.sales().await.unwrap(),
        "{format}: sales"
    );

    // Scalar sections land on their settings keys verbatim.
    for key in ["configuracoes", "usuarios", "rastreamento", "logistica"] {
        assert_eq!(
            source.setting(key).await.unwrap(),
            target.setting(key).await.unwrap(),
            "{format}: setting {key}"
        );
    }
}

#[tokio::test]
async fn roundtrip_structured_data() {
    roundtrip(BackupFormat::StructuredData).await;
}

#[tokio::test]
async fn roundtrip_tabular_markdown() {
    roundtrip(BackupFormat::TabularMarkdown).await;
}

#[tokio::test]
async fn roundtrip_component_view() {
    roundtrip(BackupFormat::ComponentView).await;
}

#[tokio::test]
async fn roundtrip_through_a_file_on_disk() {
    let source = LocalStore::in_memory();
    seed_representative(&source).await;

    let bytes = create_backup(&source, BackupFormat::StructuredData)
        .await
        .unwrap();

    let path = std::env::temp_dir().join(format!(
        "balcao-roundtrip-{}.zip",
        std::process::id()
    ));
    tokio::fs::write(&path, &bytes).await.unwrap();
    let read_back = tokio::fs::read(&path).await.unwrap();
    let _ = tokio::fs::remove_file(&path).await;

    let restored = restore_backup(&read_back).unwrap();
    assert_eq!(restored.sections.len(), 8);
}

#[tokio::test]
async fn restoring_twice_is_idempotent() {
    let store = LocalStore::in_memory();
    seed_representative(&store).await;

    let bytes = create_backup(&store, BackupFormat::TabularMarkdown)
        .await
        .unwrap();
    let restored = restore_backup(&bytes).unwrap();

    apply_restore(&store, &restored).await.unwrap();
    let after_first: Vec<_> = store
        .products()
        .await
        .unwrap()
        .iter()
        .map(product_identity)
        .collect();

    apply_restore(&store, &restored).await.unwrap();
    let after_second: Vec<_> = store
        .products()
        .await
        .unwrap()
        .iter()
        .map(product_identity)
        .collect();

    assert_eq!(after_first, after_second);
    assert_eq!(store.sales().await.unwrap().len(), 1);
}
