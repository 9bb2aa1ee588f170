//! Shared test utilities.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test records with sensible defaults.

use crate::{
    config::database::{create_connection, create_tables},
    core::{
        image::{self, NewImage},
        product::{NewProduct, NewProductImage, NewVariant},
    },
    entities,
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = create_connection("sqlite::memory:").await?;
    create_tables(&db).await?;
    Ok(db)
}

/// Creates a file-backed `SQLite` database with a multi-connection pool.
///
/// Unlike [`setup_test_db`], concurrent callers really run on separate
/// connections. The database lives as long as the returned `TempDir`.
pub async fn setup_file_test_db() -> Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.sqlite").display());
    let db = create_connection(&url).await?;
    create_tables(&db).await?;
    Ok((dir, db))
}

/// Creates a test image owned by `user_id`.
///
/// # Defaults
/// * `imageUrl`: `"https://cdn.example.com/generated.png"`
pub async fn create_test_image(
    db: &DatabaseConnection,
    user_id: &str,
    prompt: &str,
) -> Result<entities::image::Model> {
    image::create_image(
        db,
        NewImage {
            user_id: Some(user_id.to_string()),
            prompt: Some(prompt.to_string()),
            image_url: Some("https://cdn.example.com/generated.png".to_string()),
        },
    )
    .await
}

fn sample_variant(id: i64, is_default: bool, size_option: i64) -> NewVariant {
    NewVariant {
        id: Some(id),
        title: Some("Unisex Basic T-shirt".to_string()),
        sku: Some(format!("tshirt-{id}")),
        price: Some(2500),
        price_formatted: Some("25.00".to_string()),
        cost: Some(1500),
        profit: Some(1000),
        is_enabled: Some(true),
        is_default: Some(is_default),
        options: Some(serde_json::json!([831, size_option])),
    }
}

fn sample_image(position: &str, is_default: bool) -> NewProductImage {
    NewProductImage {
        src: Some(format!(
            "https://images-api.printify.com/mockup/p-1/17393/{position}.jpg"
        )),
        position: Some(position.to_string()),
        is_default: Some(is_default),
        is_selected_for_publishing: Some(true),
        order: None,
        variant_ids: Some(vec![17391, 17393]),
    }
}

/// A t-shirt with two variants and two mockups (front, back), each mockup
/// referencing both variants.
pub fn sample_product(user_id: &str) -> NewProduct {
    NewProduct {
        user_id: Some(user_id.to_string()),
        printify_id: Some("6862a2e379a2a4e66f05b610".to_string()),
        title: Some("AI T-shirt".to_string()),
        description: Some("A t-shirt with a generated print".to_string()),
        blueprint_id: Some(5),
        print_provider_id: Some(1),
        margin_applied: Some(40.0),
        original_image_url: Some("https://cdn.example.com/original.jpg".to_string()),
        printify_image_id: Some("6861b339b9939664017b3ee1".to_string()),
        variants: Some(vec![
            sample_variant(17391, true, 13),
            sample_variant(17393, false, 15),
        ]),
        images: Some(vec![sample_image("front", true), sample_image("back", false)]),
    }
}
