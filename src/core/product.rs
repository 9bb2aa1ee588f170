//! Product business logic - Handles Printify products and their children.
//!
//! A product owns its variants and its mockup images; each mockup image owns
//! the list of variant ids it depicts. Creation writes the whole tree in one
//! database transaction, and deletion removes the whole tree in one
//! transaction, so readers never observe a partial product.

use crate::{
    core::{
        identity::normalize_user_id,
        non_blank,
        pagination::{Page, PageRequest, Pagination},
    },
    entities::{
        Product, ProductImage, Variant, VariantRef, product, product_image, variant, variant_ref,
    },
    errors::{Error, Result},
};
use sea_orm::{
    PaginatorTrait, QueryOrder, QuerySelect, Select, Set, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Variant as sent by the Printify integration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVariant {
    /// Printify variant id
    pub id: Option<i64>,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub price: Option<i64>,
    pub price_formatted: Option<String>,
    pub cost: Option<i64>,
    pub profit: Option<i64>,
    pub is_enabled: Option<bool>,
    pub is_default: Option<bool>,
    pub options: Option<Json>,
}

/// Mockup image as sent by the Printify integration (snake_case on the wire).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewProductImage {
    pub src: Option<String>,
    pub position: Option<String>,
    pub is_default: Option<bool>,
    pub is_selected_for_publishing: Option<bool>,
    pub order: Option<i32>,
    pub variant_ids: Option<Vec<i64>>,
}

/// Fields accepted when saving a product.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub user_id: Option<String>,
    pub printify_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub blueprint_id: Option<i32>,
    pub print_provider_id: Option<i32>,
    pub margin_applied: Option<f64>,
    pub original_image_url: Option<String>,
    pub printify_image_id: Option<String>,
    pub variants: Option<Vec<NewVariant>>,
    pub images: Option<Vec<NewProductImage>>,
}

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub title: Option<String>,
    /// `Some(None)` (an explicit `null`) clears the description
    #[serde(default, deserialize_with = "null_as_clear")]
    pub description: Option<Option<String>>,
    pub margin_applied: Option<f64>,
}

/// Only called when the key is present, so `null` becomes `Some(None)`.
fn null_as_clear<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// A mockup image together with the variant ids it depicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImageWithVariants {
    #[serde(flatten)]
    pub image: product_image::Model,
    pub variant_ids: Vec<variant_ref::Model>,
}

/// A product with all of its children, each list in creation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductWithChildren {
    #[serde(flatten)]
    pub product: product::Model,
    pub variants: Vec<variant::Model>,
    pub images: Vec<ProductImageWithVariants>,
}

fn check_margin(margin: f64) -> Result<f64> {
    if !margin.is_finite() {
        return Err(Error::validation("marginApplied must be a finite number"));
    }
    Ok(margin)
}

fn build_variant(
    index: usize,
    product_id: Uuid,
    new_variant: NewVariant,
) -> Result<variant::ActiveModel> {
    let printify_variant_id = new_variant
        .id
        .ok_or_else(|| Error::validation(format!("variants[{index}].id is required")))?;
    let title = new_variant
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| Error::validation(format!("variants[{index}].title is required")))?;

    Ok(variant::ActiveModel {
        product_id: Set(product_id),
        printify_variant_id: Set(printify_variant_id),
        title: Set(title),
        sku: Set(new_variant.sku),
        price: Set(new_variant.price.unwrap_or(0)),
        price_formatted: Set(new_variant.price_formatted),
        cost: Set(new_variant.cost),
        profit: Set(new_variant.profit),
        is_enabled: Set(new_variant.is_enabled.unwrap_or(true)),
        is_default: Set(new_variant.is_default.unwrap_or(false)),
        options: Set(new_variant
            .options
            .unwrap_or_else(|| Json::Array(Vec::new()))),
        ..Default::default()
    })
}

fn build_image(
    index: usize,
    product_id: Uuid,
    new_image: &NewProductImage,
) -> Result<product_image::ActiveModel> {
    let src = non_blank(new_image.src.as_ref())
        .ok_or_else(|| Error::validation(format!("images[{index}].src is required")))?;

    Ok(product_image::ActiveModel {
        product_id: Set(product_id),
        src: Set(src.to_string()),
        position: Set(new_image.position.clone()),
        is_default: Set(new_image.is_default.unwrap_or(false)),
        is_selected_for_publishing: Set(new_image.is_selected_for_publishing.unwrap_or(false)),
        order: Set(new_image.order),
        ..Default::default()
    })
}

/// Saves a product with its variants, mockup images and variant references.
///
/// `userId`, `printifyId`, `title`, `blueprintId` and `printProviderId` are
/// required. Everything is written in one transaction: if any child row is
/// rejected, nothing is persisted.
#[instrument(skip(db, new_product))]
pub async fn create_product(
    db: &DatabaseConnection,
    new_product: NewProduct,
) -> Result<ProductWithChildren> {
    let user_id = non_blank(new_product.user_id.as_ref());
    let printify_id = non_blank(new_product.printify_id.as_ref());
    let title = non_blank(new_product.title.as_ref());

    let (
        Some(user_id),
        Some(printify_id),
        Some(title),
        Some(blueprint_id),
        Some(print_provider_id),
    ) = (
        user_id,
        printify_id,
        title,
        new_product.blueprint_id,
        new_product.print_provider_id,
    )
    else {
        let missing: Vec<&str> = [
            ("userId", user_id.is_none()),
            ("printifyId", printify_id.is_none()),
            ("title", title.is_none()),
            ("blueprintId", new_product.blueprint_id.is_none()),
            ("printProviderId", new_product.print_provider_id.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect();
        return Err(Error::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    let internal_id = normalize_user_id(user_id)?;
    let margin_applied = check_margin(new_product.margin_applied.unwrap_or(0.0))?;
    debug!("Resolved user {} to {}", user_id, internal_id);

    let now = chrono::Utc::now();
    let product_id = Uuid::new_v4();
    let product_row = product::ActiveModel {
        id: Set(product_id),
        user_id: Set(internal_id),
        printify_id: Set(printify_id.to_string()),
        title: Set(title.to_string()),
        description: Set(new_product.description),
        blueprint_id: Set(blueprint_id),
        print_provider_id: Set(print_provider_id),
        margin_applied: Set(margin_applied),
        original_image_url: Set(new_product.original_image_url.unwrap_or_default()),
        printify_image_id: Set(new_product.printify_image_id.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    // Any early return below drops `txn`, which rolls the whole tree back
    let txn = db.begin().await?;
    let product = product_row.insert(&txn).await?;

    let mut variants = Vec::new();
    let new_variants = new_product.variants.unwrap_or_default();
    for (index, new_variant) in new_variants.into_iter().enumerate() {
        let row = build_variant(index, product_id, new_variant)?;
        variants.push(row.insert(&txn).await?);
    }

    let mut images = Vec::new();
    let new_images = new_product.images.unwrap_or_default();
    for (index, new_image) in new_images.iter().enumerate() {
        let image = build_image(index, product_id, new_image)?.insert(&txn).await?;

        let mut variant_ids = Vec::new();
        for variant_id in new_image.variant_ids.iter().flatten() {
            let row = variant_ref::ActiveModel {
                product_image_id: Set(image.id),
                variant_id: Set(*variant_id),
                ..Default::default()
            };
            variant_ids.push(row.insert(&txn).await?);
        }
        images.push(ProductImageWithVariants { image, variant_ids });
    }

    txn.commit().await?;

    info!(
        "Product created: {} ({} variants, {} images)",
        product.id,
        variants.len(),
        images.len()
    );
    Ok(ProductWithChildren {
        product,
        variants,
        images,
    })
}

/// Attaches children to each product, keeping the input order.
async fn load_children<C>(
    db: &C,
    products: Vec<product::Model>,
) -> Result<Vec<ProductWithChildren>>
where
    C: ConnectionTrait,
{
    let product_ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

    let variants = Variant::find()
        .filter(variant::Column::ProductId.is_in(product_ids.clone()))
        .order_by_asc(variant::Column::Id)
        .all(db)
        .await?;
    let images = ProductImage::find()
        .filter(product_image::Column::ProductId.is_in(product_ids))
        .order_by_asc(product_image::Column::Id)
        .all(db)
        .await?;
    let image_ids: Vec<i64> = images.iter().map(|i| i.id).collect();
    let refs = VariantRef::find()
        .filter(variant_ref::Column::ProductImageId.is_in(image_ids))
        .order_by_asc(variant_ref::Column::Id)
        .all(db)
        .await?;

    let mut variants_by_product: HashMap<Uuid, Vec<variant::Model>> = HashMap::new();
    for variant in variants {
        variants_by_product
            .entry(variant.product_id)
            .or_default()
            .push(variant);
    }

    let mut refs_by_image: HashMap<i64, Vec<variant_ref::Model>> = HashMap::new();
    for variant_ref in refs {
        refs_by_image
            .entry(variant_ref.product_image_id)
            .or_default()
            .push(variant_ref);
    }

    let mut images_by_product: HashMap<Uuid, Vec<ProductImageWithVariants>> = HashMap::new();
    for image in images {
        let variant_ids = refs_by_image.remove(&image.id).unwrap_or_default();
        images_by_product
            .entry(image.product_id)
            .or_default()
            .push(ProductImageWithVariants { image, variant_ids });
    }

    Ok(products
        .into_iter()
        .map(|product| ProductWithChildren {
            variants: variants_by_product.remove(&product.id).unwrap_or_default(),
            images: images_by_product.remove(&product.id).unwrap_or_default(),
            product,
        })
        .collect())
}

fn scoped(id: Uuid, user_id: Option<&str>) -> Result<Select<Product>> {
    let mut query = Product::find().filter(product::Column::Id.eq(id));
    if let Some(user_id) = user_id {
        query = query.filter(product::Column::UserId.eq(normalize_user_id(user_id)?));
    }
    Ok(query)
}

async fn find_scoped<C>(db: &C, id: Uuid, user_id: Option<&str>) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    scoped(id, user_id)?
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Product" })
}

/// Lists a user's products with their children, newest first.
pub async fn list_products_for_user<C>(
    db: &C,
    user_id: &str,
    page: PageRequest,
) -> Result<Page<ProductWithChildren>>
where
    C: ConnectionTrait,
{
    let internal_id = normalize_user_id(user_id)?;
    let owned = Product::find().filter(product::Column::UserId.eq(internal_id));

    let total = owned.clone().count(db).await?;
    let products = owned
        .order_by_desc(product::Column::CreatedAt)
        .offset(page.offset())
        .limit(page.limit)
        .all(db)
        .await?;

    debug!("Fetched {} products for user {}", products.len(), user_id);
    Ok(Page {
        items: load_children(db, products).await?,
        pagination: Pagination::new(page, total),
    })
}

/// Fetches one product with children. With `user_id`, a product owned by
/// someone else is `NotFound`.
pub async fn get_product<C>(
    db: &C,
    id: Uuid,
    user_id: Option<&str>,
) -> Result<ProductWithChildren>
where
    C: ConnectionTrait,
{
    let product = find_scoped(db, id, user_id).await?;
    let mut loaded = load_children(db, vec![product]).await?;
    loaded.pop().ok_or(Error::NotFound { entity: "Product" })
}

/// Applies the provided fields and returns the updated product with children.
///
/// A blank `title` is ignored.
#[instrument(skip(db, changes))]
pub async fn update_product<C>(
    db: &C,
    id: Uuid,
    user_id: Option<&str>,
    changes: ProductChanges,
) -> Result<ProductWithChildren>
where
    C: ConnectionTrait,
{
    let existing = find_scoped(db, id, user_id).await?;
    let mut product: product::ActiveModel = existing.into();

    if let Some(title) = changes.title.filter(|t| !t.trim().is_empty()) {
        product.title = Set(title);
    }
    if let Some(description) = changes.description {
        product.description = Set(description);
    }
    if let Some(margin) = changes.margin_applied {
        product.margin_applied = Set(check_margin(margin)?);
    }
    product.updated_at = Set(chrono::Utc::now());

    let updated = product.update(db).await?;
    info!("Product updated: {}", updated.id);

    let mut loaded = load_children(db, vec![updated]).await?;
    loaded.pop().ok_or(Error::NotFound { entity: "Product" })
}

/// Deletes a product and all of its descendants, with the same ownership rule
/// as [`get_product`].
#[instrument(skip(db))]
pub async fn delete_product(
    db: &DatabaseConnection,
    id: Uuid,
    user_id: Option<&str>,
) -> Result<()> {
    let txn = db.begin().await?;
    let product = find_scoped(&txn, id, user_id).await?;

    let image_ids: Vec<i64> = ProductImage::find()
        .filter(product_image::Column::ProductId.eq(product.id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|image| image.id)
        .collect();

    VariantRef::delete_many()
        .filter(variant_ref::Column::ProductImageId.is_in(image_ids))
        .exec(&txn)
        .await?;
    ProductImage::delete_many()
        .filter(product_image::Column::ProductId.eq(product.id))
        .exec(&txn)
        .await?;
    Variant::delete_many()
        .filter(variant::Column::ProductId.eq(product.id))
        .exec(&txn)
        .await?;

    let result = Product::delete_by_id(product.id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "Product" });
    }
    txn.commit().await?;

    info!("Product deleted: {}", id);
    Ok(())
}
