//! Image business logic - Stores and retrieves generated images per user.

use crate::{
    core::{
        identity::normalize_user_id,
        non_blank,
        pagination::{Page, PageRequest, Pagination},
    },
    entities::{Image, image},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, Select, Set, prelude::*};
use serde::Deserialize;
use tracing::{debug, info, instrument};

/// Fields accepted when saving an image.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImage {
    pub user_id: Option<String>,
    pub prompt: Option<String>,
    pub image_url: Option<String>,
}

/// Saves an image for its owner.
///
/// `userId`, `prompt` and `imageUrl` are required; the error lists every
/// missing one.
#[instrument(skip(db, new_image))]
pub async fn create_image<C>(db: &C, new_image: NewImage) -> Result<image::Model>
where
    C: ConnectionTrait,
{
    let user_id = non_blank(new_image.user_id.as_ref());
    let prompt = non_blank(new_image.prompt.as_ref());
    let image_url = non_blank(new_image.image_url.as_ref());

    let (Some(user_id), Some(prompt), Some(image_url)) = (user_id, prompt, image_url) else {
        let missing: Vec<&str> = [
            ("userId", user_id),
            ("prompt", prompt),
            ("imageUrl", image_url),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.is_none().then_some(name))
        .collect();
        return Err(Error::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    };

    let internal_id = normalize_user_id(user_id)?;
    debug!("Resolved user {} to {}", user_id, internal_id);

    let image = image::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(internal_id),
        prompt: Set(prompt.to_string()),
        image_url: Set(image_url.to_string()),
        created_at: Set(chrono::Utc::now()),
    };
    let created = image.insert(db).await?;

    info!("Image created: {}", created.id);
    Ok(created)
}

fn scoped(id: Uuid, user_id: Option<&str>) -> Result<Select<Image>> {
    let mut query = Image::find().filter(image::Column::Id.eq(id));
    if let Some(user_id) = user_id {
        query = query.filter(image::Column::UserId.eq(normalize_user_id(user_id)?));
    }
    Ok(query)
}

/// Lists a user's images, newest first.
pub async fn list_images_for_user<C>(
    db: &C,
    user_id: &str,
    page: PageRequest,
) -> Result<Page<image::Model>>
where
    C: ConnectionTrait,
{
    let internal_id = normalize_user_id(user_id)?;
    let owned = Image::find().filter(image::Column::UserId.eq(internal_id));

    let total = owned.clone().count(db).await?;
    let items = owned
        .order_by_desc(image::Column::CreatedAt)
        .offset(page.offset())
        .limit(page.limit)
        .all(db)
        .await?;

    debug!("Fetched {} images for user {}", items.len(), user_id);
    Ok(Page {
        items,
        pagination: Pagination::new(page, total),
    })
}

/// Fetches one image. With `user_id`, an image owned by someone else is `NotFound`.
pub async fn get_image<C>(db: &C, id: Uuid, user_id: Option<&str>) -> Result<image::Model>
where
    C: ConnectionTrait,
{
    scoped(id, user_id)?
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: "Image" })
}

/// Deletes one image, with the same ownership rule as [`get_image`].
#[instrument(skip(db))]
pub async fn delete_image<C>(db: &C, id: Uuid, user_id: Option<&str>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut delete = Image::delete_many().filter(image::Column::Id.eq(id));
    if let Some(user_id) = user_id {
        delete = delete.filter(image::Column::UserId.eq(normalize_user_id(user_id)?));
    }

    let result = delete.exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NotFound { entity: "Image" });
    }

    info!("Image deleted: {}", id);
    Ok(())
}
