//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod credits;
pub mod image;
pub mod product;
pub mod product_image;
pub mod variant;
pub mod variant_ref;

// Re-export specific types to avoid conflicts
pub use credits::{Column as CreditsColumn, Entity as Credits, Model as CreditsModel};
pub use image::{Column as ImageColumn, Entity as Image, Model as ImageModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_image::{
    Column as ProductImageColumn, Entity as ProductImage, Model as ProductImageModel,
};
pub use variant::{Column as VariantColumn, Entity as Variant, Model as VariantModel};
pub use variant_ref::{Column as VariantRefColumn, Entity as VariantRef, Model as VariantRefModel};
