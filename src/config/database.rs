//! Database configuration module.
//!
//! This module handles the SeaORM connection and table creation. Tables are
//! generated from the entity definitions with `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust structs without hand-written SQL.

use crate::entities::{Credits, Image, Product, ProductImage, Variant, VariantRef};
use crate::errors::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityName, EntityTrait,
    Schema,
};
use tracing::{debug, info, instrument};

/// Opens the database named by `database_url`.
///
/// The returned handle is a connection pool; clones share the same pool.
#[instrument]
pub async fn create_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    // Every connection to `sqlite::memory:` opens a fresh, empty database
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Database connection opened");
    Ok(db)
}

/// Creates all tables that do not exist yet.
///
/// Parents are created before children so the foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, Product).await?;
    create_table(db, Variant).await?;
    create_table(db, ProductImage).await?;
    create_table(db, VariantRef).await?;
    create_table(db, Image).await?;
    create_table(db, Credits).await?;
    Ok(())
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: EntityTrait,
{
    debug!("Ensuring table {} exists", entity.table_name());

    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();

    db.execute(builder.build(&statement)).await?;
    Ok(())
}
