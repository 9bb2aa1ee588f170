//! Credit ledger - Per-user generation credits.
//!
//! Balances only change through single SQL statements that read and write the
//! row together (`amount = amount - n WHERE amount >= n`, or an upsert that
//! increments), so concurrent requests, even from separate processes sharing
//! the database, can never spend the same credit twice or drive a balance
//! below zero.

use crate::{
    core::identity::normalize_user_id,
    entities::{Credits, credits},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{
    Set, TransactionTrait,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info, instrument};

/// Balance handed out on a user's first visit.
pub const DEFAULT_STARTING_CREDITS: i64 = 2;

fn ensure_positive(amount: i64) -> Result<()> {
    if amount < 1 {
        return Err(Error::validation("Amount must be positive"));
    }
    Ok(())
}

/// Returns the user's balance, creating it with `starting_amount` on first access.
///
/// Two first accesses racing each other both end up reading the same row;
/// the losing insert is ignored.
#[instrument(skip(db))]
pub async fn get_or_create_credits(
    db: &DatabaseConnection,
    user_id: &str,
    starting_amount: i64,
) -> Result<credits::Model> {
    let internal_id = normalize_user_id(user_id)?;

    if let Some(existing) = Credits::find_by_id(internal_id).one(db).await? {
        return Ok(existing);
    }

    let now = Utc::now();
    let row = credits::ActiveModel {
        user_id: Set(internal_id),
        amount: Set(starting_amount),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Credits::insert(row)
        .on_conflict(
            OnConflict::column(credits::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;
    debug!("Initialized credits for {} with {}", user_id, starting_amount);

    Credits::find_by_id(internal_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "User credits",
        })
}

/// Spends `amount` credits and returns the updated balance.
///
/// Never creates a balance: an unknown user is `NotFound`. When the balance is
/// too small nothing changes and `InsufficientCredits` reports both numbers.
#[instrument(skip(db))]
pub async fn use_credits(
    db: &DatabaseConnection,
    user_id: &str,
    amount: i64,
) -> Result<credits::Model> {
    ensure_positive(amount)?;
    let internal_id = normalize_user_id(user_id)?;

    let txn = db.begin().await?;

    // Conditional decrement: the check and the write are one statement
    let result = Credits::update_many()
        .col_expr(
            credits::Column::Amount,
            Expr::col(credits::Column::Amount).sub(amount),
        )
        .col_expr(credits::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(credits::Column::UserId.eq(internal_id))
        .filter(credits::Column::Amount.gte(amount))
        .exec(&txn)
        .await?;

    let current = Credits::find_by_id(internal_id).one(&txn).await?;

    if result.rows_affected == 0 {
        return match current {
            None => Err(Error::NotFound {
                entity: "User credits",
            }),
            Some(credits) => Err(Error::InsufficientCredits {
                current: credits.amount,
                required: amount,
            }),
        };
    }

    let updated = current.ok_or(Error::NotFound {
        entity: "User credits",
    })?;
    txn.commit().await?;

    info!(
        "User {} used {} credits (remaining: {})",
        user_id, amount, updated.amount
    );
    Ok(updated)
}

/// Adds `amount` credits, creating the balance with exactly `amount` if the
/// user has none yet.
#[instrument(skip(db))]
pub async fn add_credits(
    db: &DatabaseConnection,
    user_id: &str,
    amount: i64,
) -> Result<credits::Model> {
    ensure_positive(amount)?;
    let internal_id = normalize_user_id(user_id)?;

    let now = Utc::now();
    let row = credits::ActiveModel {
        user_id: Set(internal_id),
        amount: Set(amount),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let txn = db.begin().await?;
    // The guard skips the update instead of letting SQLite promote the sum to REAL
    let written = Credits::insert(row)
        .on_conflict(
            OnConflict::column(credits::Column::UserId)
                .value(
                    credits::Column::Amount,
                    Expr::col((Credits, credits::Column::Amount)).add(amount),
                )
                .update_column(credits::Column::UpdatedAt)
                .action_and_where(
                    Expr::col((Credits, credits::Column::Amount)).lte(i64::MAX - amount),
                )
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

    if written == 0 {
        return Err(Error::validation("Amount would overflow the credit balance"));
    }

    let updated = Credits::find_by_id(internal_id)
        .one(&txn)
        .await?
        .ok_or(Error::NotFound {
            entity: "User credits",
        })?;
    txn.commit().await?;

    info!(
        "Credits added for user {}: {} (total: {})",
        user_id, amount, updated.amount
    );
    Ok(updated)
}

/// Sets the balance to zero, creating it if absent. Idempotent.
#[instrument(skip(db))]
pub async fn reset_credits(db: &DatabaseConnection, user_id: &str) -> Result<credits::Model> {
    let internal_id = normalize_user_id(user_id)?;

    let now = Utc::now();
    let row = credits::ActiveModel {
        user_id: Set(internal_id),
        amount: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
    };

    Credits::insert(row)
        .on_conflict(
            OnConflict::column(credits::Column::UserId)
                .update_columns([credits::Column::Amount, credits::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    info!("Credits reset for user {}", user_id);
    Credits::find_by_id(internal_id)
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "User credits",
        })
}
