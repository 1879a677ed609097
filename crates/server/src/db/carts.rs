//! Cart repository.
//!
//! A cart is one row per (user, company) pair; the line-item list is a
//! JSONB value persisted wholesale. Creation goes through an atomic
//! insert-if-absent-else-fetch upsert so concurrent first-adds for the
//! same pair converge on a single row (the unique constraint rejects the
//! losing insert). The later items write is last-write-wins by design.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use comptoir_core::{CartId, CompanyId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItem};

const CART_COLUMNS: &str = "id, user_id, company_id, items, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CartRow {
    id: i32,
    user_id: i32,
    company_id: i32,
    items: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CartRow> for Cart {
    type Error = RepositoryError;

    fn try_from(row: CartRow) -> Result<Self, Self::Error> {
        let items: Vec<CartItem> = serde_json::from_value(row.items)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid cart items: {e}")))?;

        Ok(Self {
            id: CartId::new(row.id),
            user: UserId::new(row.user_id),
            company: CompanyId::new(row.company_id),
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the cart for a (user, company) pair, if one exists.
    ///
    /// Never creates a record.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user: UserId,
        company: CompanyId,
    ) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "SELECT {CART_COLUMNS} FROM cart WHERE user_id = $1 AND company_id = $2"
        ))
        .bind(user.as_i32())
        .bind(company.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Cart::try_from).transpose()
    }

    /// Get the cart for a (user, company) pair, creating an empty one if
    /// absent.
    ///
    /// The no-op `DO UPDATE` makes the statement return the existing row
    /// instead of failing, turning check-then-insert into one atomic
    /// round trip.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn get_or_create(
        &self,
        user: UserId,
        company: CompanyId,
    ) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(&format!(
            "INSERT INTO cart (user_id, company_id, items) VALUES ($1, $2, '[]'::jsonb) \
             ON CONFLICT ON CONSTRAINT cart_user_company_key \
             DO UPDATE SET items = cart.items \
             RETURNING {CART_COLUMNS}"
        ))
        .bind(user.as_i32())
        .bind(company.as_i32())
        .fetch_one(self.pool)
        .await?;

        Cart::try_from(row)
    }

    /// Replace a cart's line-item list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the cart row vanished.
    pub async fn save_items(
        &self,
        id: CartId,
        items: &[CartItem],
    ) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(items)
            .map_err(|e| RepositoryError::DataCorruption(format!("unserializable items: {e}")))?;

        let updated = sqlx::query("UPDATE cart SET items = $2, updated_at = now() WHERE id = $1")
            .bind(id.as_i32())
            .bind(value)
            .execute(self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
