//! Product repository.
//!
//! All queries are runtime-checked (`sqlx::query_as`) against the
//! `product` table; rows are converted into the validated domain type,
//! rejecting unknown categories or malformed spec bags as data
//! corruption rather than letting them leak out.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use comptoir_core::{Category, ProductId, ProductSpecs};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

const PRODUCT_COLUMNS: &str = "id, sku, gn, name, brand, kind, model, description, description2, \
     price, pricet1, pricet2, pricet3, category, image, guarantee, specs, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    sku: String,
    gn: bool,
    name: String,
    brand: String,
    kind: String,
    model: String,
    description: String,
    description2: String,
    price: Option<f64>,
    pricet1: Option<f64>,
    pricet2: Option<f64>,
    pricet3: Option<f64>,
    category: String,
    image: String,
    guarantee: String,
    specs: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let category = Category::from_label(&row.category).ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "unknown category in database: {}",
                row.category
            ))
        })?;

        let specs = ProductSpecs::from_value(category, row.specs)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid specs: {e}")))?;

        Ok(Self {
            id: ProductId::new(row.id),
            sku: row.sku,
            gn: row.gn,
            name: row.name,
            brand: row.brand,
            kind: row.kind,
            model: row.model,
            description: row.description,
            description2: row.description2,
            price: row.price,
            pricet1: row.pricet1,
            pricet2: row.pricet2,
            pricet3: row.pricet3,
            category,
            image: row.image,
            guarantee: row.guarantee,
            specs,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored row is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Get a product by its SKU.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored row is invalid.
    pub async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE sku = $1"
        ))
        .bind(sku)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// List the whole catalogue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if any stored row is invalid.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// List products in one category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if any stored row is invalid.
    pub async fn list_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE category = $1 ORDER BY id"
        ))
        .bind(category.as_label())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Fetch a batch of products by ID (used to resolve cart lines).
    ///
    /// Missing IDs are silently absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if any stored row is invalid.
    pub async fn list_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product WHERE id = ANY($1)"
        ))
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Case-insensitive substring search across name, descriptions,
    /// brand, model and type; capped at 10 results.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if any stored row is invalid.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{query}%");
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM product \
             WHERE name ILIKE $1 OR description ILIKE $1 OR brand ILIKE $1 \
                OR model ILIKE $1 OR kind ILIKE $1 \
             ORDER BY id LIMIT 10"
        ))
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU already exists.
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product \
                 (sku, gn, name, brand, kind, model, description, description2, \
                  price, pricet1, pricet2, pricet3, category, image, guarantee, specs) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.sku)
        .bind(new.gn)
        .bind(&new.name)
        .bind(&new.brand)
        .bind(&new.kind)
        .bind(&new.model)
        .bind(&new.description)
        .bind(&new.description2)
        .bind(new.price)
        .bind(new.pricet1)
        .bind(new.pricet2)
        .bind(new.pricet3)
        .bind(new.category.as_label())
        .bind(&new.image)
        .bind(&new.guarantee)
        .bind(new.specs.to_value())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "sku"))?;

        Product::try_from(row)
    }

    /// Fully overwrite a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist,
    /// `Conflict` if the new SKU collides with another product.
    pub async fn update(&self, id: ProductId, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE product SET \
                 sku = $2, gn = $3, name = $4, brand = $5, kind = $6, model = $7, \
                 description = $8, description2 = $9, price = $10, pricet1 = $11, \
                 pricet2 = $12, pricet3 = $13, category = $14, image = $15, \
                 guarantee = $16, specs = $17, updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(&new.sku)
        .bind(new.gn)
        .bind(&new.name)
        .bind(&new.brand)
        .bind(&new.kind)
        .bind(&new.model)
        .bind(&new.description)
        .bind(&new.description2)
        .bind(new.price)
        .bind(new.pricet1)
        .bind(new.pricet2)
        .bind(new.pricet3)
        .bind(new.category.as_label())
        .bind(&new.image)
        .bind(&new.guarantee)
        .bind(new.specs.to_value())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "sku"))?;

        row.map_or(Err(RepositoryError::NotFound), Product::try_from)
    }

    /// Upsert by SKU: an existing product with the same SKU is fully
    /// overwritten with the new fields (not merged field-by-field).
    ///
    /// This is the importer's persistence primitive; each call is
    /// independently idempotent so a partial import is safe to re-run.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn upsert_by_sku(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO product \
                 (sku, gn, name, brand, kind, model, description, description2, \
                  price, pricet1, pricet2, pricet3, category, image, guarantee, specs) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             ON CONFLICT (sku) DO UPDATE SET \
                 gn = EXCLUDED.gn, name = EXCLUDED.name, brand = EXCLUDED.brand, \
                 kind = EXCLUDED.kind, model = EXCLUDED.model, \
                 description = EXCLUDED.description, description2 = EXCLUDED.description2, \
                 price = EXCLUDED.price, pricet1 = EXCLUDED.pricet1, \
                 pricet2 = EXCLUDED.pricet2, pricet3 = EXCLUDED.pricet3, \
                 category = EXCLUDED.category, image = EXCLUDED.image, \
                 guarantee = EXCLUDED.guarantee, specs = EXCLUDED.specs, \
                 updated_at = now() \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.sku)
        .bind(new.gn)
        .bind(&new.name)
        .bind(&new.brand)
        .bind(&new.kind)
        .bind(&new.model)
        .bind(&new.description)
        .bind(&new.description2)
        .bind(new.price)
        .bind(new.pricet1)
        .bind(new.pricet2)
        .bind(new.pricet3)
        .bind(new.category.as_label())
        .bind(&new.image)
        .bind(&new.guarantee)
        .bind(new.specs.to_value())
        .fetch_one(self.pool)
        .await?;

        Product::try_from(row)
    }
}
