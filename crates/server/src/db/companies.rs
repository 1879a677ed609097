//! Company repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use comptoir_core::{CompanyId, Tier};

use super::RepositoryError;
use crate::models::Company;

#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: i32,
    glpi_id: String,
    name: String,
    tier: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
    type Error = RepositoryError;

    fn try_from(row: CompanyRow) -> Result<Self, Self::Error> {
        let tier = Tier::from_label(&row.tier).ok_or_else(|| {
            RepositoryError::DataCorruption(format!("unknown tier in database: {}", row.tier))
        })?;

        Ok(Self {
            id: CompanyId::new(row.id),
            glpi_id: row.glpi_id,
            name: row.name,
            tier,
            created_at: row.created_at,
        })
    }
}

/// Repository for company database operations.
pub struct CompanyRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CompanyRepository<'a> {
    /// Create a new company repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a company by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, glpi_id, name, tier, created_at FROM company WHERE id = $1",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(Company::try_from).transpose()
    }

    /// List all companies.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Company>, RepositoryError> {
        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, glpi_id, name, tier, created_at FROM company ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Company::try_from).collect()
    }

    /// List the companies with the given IDs. Missing IDs are silently
    /// absent from the result.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_ids(&self, ids: &[CompanyId]) -> Result<Vec<Company>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().map(CompanyId::as_i32).collect();
        let rows = sqlx::query_as::<_, CompanyRow>(
            "SELECT id, glpi_id, name, tier, created_at FROM company WHERE id = ANY($1) ORDER BY id",
        )
        .bind(&raw)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Company::try_from).collect()
    }

    /// Create a new company.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the GLPI ID already exists.
    pub async fn create(
        &self,
        glpi_id: &str,
        name: &str,
        tier: Tier,
    ) -> Result<Company, RepositoryError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "INSERT INTO company (glpi_id, name, tier) VALUES ($1, $2, $3) \
             RETURNING id, glpi_id, name, tier, created_at",
        )
        .bind(glpi_id)
        .bind(name)
        .bind(tier.as_label())
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "glpi id"))?;

        Company::try_from(row)
    }

    /// Update a company.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the company does not exist,
    /// `Conflict` if the new GLPI ID collides with another company.
    pub async fn update(
        &self,
        id: CompanyId,
        glpi_id: &str,
        name: &str,
        tier: Tier,
    ) -> Result<Company, RepositoryError> {
        let row = sqlx::query_as::<_, CompanyRow>(
            "UPDATE company SET glpi_id = $2, name = $3, tier = $4 WHERE id = $1 \
             RETURNING id, glpi_id, name, tier, created_at",
        )
        .bind(id.as_i32())
        .bind(glpi_id)
        .bind(name)
        .bind(tier.as_label())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "glpi id"))?;

        row.map_or(Err(RepositoryError::NotFound), Company::try_from)
    }

    /// Delete a company and pull it from every user's company set and
    /// selection.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the company does not exist.
    pub async fn delete(&self, id: CompanyId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM company WHERE id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query(
            "UPDATE account SET companies = array_remove(companies, $1) \
             WHERE $1 = ANY(companies)",
        )
        .bind(id.as_i32())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
