//! User repository.
//!
//! Password hashes never leave this module except through
//! [`UserRepository::get_password_hash`], which only the auth paths use.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use comptoir_core::{CompanyId, Email, UserId, UserRole};

use super::RepositoryError;
use crate::models::{User, UserDraft};

const USER_COLUMNS: &str =
    "id, email, name, glpi_id, role, specs, companies, selected_company, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: String,
    glpi_id: String,
    role: String,
    specs: serde_json::Value,
    companies: Vec<i32>,
    selected_company: Option<i32>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let role: UserRole = row.role.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid role in database: {e}"))
        })?;

        let specs = match row.specs {
            serde_json::Value::Object(map) => map,
            other => {
                return Err(RepositoryError::DataCorruption(format!(
                    "user specs is not an object: {other}"
                )));
            }
        };

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            glpi_id: row.glpi_id,
            role,
            specs,
            companies: row.companies.into_iter().map(CompanyId::new).collect(),
            selected_company: row.selected_company.map(CompanyId::new),
            created_at: row.created_at,
        })
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM account WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM account WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM account ORDER BY id"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    /// Get a user and their password hash by email, for login.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct HashRow {
            #[sqlx(flatten)]
            user: UserRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, HashRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM account WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((User::try_from(r.user)?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// Get just the password hash for a user, for password changes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn get_password_hash_by_id(&self, id: UserId) -> Result<String, RepositoryError> {
        let hash: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM account WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(self.pool)
                .await?;

        hash.map(|(h,)| h).ok_or(RepositoryError::NotFound)
    }

    /// True when the email is used by a user other than `exclude`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn email_in_use(
        &self,
        email: &Email,
        exclude: Option<UserId>,
    ) -> Result<bool, RepositoryError> {
        let found: Option<(i32,)> = sqlx::query_as(
            "SELECT id FROM account WHERE email = $1 AND id IS DISTINCT FROM $2 LIMIT 1",
        )
        .bind(email.as_str())
        .bind(exclude.map(|id| id.as_i32()))
        .fetch_optional(self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// True when the GLPI ID is used by a user other than `exclude`.
    /// The empty string means "not linked" and is never in use.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn glpi_id_in_use(
        &self,
        glpi_id: &str,
        exclude: Option<UserId>,
    ) -> Result<bool, RepositoryError> {
        if glpi_id.is_empty() {
            return Ok(false);
        }

        let found: Option<(i32,)> = sqlx::query_as(
            "SELECT id FROM account WHERE glpi_id = $1 AND id IS DISTINCT FROM $2 LIMIT 1",
        )
        .bind(glpi_id)
        .bind(exclude.map(|id| id.as_i32()))
        .fetch_optional(self.pool)
        .await?;

        Ok(found.is_some())
    }

    /// Create a new user.
    ///
    /// The draft is normalized (selected-company and client-spec
    /// invariants) before writing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email or GLPI ID is
    /// already taken.
    pub async fn create(
        &self,
        mut draft: UserDraft,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        draft.normalize();

        let companies: Vec<i32> = draft.companies.iter().map(CompanyId::as_i32).collect();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO account \
                 (email, password_hash, name, glpi_id, role, specs, companies, selected_company) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(draft.email.as_str())
        .bind(password_hash)
        .bind(&draft.name)
        .bind(&draft.glpi_id)
        .bind(draft.role.to_string())
        .bind(serde_json::Value::Object(draft.specs.clone()))
        .bind(&companies)
        .bind(draft.selected_company.map(|id| id.as_i32()))
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "email or glpi id"))?;

        User::try_from(row)
    }

    /// Update a user; when `password_hash` is given the credential is
    /// replaced too.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist,
    /// `Conflict` on email/GLPI-ID collisions.
    pub async fn update(
        &self,
        id: UserId,
        mut draft: UserDraft,
        password_hash: Option<&str>,
    ) -> Result<User, RepositoryError> {
        draft.normalize();

        let companies: Vec<i32> = draft.companies.iter().map(CompanyId::as_i32).collect();
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "UPDATE account SET \
                 email = $2, name = $3, glpi_id = $4, role = $5, specs = $6, \
                 companies = $7, selected_company = $8, \
                 password_hash = COALESCE($9, password_hash) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id.as_i32())
        .bind(draft.email.as_str())
        .bind(&draft.name)
        .bind(&draft.glpi_id)
        .bind(draft.role.to_string())
        .bind(serde_json::Value::Object(draft.specs.clone()))
        .bind(&companies)
        .bind(draft.selected_company.map(|id| id.as_i32()))
        .bind(password_hash)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "email or glpi id"))?;

        row.map_or(Err(RepositoryError::NotFound), User::try_from)
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let deleted = sqlx::query("DELETE FROM account WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Set (or clear) the selected company.
    ///
    /// The selected-company invariant is enforced in the same statement:
    /// a newly selected company is appended to the company set when it is
    /// not already listed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_selected_company(
        &self,
        id: UserId,
        company: Option<CompanyId>,
    ) -> Result<(), RepositoryError> {
        let updated = sqlx::query(
            "UPDATE account SET \
                 selected_company = $2, \
                 companies = CASE \
                     WHEN $2 IS NOT NULL AND NOT ($2 = ANY(companies)) \
                     THEN array_append(companies, $2) \
                     ELSE companies \
                 END \
             WHERE id = $1",
        )
        .bind(id.as_i32())
        .bind(company.map(|c| c.as_i32()))
        .execute(self.pool)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace a user's password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let updated = sqlx::query("UPDATE account SET password_hash = $2 WHERE id = $1")
            .bind(id.as_i32())
            .bind(password_hash)
            .execute(self.pool)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
