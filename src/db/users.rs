use chrono::Utc;
use tracing::info;

use super::models::{DbUser, Role};
use super::sqlite::Storage;
use crate::auth::{hash_password, verify_password};
use crate::error::RollcallError;

const USER_COLUMNS: &str = "id, username, password_hash, role, created_at";

impl Storage {
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<DbUser, RollcallError> {
        let password_hash = hash_password(password)?;
        let mut tx = self.begin().await?;
        let user: DbUser = sqlx::query_as(&format!(
            "INSERT INTO users (username, password_hash, role, created_at)
             VALUES (?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| RollcallError::conflict_on_unique(e, "Username already exists"))?;
        tx.commit().await?;
        Ok(user)
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<DbUser>, RollcallError> {
        let user = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
            .bind(username)
            .fetch_optional(self.pool())
            .await?;
        Ok(user)
    }

    /// Look up `username` and check `password`; `None` on any mismatch.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<DbUser>, RollcallError> {
        let user = self.find_user(username).await?;
        Ok(user.filter(|u| verify_password(password, &u.password_hash)))
    }

    /// Create the configured admin account unless the username is taken.
    pub async fn seed_admin(&self, username: &str, password: &str) -> Result<(), RollcallError> {
        if self.find_user(username).await?.is_some() {
            return Ok(());
        }
        match self.create_user(username, password, Role::Admin).await {
            Ok(user) => {
                info!(username = %user.username, "seeded admin account");
                Ok(())
            }
            // Lost a race with another instance seeding the same name.
            Err(RollcallError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
