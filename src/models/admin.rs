use sqlx::{types::Uuid, FromRow, PgPool};

use crate::errors::{conflict_on_unique, ApiError};

#[derive(Debug, FromRow)]
pub struct Admin {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Admin>, ApiError> {
    let admin = sqlx::query_as::<_, Admin>(
        r#"
            SELECT id, username, password
            FROM admins
            WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(admin)
}

pub async fn create(pool: &PgPool, username: &str, password_hash: &str) -> Result<Uuid, ApiError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
            INSERT INTO admins (username, password)
            VALUES ($1, $2)
            RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "Admin with this username already exists"))?;

    Ok(id)
}
