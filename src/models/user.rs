use sqlx::{types::Uuid, FromRow, PgPool};

use crate::errors::{conflict_on_unique, ApiError};

#[derive(Debug, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password: String,
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(
        r#"
            SELECT id, username, password
            FROM users
            WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn create(pool: &PgPool, username: &str, password_hash: &str) -> Result<Uuid, ApiError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
            INSERT INTO users (username, password)
            VALUES ($1, $2)
            RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, "User with this username already exists"))?;

    Ok(id)
}
