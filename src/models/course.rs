use sqlx::{types::Uuid, FromRow, PgPool};

use crate::errors::ApiError;
use crate::schema::admin::CreateCourse;

#[derive(Debug, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_link: String,
    pub price: f64,
    pub published: bool,
    pub creator_id: Uuid,
}

/// Admin listing row: the course plus its creator's username.
#[derive(Debug, FromRow)]
pub struct CourseWithCreator {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_link: String,
    pub price: f64,
    pub published: bool,
    pub creator: String,
}

pub async fn create(pool: &PgPool, data: &CreateCourse, creator_id: Uuid) -> Result<Uuid, ApiError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
            INSERT INTO courses (title, description, image_link, price, published, creator_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
        "#,
    )
    .bind(&data.title)
    .bind(&data.description)
    .bind(&data.image_link)
    .bind(data.price)
    .bind(data.published.unwrap_or(true))
    .bind(creator_id)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Every course, published or not, annotated with the creator's username.
pub async fn list_with_creator(pool: &PgPool) -> Result<Vec<CourseWithCreator>, ApiError> {
    let courses = sqlx::query_as::<_, CourseWithCreator>(
        r#"
            SELECT c.id, c.title, c.description, c.image_link, c.price, c.published,
                   a.username AS creator
            FROM courses c
            JOIN admins a ON a.id = c.creator_id
            ORDER BY c.created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

pub async fn list_published(pool: &PgPool) -> Result<Vec<Course>, ApiError> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
            SELECT id, title, description, image_link, price, published, creator_id
            FROM courses
            WHERE published = TRUE
            ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(courses)
}

/// Unpublished courses are invisible here on purpose: purchasing one must
/// look like purchasing a course that does not exist.
pub async fn find_published(pool: &PgPool, id: Uuid) -> Result<Option<Course>, ApiError> {
    let course = sqlx::query_as::<_, Course>(
        r#"
            SELECT id, title, description, image_link, price, published, creator_id
            FROM courses
            WHERE id = $1 AND published = TRUE
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(course)
}
