use sqlx::{types::Uuid, PgPool};

use crate::errors::{conflict_on_unique, ApiError};
use crate::models::course::Course;

pub const ALREADY_PURCHASED: &str = "You have already purchased this course";

pub async fn exists(pool: &PgPool, user_id: Uuid, course_id: Uuid) -> Result<bool, ApiError> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
            SELECT EXISTS(
                SELECT 1 FROM purchases WHERE user_id = $1 AND course_id = $2
            )
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Records the purchase with the course's price snapshotted. Two racing
/// inserts for the same (user, course) both pass the handler's existence
/// check; the UNIQUE pair constraint rejects the second writer and we report
/// it as the same conflict the pre-check would have produced.
pub async fn create(
    pool: &PgPool,
    user_id: Uuid,
    course_id: Uuid,
    price_at_purchase: f64,
) -> Result<Uuid, ApiError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
            INSERT INTO purchases (user_id, course_id, price_at_purchase)
            VALUES ($1, $2, $3)
            RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(course_id)
    .bind(price_at_purchase)
    .fetch_one(pool)
    .await
    .map_err(|e| conflict_on_unique(e, ALREADY_PURCHASED))?;

    Ok(id)
}

/// The full course row for every purchase owned by the user.
pub async fn purchased_courses(pool: &PgPool, user_id: Uuid) -> Result<Vec<Course>, ApiError> {
    let courses = sqlx::query_as::<_, Course>(
        r#"
            SELECT c.id, c.title, c.description, c.image_link, c.price, c.published,
                   c.creator_id
            FROM purchases p
            JOIN courses c ON c.id = p.course_id
            WHERE p.user_id = $1
            ORDER BY p.purchased_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(courses)
}
