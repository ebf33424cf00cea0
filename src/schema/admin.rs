use serde::{Deserialize, Serialize};

use crate::errors::{ApiError, FieldError};
use crate::models::course::CourseWithCreator;

/// `POST /admin/courses` body; `published` falls back to true when omitted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourse {
    pub title: String,
    pub description: String,
    pub image_link: String,
    pub price: f64,
    pub published: Option<bool>,
}

impl CreateCourse {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title cannot be empty"));
        }
        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description cannot be empty"));
        }
        if !is_valid_image_link(&self.image_link) {
            errors.push(FieldError::new(
                "imageLink",
                format!("{} is not a valid URL", self.image_link),
            ));
        }
        if self.price <= 0.0 {
            errors.push(FieldError::new("price", "Price must be a positive number"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(errors))
        }
    }
}

// Same acceptance as the pattern ^https?://\S+$: an http(s) scheme, at least
// one character after it, and no whitespace anywhere.
fn is_valid_image_link(link: &str) -> bool {
    let rest = link
        .strip_prefix("http://")
        .or_else(|| link.strip_prefix("https://"));
    match rest {
        Some(rest) => !rest.is_empty() && !link.chars().any(char::is_whitespace),
        None => false,
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseResponse {
    pub message: String,
    pub course_id: String,
}

/// Admin catalog view: the full course plus the creator's username and
/// nothing else about the creator.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCourseView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_link: String,
    pub price: f64,
    pub published: bool,
    pub creator: String,
}

impl From<CourseWithCreator> for AdminCourseView {
    fn from(row: CourseWithCreator) -> Self {
        Self {
            id: row.id.to_string(),
            title: row.title,
            description: row.description,
            image_link: row.image_link,
            price: row.price,
            published: row.published,
            creator: row.creator,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminCoursesResponse {
    pub courses: Vec<AdminCourseView>,
}
