use serde::{Deserialize, Serialize};

use crate::models::course::Course;

/// Public catalog view of a course.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image_link: String,
    pub price: f64,
    pub published: bool,
    pub creator_id: String,
}

impl From<Course> for CourseView {
    fn from(course: Course) -> Self {
        Self {
            id: course.id.to_string(),
            title: course.title,
            description: course.description,
            image_link: course.image_link,
            price: course.price,
            published: course.published,
            creator_id: course.creator_id.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CoursesResponse {
    pub courses: Vec<CourseView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub message: String,
}

/// `GET /user/purchasedCourses` surfaces only the joined courses; the
/// purchase metadata (price paid, timestamp) stays server-side.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasedCoursesResponse {
    pub purchased_courses: Vec<CourseView>,
}
