pub mod admin;
pub mod course;
pub mod user;

use actix_web::middleware::from_fn;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;

use crate::errors::{ApiError, ErrorMessage, FieldError};
use crate::middlewares;
use crate::AppState;

#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorMessage {
        message: "Endpoint not found".to_string(),
    })
}

/// Full route table; shared by `main` and the test harness so they cannot
/// drift apart.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state)
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::Validation(vec![FieldError::new("body", err.to_string())]).into()
            }))
            .service(health)
            .service(
                web::scope("/admin")
                    .service(
                        web::scope("/courses")
                            .wrap(from_fn(middlewares::admin::admin_guard))
                            .service(admin::create_course_handler)
                            .service(admin::admin_courses_handler),
                    )
                    .service(admin::signup_admin)
                    .service(admin::signin_admin),
            )
            .service(
                web::scope("/user")
                    // register before /courses so the literal segment wins
                    .service(
                        web::scope("/purchasedCourses")
                            .wrap(from_fn(middlewares::user::user_guard))
                            .service(user::purchased_courses_handler),
                    )
                    .service(
                        web::scope("/courses")
                            .service(course::published_courses_handler)
                            .service(
                                web::scope("")
                                    .wrap(from_fn(middlewares::user::user_guard))
                                    .service(course::purchase_course_handler),
                            ),
                    )
                    .service(user::signup_user)
                    .service(user::signin_user),
            )
            .default_service(web::route().to(not_found));
    }
}
