use actix_web::{get, post, web, HttpRequest, HttpResponse};
use sqlx::types::Uuid;

use crate::{
    auth,
    errors::{ApiError, FieldError},
    models::{course, purchase},
    schema::user::{CoursesResponse, PurchaseResponse},
    AppState,
};

/// Public catalog: published courses only, no token required.
#[get("")]
pub async fn published_courses_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let courses = course::list_published(&state.pool).await?;

    Ok(HttpResponse::Ok().json(CoursesResponse {
        courses: courses.into_iter().map(Into::into).collect(),
    }))
}

#[post("/{course_id}")]
pub async fn purchase_course_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::claims_from_request(&req)?;
    let user_id = auth::identity_id(&claims)?;

    // reject malformed ids before touching the database
    let course_id = Uuid::parse_str(&path.into_inner()).map_err(|_| {
        ApiError::Validation(vec![FieldError::new("courseId", "Invalid course ID format")])
    })?;

    let course = course::find_published(&state.pool, course_id)
        .await?
        .ok_or(ApiError::NotFound("Course not found or is not available"))?;

    if purchase::exists(&state.pool, user_id, course_id).await? {
        return Err(ApiError::Conflict(purchase::ALREADY_PURCHASED));
    }

    let purchase_id = purchase::create(&state.pool, user_id, course_id, course.price).await?;
    tracing::info!(purchase_id = %purchase_id, user = %claims.username, course_id = %course_id, "course purchased");

    Ok(HttpResponse::Ok().json(PurchaseResponse {
        message: "Course purchased successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::http::header;
    use actix_web::test::{self, TestRequest};
    use chrono::{Duration, Utc};
    use futures_util::future::join_all;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use sqlx::postgres::PgPoolOptions;

    use super::*;
    use crate::auth::{issue_token, AuthClaims, Role};
    use crate::errors::ErrorMessage;
    use crate::schema::admin::{CreateCourse, CreateCourseResponse};
    use crate::schema::user::PurchasedCoursesResponse;
    use crate::schema::{Credentials, SigninResponse};
    use crate::test_init_app::{init, init_with_pool, TEST_JWT_SECRET};

    fn user_token() -> String {
        let id = Uuid::parse_str("44444444-4444-4444-4444-444444444444").unwrap();
        issue_token(id, "buyer", Role::User, TEST_JWT_SECRET.as_bytes()).unwrap()
    }

    fn expired_user_token() -> String {
        let now = Utc::now();
        let claims = AuthClaims {
            sub: "44444444-4444-4444-4444-444444444444".to_string(),
            username: "buyer".to_string(),
            role: Role::User,
            iat: (now - Duration::hours(3)).timestamp() as usize,
            exp: (now - Duration::hours(2)).timestamp() as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[actix_web::test]
    async fn test_purchase_with_malformed_course_id_is_400() {
        let app = init().await;

        let res = TestRequest::post()
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", user_token())))
            .uri("/user/courses/not-a-uuid")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 400);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["errors"]["courseId"], "Invalid course ID format");
    }

    #[actix_web::test]
    async fn test_purchase_with_expired_token_is_403() {
        let app = init().await;

        let res = TestRequest::post()
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", expired_user_token()),
            ))
            .uri("/user/courses/44444444-4444-4444-4444-444444444444")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 403);
    }

    #[actix_web::test]
    async fn test_purchase_without_token_is_401() {
        let app = init().await;

        let res = TestRequest::post()
            .uri("/user/courses/44444444-4444-4444-4444-444444444444")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 401);
    }

    // Full marketplace flow against a real database. Skips cleanly when
    // DATABASE_URL is unset or unreachable.
    #[actix_web::test]
    async fn test_marketplace_end_to_end() {
        dotenv::dotenv().ok();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let pool = match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(&url)
            .await
        {
            Ok(pool) => pool,
            Err(_) => return,
        };
        if sqlx::migrate!().run(&pool).await.is_err() {
            return;
        }

        let app = init_with_pool(pool).await;
        let run = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        // 1. Admin signs up, duplicate signup conflicts, signs in.
        let admin_creds = Credentials {
            username: format!("Seller_{run}"),
            password: "adminpass123".to_string(),
        };
        let res = TestRequest::post()
            .set_json(&admin_creds)
            .uri("/admin/signup")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 201);

        let res = TestRequest::post()
            .set_json(&admin_creds)
            .uri("/admin/signup")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 409);

        let res = TestRequest::post()
            .set_json(&admin_creds)
            .uri("/admin/signin")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 200);
        let admin_token = test::read_body_json::<SigninResponse, _>(res).await.token;

        // 2. Admin creates one published and one unpublished course.
        let published = CreateCourse {
            title: format!("Rust in Anger {run}"),
            description: "A production tour".to_string(),
            image_link: "https://img.example.com/rust.png".to_string(),
            price: 49.99,
            published: None,
        };
        let res = TestRequest::post()
            .set_json(&published)
            .insert_header((header::AUTHORIZATION, format!("Bearer {admin_token}")))
            .uri("/admin/courses")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 201);
        let course_id = test::read_body_json::<CreateCourseResponse, _>(res)
            .await
            .course_id;

        let mut draft = published.clone();
        draft.title = format!("Unreleased {run}");
        draft.published = Some(false);
        let res = TestRequest::post()
            .set_json(&draft)
            .insert_header((header::AUTHORIZATION, format!("Bearer {admin_token}")))
            .uri("/admin/courses")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 201);
        let draft_id = test::read_body_json::<CreateCourseResponse, _>(res)
            .await
            .course_id;

        // 3. Public catalog lists the published course, never the draft.
        let res = TestRequest::get().uri("/user/courses").send_request(&app).await;
        assert_eq!(res.status().as_u16(), 200);
        let catalog: CoursesResponse = test::read_body_json(res).await;
        assert!(catalog.courses.iter().all(|c| c.published));
        assert!(catalog.courses.iter().any(|c| c.id == course_id));
        assert!(catalog.courses.iter().all(|c| c.id != draft_id));

        // 4. Admin view shows both, annotated with the creator's username.
        let res = TestRequest::get()
            .insert_header((header::AUTHORIZATION, format!("Bearer {admin_token}")))
            .uri("/admin/courses")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 200);
        let all: crate::schema::admin::AdminCoursesResponse = test::read_body_json(res).await;
        let mine = all.courses.iter().find(|c| c.id == course_id).unwrap();
        assert_eq!(mine.creator, admin_creds.username.to_lowercase());
        assert!(all.courses.iter().any(|c| c.id == draft_id));

        // 5. User signs up and in; wrong password and unknown user are
        //    indistinguishable.
        let user_creds = Credentials {
            username: format!("Buyer_{run}"),
            password: "userpass123".to_string(),
        };
        let res = TestRequest::post()
            .set_json(&user_creds)
            .uri("/user/signup")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 201);

        let mut wrong = user_creds.clone();
        wrong.password = "wrongpass123".to_string();
        let res = TestRequest::post()
            .set_json(&wrong)
            .uri("/user/signin")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 401);
        let wrong_password_msg = test::read_body_json::<ErrorMessage, _>(res).await.message;

        let unknown = Credentials {
            username: format!("Nobody_{run}"),
            password: "whatever123".to_string(),
        };
        let res = TestRequest::post()
            .set_json(&unknown)
            .uri("/user/signin")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 401);
        let unknown_user_msg = test::read_body_json::<ErrorMessage, _>(res).await.message;
        assert_eq!(wrong_password_msg, unknown_user_msg);

        let res = TestRequest::post()
            .set_json(&user_creds)
            .uri("/user/signin")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 200);
        let user_token = test::read_body_json::<SigninResponse, _>(res).await.token;

        // 6. Purchase once, then conflict on the second attempt.
        let res = TestRequest::post()
            .insert_header((header::AUTHORIZATION, format!("Bearer {user_token}")))
            .uri(&format!("/user/courses/{course_id}"))
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 200);

        let res = TestRequest::post()
            .insert_header((header::AUTHORIZATION, format!("Bearer {user_token}")))
            .uri(&format!("/user/courses/{course_id}"))
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 409);

        // 7. The draft and a nonexistent id both look absent.
        let res = TestRequest::post()
            .insert_header((header::AUTHORIZATION, format!("Bearer {user_token}")))
            .uri(&format!("/user/courses/{draft_id}"))
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 404);

        let res = TestRequest::post()
            .insert_header((header::AUTHORIZATION, format!("Bearer {user_token}")))
            .uri("/user/courses/00000000-0000-0000-0000-000000000001")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 404);

        // 8. Purchase history surfaces the course itself.
        let res = TestRequest::get()
            .insert_header((header::AUTHORIZATION, format!("Bearer {user_token}")))
            .uri("/user/purchasedCourses")
            .send_request(&app)
            .await;
        assert_eq!(res.status().as_u16(), 200);
        let history: PurchasedCoursesResponse = test::read_body_json(res).await;
        assert_eq!(history.purchased_courses.len(), 1);
        assert_eq!(history.purchased_courses[0].title, published.title);
        assert_eq!(history.purchased_courses[0].price, 49.99);
    }

    // Concurrent duplicate purchases: the UNIQUE (user_id, course_id)
    // constraint lets exactly one writer through.
    #[actix_web::test]
    async fn test_concurrent_duplicate_purchases_conflict() {
        dotenv::dotenv().ok();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let pool = match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(&url)
            .await
        {
            Ok(pool) => pool,
            Err(_) => return,
        };
        if sqlx::migrate!().run(&pool).await.is_err() {
            return;
        }

        let app = init_with_pool(pool).await;
        let run = Utc::now().timestamp_nanos_opt().unwrap_or_default();

        let admin_creds = Credentials {
            username: format!("racer_admin_{run}"),
            password: "adminpass123".to_string(),
        };
        TestRequest::post()
            .set_json(&admin_creds)
            .uri("/admin/signup")
            .send_request(&app)
            .await;
        let res = TestRequest::post()
            .set_json(&admin_creds)
            .uri("/admin/signin")
            .send_request(&app)
            .await;
        let admin_token = test::read_body_json::<SigninResponse, _>(res).await.token;

        let res = TestRequest::post()
            .set_json(CreateCourse {
                title: format!("Contended {run}"),
                description: "One seat only".to_string(),
                image_link: "https://img.example.com/race.png".to_string(),
                price: 10.0,
                published: None,
            })
            .insert_header((header::AUTHORIZATION, format!("Bearer {admin_token}")))
            .uri("/admin/courses")
            .send_request(&app)
            .await;
        let course_id = test::read_body_json::<CreateCourseResponse, _>(res)
            .await
            .course_id;

        let user_creds = Credentials {
            username: format!("racer_user_{run}"),
            password: "userpass123".to_string(),
        };
        TestRequest::post()
            .set_json(&user_creds)
            .uri("/user/signup")
            .send_request(&app)
            .await;
        let res = TestRequest::post()
            .set_json(&user_creds)
            .uri("/user/signin")
            .send_request(&app)
            .await;
        let user_token = test::read_body_json::<SigninResponse, _>(res).await.token;

        let attempts = (0..5).map(|_| {
            TestRequest::post()
                .insert_header((header::AUTHORIZATION, format!("Bearer {user_token}")))
                .uri(&format!("/user/courses/{course_id}"))
                .send_request(&app)
        });
        let statuses: Vec<u16> = join_all(attempts)
            .await
            .into_iter()
            .map(|res| res.status().as_u16())
            .collect();

        let successes = statuses.iter().filter(|&&s| s == 200).count();
        let conflicts = statuses.iter().filter(|&&s| s == 409).count();
        assert_eq!(successes, 1, "statuses: {statuses:?}");
        assert_eq!(conflicts, statuses.len() - 1, "statuses: {statuses:?}");
    }
}
