use actix_web::{
    get, post,
    web::{self, Json},
    HttpRequest, HttpResponse,
};

use crate::{
    auth::{self, Role},
    errors::{ApiError, BAD_CREDENTIALS},
    models::{admin, course},
    schema::{
        admin::{AdminCoursesResponse, CreateCourse, CreateCourseResponse},
        Credentials, SigninResponse, SignupResponse,
    },
    utils::{hash_password, verify_password},
    AppState,
};

#[post("/signup")]
pub async fn signup_admin(
    state: web::Data<AppState>,
    body: Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let username = body.normalized_username();

    if admin::find_by_username(&state.pool, &username).await?.is_some() {
        return Err(ApiError::Conflict("Admin with this username already exists"));
    }

    // The hash is computed here, visibly, before anything is persisted.
    let password_hash =
        hash_password(&body.password).map_err(|_| ApiError::Internal("password hashing failed"))?;
    admin::create(&state.pool, &username, &password_hash).await?;

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "Admin created successfully".to_string(),
    }))
}

#[post("/signin")]
pub async fn signin_admin(
    state: web::Data<AppState>,
    body: Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let username = body.normalized_username();

    // unknown username and wrong password collapse into one answer
    let admin = admin::find_by_username(&state.pool, &username)
        .await?
        .ok_or(ApiError::Unauthorized(BAD_CREDENTIALS))?;
    verify_password(&body.password, &admin.password)
        .map_err(|_| ApiError::Unauthorized(BAD_CREDENTIALS))?;

    let token = auth::issue_token(
        admin.id,
        &admin.username,
        Role::Admin,
        state.config.jwt_secret.as_bytes(),
    )
    .map_err(|_| ApiError::Internal("token signing failed"))?;

    Ok(HttpResponse::Ok().json(SigninResponse { token }))
}

#[post("")]
pub async fn create_course_handler(
    state: web::Data<AppState>,
    body: Json<CreateCourse>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::claims_from_request(&req)?;
    let creator_id = auth::identity_id(&claims)?;

    body.validate()?;

    let course_id = course::create(&state.pool, &body, creator_id).await?;
    tracing::info!(course_id = %course_id, creator = %claims.username, "course created");

    Ok(HttpResponse::Created().json(CreateCourseResponse {
        message: "Course created successfully".to_string(),
        course_id: course_id.to_string(),
    }))
}

#[get("")]
pub async fn admin_courses_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let courses = course::list_with_creator(&state.pool).await?;

    Ok(HttpResponse::Ok().json(AdminCoursesResponse {
        courses: courses.into_iter().map(Into::into).collect(),
    }))
}
