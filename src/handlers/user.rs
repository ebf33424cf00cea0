use actix_web::{
    get, post,
    web::{self, Json},
    HttpRequest, HttpResponse,
};

use crate::{
    auth::{self, Role},
    errors::{ApiError, BAD_CREDENTIALS},
    models::{purchase, user},
    schema::{
        user::PurchasedCoursesResponse, Credentials, SigninResponse, SignupResponse,
    },
    utils::{hash_password, verify_password},
    AppState,
};

#[post("/signup")]
pub async fn signup_user(
    state: web::Data<AppState>,
    body: Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let username = body.normalized_username();

    if user::find_by_username(&state.pool, &username).await?.is_some() {
        return Err(ApiError::Conflict("User with this username already exists"));
    }

    let password_hash =
        hash_password(&body.password).map_err(|_| ApiError::Internal("password hashing failed"))?;
    user::create(&state.pool, &username, &password_hash).await?;

    Ok(HttpResponse::Created().json(SignupResponse {
        message: "User created successfully".to_string(),
    }))
}

#[post("/signin")]
pub async fn signin_user(
    state: web::Data<AppState>,
    body: Json<Credentials>,
) -> Result<HttpResponse, ApiError> {
    body.validate()?;
    let username = body.normalized_username();

    let user = user::find_by_username(&state.pool, &username)
        .await?
        .ok_or(ApiError::Unauthorized(BAD_CREDENTIALS))?;
    verify_password(&body.password, &user.password)
        .map_err(|_| ApiError::Unauthorized(BAD_CREDENTIALS))?;

    let token = auth::issue_token(
        user.id,
        &user.username,
        Role::User,
        state.config.jwt_secret.as_bytes(),
    )
    .map_err(|_| ApiError::Internal("token signing failed"))?;

    Ok(HttpResponse::Ok().json(SigninResponse { token }))
}

#[get("")]
pub async fn purchased_courses_handler(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let claims = auth::claims_from_request(&req)?;
    let user_id = auth::identity_id(&claims)?;

    let courses = purchase::purchased_courses(&state.pool, user_id).await?;

    Ok(HttpResponse::Ok().json(PurchasedCoursesResponse {
        purchased_courses: courses.into_iter().map(Into::into).collect(),
    }))
}
