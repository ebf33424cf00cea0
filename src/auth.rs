use actix_web::{http::header::HeaderValue, HttpMessage, HttpRequest};
use chrono::{Duration, Utc};
use derive_more::derive::Display;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;

use crate::errors::ApiError;

pub const TOKEN_TTL_HOURS: i64 = 1;

const MISSING_TOKEN: &str = "Authorization token is missing or invalid";
const INVALID_TOKEN: &str = "Invalid or expired token";

/// Role discriminator carried in the token; admins and users share one token
/// format but live in disjoint identity spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display("admin")]
    Admin,
    #[display("user")]
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Identity id (admin or user row id).
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

pub fn issue_token(
    id: Uuid,
    username: &str,
    role: Role,
    secret: &[u8],
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = AuthClaims {
        sub: id.to_string(),
        username: username.to_owned(),
        role,
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret))
}

/// The whole access guard as a pure function of (header, required role,
/// secret): 401 when no usable bearer token is presented, 403 when the token
/// fails verification or carries the wrong role.
pub fn authorize(
    header: Option<&HeaderValue>,
    required: Role,
    secret: &[u8],
) -> Result<AuthClaims, ApiError> {
    let header = header.ok_or(ApiError::Unauthorized(MISSING_TOKEN))?;
    let header = header.to_str().map_err(|_| ApiError::Unauthorized(MISSING_TOKEN))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized(MISSING_TOKEN))?;

    let decoded = decode::<AuthClaims>(
        token,
        &DecodingKey::from_secret(secret),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Forbidden(INVALID_TOKEN))?;

    if decoded.claims.role != required {
        return Err(ApiError::Forbidden(INVALID_TOKEN));
    }

    Ok(decoded.claims)
}

/// Claims placed in the request extensions by the role guard.
pub fn claims_from_request(req: &HttpRequest) -> Result<AuthClaims, ApiError> {
    req.extensions()
        .get::<AuthClaims>()
        .cloned()
        .ok_or(ApiError::Forbidden(INVALID_TOKEN))
}

pub fn identity_id(claims: &AuthClaims) -> Result<Uuid, ApiError> {
    Uuid::parse_str(&claims.sub).map_err(|_| ApiError::Forbidden(INVALID_TOKEN))
}
