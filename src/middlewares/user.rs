use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error, HttpMessage,
};

use crate::{
    auth::{authorize, Role},
    errors::ApiError,
    AppState,
};

pub async fn user_guard(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| Error::from(ApiError::Internal("application state is missing")))?;

    let claims = authorize(
        req.headers().get(header::AUTHORIZATION),
        Role::User,
        state.config.jwt_secret.as_bytes(),
    )
    .map_err(|e| {
        tracing::debug!(path = %req.path(), "user guard rejected request: {e}");
        e
    })?;

    req.extensions_mut().insert(claims);
    next.call(req).await
}
