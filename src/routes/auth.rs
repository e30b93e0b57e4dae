/// Authentication routes: login, token refresh, logout.
///
/// Tokens travel in httpOnly cookies. A failed refresh clears both cookies
/// so a browser does not keep retrying with a dead session.

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::auth::{cookies, session};
use crate::configuration::{ApplicationSettings, AuthSettings};
use crate::error::{AppError, AuthError, ErrorContext, ValidationError};
use crate::routes::users::{MessageResponse, UserResponse};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
///
/// Unknown email and wrong password produce the same 401, so this endpoint
/// cannot be used to probe which addresses are registered.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; token cookies set", body = UserResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "auth"
)]
pub async fn login(
    form: web::Json<LoginRequest>,
    pool: web::Data<PgPool>,
    auth: web::Data<AuthSettings>,
    app: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_login");

    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(ValidationError::MissingCredentials.into());
    }

    let outcome = session::log_in(pool.get_ref(), auth.get_ref(), &form.email, &form.password)
        .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %outcome.user.id,
        "User logged in successfully"
    );

    Ok(HttpResponse::Ok()
        .cookie(cookies::access_cookie(
            app.get_ref(),
            auth.get_ref(),
            &outcome.tokens.access_token,
        )?)
        .cookie(cookies::refresh_cookie(
            app.get_ref(),
            auth.get_ref(),
            &outcome.tokens.refresh_token,
        )?)
        .json(UserResponse::from(&outcome.user)))
}

/// POST /api/auth/refresh
///
/// Rotates the refresh token presented in the path-scoped cookie. Every
/// failure clears both cookies along with the 401.
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    responses(
        (status = 200, description = "Tokens rotated; cookies replaced", body = MessageResponse),
        (status = 401, description = "Invalid, expired, or reused token; cookies cleared"),
    ),
    tag = "auth"
)]
pub async fn refresh(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    auth: web::Data<AuthSettings>,
    app: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("token_refresh");

    let presented = match req.cookie(cookies::REFRESH_COOKIE) {
        Some(cookie) => cookie.value().to_string(),
        None => {
            return Ok(reject_with_cleared_cookies(
                AppError::Auth(AuthError::MissingToken),
                app.get_ref(),
                &context,
            ))
        }
    };

    match session::refresh(pool.get_ref(), auth.get_ref(), &presented).await {
        Ok(pair) => {
            tracing::info!(
                request_id = %context.request_id,
                "Token refreshed successfully"
            );

            Ok(HttpResponse::Ok()
                .cookie(cookies::access_cookie(
                    app.get_ref(),
                    auth.get_ref(),
                    &pair.access_token,
                )?)
                .cookie(cookies::refresh_cookie(
                    app.get_ref(),
                    auth.get_ref(),
                    &pair.refresh_token,
                )?)
                .json(MessageResponse::new("refreshed tokens")))
        }
        Err(err) => Ok(reject_with_cleared_cookies(err, app.get_ref(), &context)),
    }
}

/// POST /api/auth/logout
///
/// Revokes the session family of the presented refresh token (when the
/// cookie is present) and clears both cookies. Never fails on an unknown or
/// missing token.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked; cookies cleared", body = MessageResponse),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "auth"
)]
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    app: web::Data<ApplicationSettings>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_logout");

    let presented = req
        .cookie(cookies::REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string());

    session::log_out(pool.get_ref(), presented.as_deref()).await?;

    tracing::info!(request_id = %context.request_id, "User logged out");

    Ok(HttpResponse::Ok()
        .cookie(cookies::clear_access_cookie(app.get_ref()))
        .cookie(cookies::clear_refresh_cookie(app.get_ref()))
        .json(MessageResponse::new("logged out")))
}

fn reject_with_cleared_cookies(
    err: AppError,
    app: &ApplicationSettings,
    context: &ErrorContext,
) -> HttpResponse {
    err.log(&context.request_id);
    let (status, body) = err.response_parts(&context.request_id);

    HttpResponse::build(status)
        .cookie(cookies::clear_access_cookie(app))
        .cookie(cookies::clear_refresh_cookie(app))
        .json(body)
}
