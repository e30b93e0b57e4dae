/// User account routes.
///
/// Registration and listing are public; the `me` routes require a valid
/// access token. Responses never include the password hash or row
/// timestamps.

use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::error::{AppError, ErrorContext};
use crate::users::model::{NewUser, User, UserUpdate};
use crate::users::service;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub birth_date: NaiveDate,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            birth_date: user.birth_date,
        }
    }
}

/// POST /api/users
///
/// Registers a new account. The email is normalized before the uniqueness
/// check, so differently-cased variants of one address collide.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid field or email already in use"),
    ),
    tag = "users"
)]
pub async fn create_user(
    form: web::Json<CreateUserRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_registration");
    let form = form.into_inner();

    let user = service::create_user(
        pool.get_ref(),
        NewUser {
            full_name: form.full_name,
            email: form.email,
            birth_date: form.birth_date,
            password: form.password,
        },
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user.id,
        "User registered successfully"
    );

    Ok(HttpResponse::Created().json(MessageResponse::new("user created")))
}

/// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All accounts", body = [UserResponse])),
    tag = "users"
)]
pub async fn list_users(pool: web::Data<PgPool>) -> Result<HttpResponse, AppError> {
    let users = service::list_users(pool.get_ref()).await?;
    let body: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Missing or invalid access token"),
        (status = 404, description = "Account no longer exists"),
    ),
    tag = "users"
)]
pub async fn current_user(
    claims: web::ReqData<Claims>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;
    let user = service::get_user(pool.get_ref(), user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}

/// PATCH /api/users/me
#[utoipa::path(
    patch,
    path = "/api/users/me",
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Profile updated", body = MessageResponse),
        (status = 400, description = "Invalid field or email owned by another account"),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "users"
)]
pub async fn update_current_user(
    claims: web::ReqData<Claims>,
    form: web::Json<UpdateUserRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let context = ErrorContext::new("user_update");
    let user_id = claims.user_id()?;
    let form = form.into_inner();

    service::update_user(
        pool.get_ref(),
        user_id,
        UserUpdate {
            full_name: form.full_name,
            email: form.email,
            birth_date: form.birth_date,
            password: form.password,
        },
    )
    .await?;

    tracing::info!(
        request_id = %context.request_id,
        user_id = %user_id,
        "User profile updated"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new("user updated")))
}

/// PUT /api/users/me/password
#[utoipa::path(
    put,
    path = "/api/users/me/password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 400, description = "Old password does not match"),
        (status = 401, description = "Missing or invalid access token"),
    ),
    tag = "users"
)]
pub async fn update_current_user_password(
    claims: web::ReqData<Claims>,
    form: web::Json<UpdatePasswordRequest>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, AppError> {
    let user_id = claims.user_id()?;

    service::update_password(pool.get_ref(), user_id, &form.old_password, &form.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("password updated")))
}
