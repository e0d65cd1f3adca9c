use actix_web::cookie::time::OffsetDateTime;
use actix_web::cookie::Cookie;
use actix_web::{web, HttpResponse};
use uuid::Uuid;

use super::auth::AuthenticatedUser;
use super::form::FormPayload;
use super::resources::{discard_image, previous_image, settle_images, store_image};
use super::{blocking, Envelope};
use crate::application::{IssuedToken, ACCESS_TOKEN_COOKIE};
use crate::errors::AppError;
use crate::infrastructure::{DieselRepository, ImageStore};
use crate::models::user::{LoginForm, SignupForm, User, UserUpdateForm};
use crate::models::{Entity, RecordKey};
use crate::Accounts;

/// POST /users/signup
///
/// Creates an account from `email` and `password` (both required) plus
/// optional `name`, `phone` and an `img` file.
#[utoipa::path(
    post,
    path = "/users/signup",
    responses(
        (status = 201, description = "Account created", body = User),
        (status = 400, description = "Missing or malformed fields"),
        (status = 409, description = "Email already registered"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "users"
)]
pub async fn signup(
    accounts: web::Data<Accounts>,
    images: web::Data<ImageStore>,
    form: FormPayload,
) -> Result<HttpResponse, AppError> {
    let (mut form, upload) = form.into_form::<SignupForm>()?;

    let stored = store_image(&images, User::descriptor().image, upload).await?;
    if let Some(path) = &stored {
        form.img = Some(path.clone());
    }

    let result = blocking(move || accounts.signup(form)).await;
    if let (Err(_), Some(path)) = (&result, stored) {
        discard_image(&images, path).await;
    }

    Ok(HttpResponse::Created().json(Envelope::new(result?)))
}

/// POST /users/login
///
/// Answers with the token in the body and in an HTTP-only `accessToken`
/// cookie that expires together with the token.
#[utoipa::path(
    post,
    path = "/users/login",
    responses(
        (status = 200, description = "Logged in", body = IssuedToken),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "users"
)]
pub async fn login(
    accounts: web::Data<Accounts>,
    form: FormPayload,
) -> Result<HttpResponse, AppError> {
    let (form, _) = form.into_form::<LoginForm>()?;

    let issued = blocking(move || accounts.login(form)).await?;

    let expires = OffsetDateTime::from_unix_timestamp(issued.expires_at)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let cookie = Cookie::build(ACCESS_TOKEN_COOKIE, issued.token.clone())
        .path("/")
        .http_only(true)
        .expires(expires)
        .finish();

    Ok(HttpResponse::Ok().cookie(cookie).json(Envelope::new(issued)))
}

/// GET /users/me
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "The authenticated user", body = User),
        (status = 401, description = "Missing, invalid or expired token"),
    ),
    tag = "users"
)]
pub async fn current_user(
    accounts: web::Data<Accounts>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let record = blocking(move || accounts.current_user(user.user_id)).await?;
    Ok(HttpResponse::Ok().json(Envelope::new(record)))
}

/// PUT /users/{id}
///
/// Empty fields are left unchanged. A new password is hashed before storage.
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User UUID"),
    ),
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Malformed id or fields"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "users"
)]
pub async fn update_user(
    accounts: web::Data<Accounts>,
    repo: web::Data<DieselRepository>,
    images: web::Data<ImageStore>,
    path: web::Path<String>,
    form: FormPayload,
) -> Result<HttpResponse, AppError> {
    let id = Uuid::from_path(path.into_inner())?;
    let (mut form, upload) = form.into_form::<UserUpdateForm>()?;

    let previous = previous_image::<User>(&repo, &id, &upload).await?;
    let stored = store_image(&images, User::descriptor().image, upload).await?;
    if let Some(path) = &stored {
        form.img = Some(path.clone());
    }

    let result = blocking(move || accounts.update(id, form)).await;
    settle_images(&images, matches!(result, Ok(Some(_))), stored, previous).await;

    let record =
        result?.ok_or_else(|| AppError::NotFound(User::descriptor().label.to_string()))?;
    Ok(HttpResponse::Ok().json(Envelope::new(record)))
}
