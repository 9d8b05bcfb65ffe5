//! User endpoints

use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, warn};

use super::middleware::{expired_session_cookie, RequireSession};
use super::state::AppState;
use super::types::{ApiError, ApiErrorType, Json};
use crate::domain::upload::{UploadRequest, UploadedFile};
use crate::domain::user::validate_user_fields;
use crate::domain::{DomainError, UserId, UserSession};
use crate::infrastructure::user::{RegisterUserRequest, UpdateUserRequest, UserResponse};

/// Where a browser lands after registering
pub const REGISTERED_REDIRECT: &str = "/entrance";

const MODIFICATION_SUCCESS: &str = "Modification Success";

pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_user))
        .route("/{id}", get(get_user).put(modify_user).delete(delete_user))
}

/// Outcome of a modification; `data` is absent on failure
#[derive(Debug, Serialize)]
pub struct ModifyResponse {
    pub data: Option<UserResponse>,
    pub message: String,
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.user_service.find_user_by_id(UserId::new(id)).await?;
    Ok(Json(UserResponse::try_from(&user)?))
}

fn multipart_error(context: &str, e: MultipartError) -> ApiError {
    ApiError::new(
        e.status(),
        ApiErrorType::InvalidRequestError,
        format!("{}: {}", context, e.body_text()),
    )
}

/// Multipart user form with an optional `file` part
#[derive(Debug, Default)]
struct UserForm {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    file: Option<UploadRequest>,
}

impl UserForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error("Invalid multipart body", e))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match name.as_str() {
                "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let content_type = field.content_type().map(str::to_string);
                    let bytes: Bytes = field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Invalid file part", e))?;

                    // Browsers submit an empty, unnamed part when no file is chosen
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }

                    let mut upload = UploadRequest::new(file_name, bytes);
                    if let Some(content_type) = content_type {
                        upload = upload.with_content_type(content_type);
                    }
                    form.file = Some(upload);
                }
                "name" | "email" | "password" => {
                    let value = field.text().await.map_err(|e| {
                        multipart_error(&format!("Invalid form field '{}'", name), e)
                    })?;

                    match name.as_str() {
                        "name" => form.name = Some(value),
                        "email" => form.email = Some(value),
                        _ => form.password = Some(value),
                    }
                }
                _ => debug!(field = %name, "Ignoring unknown form field"),
            }
        }

        Ok(form)
    }

    fn into_fields(self) -> Result<(String, String, String, Option<UploadRequest>), ApiError> {
        let missing = |field: &str| {
            ApiError::bad_request(format!("Missing form field '{}'", field)).with_param(field)
        };

        Ok((
            self.name.ok_or_else(|| missing("name"))?,
            self.email.ok_or_else(|| missing("email"))?,
            self.password.ok_or_else(|| missing("password"))?,
            self.file,
        ))
    }

    fn into_register(self) -> Result<(RegisterUserRequest, Option<UploadRequest>), ApiError> {
        let (name, email, password, file) = self.into_fields()?;
        Ok((RegisterUserRequest { name, email, password }, file))
    }

    fn into_update(self) -> Result<(UpdateUserRequest, Option<UploadRequest>), ApiError> {
        let (name, email, password, file) = self.into_fields()?;
        Ok((UpdateUserRequest { name, email, password }, file))
    }
}

/// Drop a stored upload that no user ended up referencing
async fn discard_upload(state: &AppState, file: &UploadedFile) {
    if let Err(e) = state.upload_store.remove(file).await {
        warn!(error = %e, url = %file.url, "Failed to discard unused upload");
    }
}

pub async fn register_user(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, ApiError> {
    let (request, file) = UserForm::read(multipart).await?.into_register()?;

    // Nothing is written before the fields are known to be valid
    validate_user_fields(&request.name, &request.email, &request.password)
        .map_err(DomainError::from)?;

    let profile_image = match file {
        Some(upload) => Some(state.upload_store.store(upload).await?),
        None => None,
    };

    if let Err(e) = state
        .user_service
        .register(request, profile_image.clone())
        .await
    {
        if let Some(image) = &profile_image {
            discard_upload(&state, image).await;
        }
        return Err(e.into());
    }

    Ok(Redirect::to(REGISTERED_REDIRECT))
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"))
}

/// Read a modification as JSON or, when it carries an image, as a multipart form
async fn read_update(
    request: Request,
    state: &AppState,
) -> Result<(UpdateUserRequest, Option<UploadRequest>), Response> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let form = UserForm::read(multipart)
            .await
            .map_err(IntoResponse::into_response)?;
        return form.into_update().map_err(IntoResponse::into_response);
    }

    let Json(update) = Json::<UpdateUserRequest>::from_request(request, state)
        .await
        .map_err(IntoResponse::into_response)?;
    Ok((update, None))
}

/// Store the new image only once the caller may modify the target, and keep
/// exactly one image per user afterwards
async fn modify_with_image(
    state: &AppState,
    id: UserId,
    request: UpdateUserRequest,
    session: &UserSession,
    upload: Option<UploadRequest>,
) -> Result<UserResponse, DomainError> {
    let Some(upload) = upload else {
        return state.user_service.modify(id, request, session, None).await;
    };

    let current = state.user_service.find_user_by_id(id).await?;
    if !session.owns(id) {
        return state.user_service.modify(id, request, session, None).await;
    }
    validate_user_fields(&request.name, &request.email, &request.password)?;

    let previous = current.profile_image().cloned();
    let image = state.upload_store.store(upload).await?;

    match state
        .user_service
        .modify(id, request, session, Some(image.clone()))
        .await
    {
        Ok(user) => {
            if let Some(previous) = &previous {
                discard_upload(state, previous).await;
            }
            Ok(user)
        }
        Err(e) => {
            discard_upload(state, &image).await;
            Err(e)
        }
    }
}

/// Replace the caller's own record
///
/// Accepts JSON, or a multipart form with an optional `file` part for a new
/// profile image. Domain failures are reported as 202 with the message in the
/// body.
pub async fn modify_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    RequireSession { token, session }: RequireSession,
    request: Request,
) -> Response {
    let (update, upload) = match read_update(request, &state).await {
        Ok(parts) => parts,
        Err(rejection) => return rejection,
    };

    let result = modify_with_image(&state, UserId::new(id), update, &session, upload).await;

    match result {
        Ok(user) => {
            if let Err(e) = state.session_store.replace(&token, user.to_session()).await {
                error!(error = %e, "Failed to refresh session after modification");
            }

            let body = ModifyResponse {
                data: Some(user),
                message: MODIFICATION_SUCCESS.to_string(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            let message = if e.is_user_error() {
                e.message().to_string()
            } else {
                error!(error = %e, "Modification failed");
                "Internal server error".to_string()
            };

            let body = ModifyResponse {
                data: None,
                message,
            };
            (StatusCode::ACCEPTED, Json(body)).into_response()
        }
    }
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    RequireSession { session, .. }: RequireSession,
) -> Result<Response, ApiError> {
    let id = UserId::new(id);

    state.user_service.delete(id, &session).await?;
    state.session_store.remove_user(id).await?;

    let cookie = expired_session_cookie(&state.session.cookie_name);
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}
