//! Authentication handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use ripple_core::services::NewAccount;
use ripple_shared::dto::{AuthResponse, SigninRequest, UserEnvelope};

use super::upload::UploadForm;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/signup (multipart: username, email, password, bio, avatar)
pub async fn signup(state: web::Data<AppState>, payload: Multipart) -> AppResult<HttpResponse> {
    let mut form = UploadForm::read(payload, state.max_upload_bytes).await?;

    let required = |name: &str| {
        form.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("{name} is required")))
    };
    let username = required("username")?;
    let email = required("email")?;
    let password = form
        .raw("password")
        .ok_or_else(|| AppError::BadRequest("password is required".to_string()))?;
    let bio = form.text("bio");

    let user = state
        .accounts
        .signup(NewAccount {
            username,
            email,
            password,
            bio,
            avatar: form.take_file("avatar"),
        })
        .await?;

    Ok(HttpResponse::Created().json(UserEnvelope { user }))
}

/// POST /api/auth/signin
pub async fn signin(
    state: web::Data<AppState>,
    body: web::Json<SigninRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let session = state.accounts.signin(&req.email, &req.password).await?;

    tracing::info!(user_id = %session.user.id, "User signed in");

    Ok(HttpResponse::Ok().json(AuthResponse {
        token: session.token,
        token_type: "Bearer".to_string(),
        expires_in: session.expires_in,
        user: session.user,
    }))
}
