//! Profile, search and follow handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use ripple_core::domain::{ProfileUpdate, UserKey};
use ripple_shared::dto::{FollowRequest, MessageResponse, UpdateProfileRequest};

use super::parse_id;
use super::upload::UploadForm;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/users/search/{query}
pub async fn search(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let users = state.accounts.search(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// POST /api/users/{id}/follow `{ followerId }`
pub async fn follow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<FollowRequest>,
) -> AppResult<HttpResponse> {
    let target = parse_id(&path.into_inner(), "user")?;
    let follower = identity.acting_as(body.follower_id.as_deref(), "followerId")?;

    state.graph.follow(follower, target).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Successfully followed user")))
}

/// POST /api/users/{id}/unfollow `{ followerId }`
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<FollowRequest>,
) -> AppResult<HttpResponse> {
    let target = parse_id(&path.into_inner(), "user")?;
    let follower = identity.acting_as(body.follower_id.as_deref(), "followerId")?;

    state.graph.unfollow(follower, target).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Successfully unfollowed user")))
}

/// GET /api/users/{key} - by id or username
pub async fn get_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user = state.accounts.get(&UserKey::parse(&path.into_inner())).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/users/{key}
pub async fn update_profile(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let update = ProfileUpdate {
        display_name: req.display_name,
        username: req.username,
        email: req.email,
        bio: req.bio,
        website: req.website,
        phone: req.phone,
        gender: req.gender,
        avatar: None,
    };

    let user = state
        .accounts
        .update_profile(identity.user_id, &UserKey::parse(&path.into_inner()), update)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/users/{key}/avatar (multipart: avatar)
pub async fn update_avatar(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut form = UploadForm::read(payload, state.max_upload_bytes).await?;
    let upload = form
        .take_file("avatar")
        .ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    let user = state
        .accounts
        .update_avatar(identity.user_id, &UserKey::parse(&path.into_inner()), upload)
        .await?;
    Ok(HttpResponse::Ok().json(user))
}
