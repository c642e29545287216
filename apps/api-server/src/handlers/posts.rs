//! Post, like, comment and saved-post handlers.

use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};

use ripple_core::services::NewPost;
use ripple_shared::dto::{
    ActorRequest, CommentRequest, CommentResponse, LikeResponse, MessageResponse,
};

use super::parse_id;
use super::upload::UploadForm;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/posts (multipart: photo, caption, location)
///
/// The author is always the caller.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let mut form = UploadForm::read(payload, state.max_upload_bytes).await?;
    if let Some(user_id) = form.text("user") {
        identity.ensure(parse_id(&user_id, "user")?)?;
    }

    let upload = form.take_file("photo").or_else(|| form.take_file("media"));
    let post = state
        .posts
        .create(identity.user_id, NewPost {
            caption: form.text("caption"),
            location: form.text("location"),
            upload,
        })
        .await?;

    Ok(HttpResponse::Created().json(post))
}

/// GET /api/posts
pub async fn list(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.posts.feed().await?))
}

/// GET /api/posts/user/{user_id}
pub async fn by_user(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user")?;
    Ok(HttpResponse::Ok().json(state.posts.by_author(user_id).await?))
}

/// GET /api/posts/saved/{user_id}
pub async fn saved(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user")?;
    Ok(HttpResponse::Ok().json(state.posts.saved(user_id).await?))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post")?;
    state.posts.delete(identity.user_id, post_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post deleted successfully")))
}

/// POST /api/posts/{id}/save `{ userId }`
pub async fn save(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ActorRequest>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post")?;
    let user_id = identity.acting_as(body.user_id.as_deref(), "userId")?;

    state.engagement.save(user_id, post_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post saved successfully")))
}

/// DELETE /api/posts/{id}/save `{ userId }`
pub async fn unsave(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ActorRequest>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post")?;
    let user_id = identity.acting_as(body.user_id.as_deref(), "userId")?;

    state.engagement.unsave(user_id, post_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Post unsaved successfully")))
}

/// POST /api/posts/{id}/like `{ userId }`
pub async fn like(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ActorRequest>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post")?;
    let user_id = identity.acting_as(body.user_id.as_deref(), "userId")?;

    let outcome = state.engagement.like(user_id, post_id).await?;
    Ok(HttpResponse::Ok().json(LikeResponse {
        message: "Post liked successfully".to_string(),
        likes_count: outcome.likes_count,
    }))
}

/// DELETE /api/posts/{id}/like `{ userId }`
pub async fn unlike(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<ActorRequest>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post")?;
    let user_id = identity.acting_as(body.user_id.as_deref(), "userId")?;

    let outcome = state.engagement.unlike(user_id, post_id).await?;
    Ok(HttpResponse::Ok().json(LikeResponse {
        message: "Post unliked successfully".to_string(),
        likes_count: outcome.likes_count,
    }))
}

/// POST /api/posts/{id}/comment `{ userId, text }`
pub async fn comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let post_id = parse_id(&path.into_inner(), "post")?;
    let req = body.into_inner();
    let user_id = identity.acting_as(req.user_id.as_deref(), "userId")?;
    let text = req
        .text
        .ok_or_else(|| AppError::BadRequest("text is required".to_string()))?;

    let comment = state.engagement.comment(user_id, post_id, &text).await?;
    Ok(HttpResponse::Ok().json(CommentResponse {
        message: "Comment added successfully".to_string(),
        comment,
    }))
}
