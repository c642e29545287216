//! Notification inbox handlers.

use actix_web::{HttpResponse, web};

use ripple_core::domain::{NotificationKind, NotificationType};
use ripple_shared::dto::{CreateNotificationRequest, MarkedResponse, MessageResponse};

use super::parse_id;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/notifications/{user_id}
pub async fn list(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user")?;
    identity.ensure(user_id)?;

    Ok(HttpResponse::Ok().json(state.inbox.list(user_id).await?))
}

/// POST /api/notifications `{ user, from, type, post?, comment? }`
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreateNotificationRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let actor = identity.acting_as(req.from.as_deref(), "from")?;
    let recipient = required(req.user.as_deref(), "user")?;
    let notification_type = req
        .notification_type
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("type is required".to_string()))?
        .parse::<NotificationType>()?;
    let post = optional(req.post.as_deref(), "post")?;
    let comment = optional(req.comment.as_deref(), "comment")?;

    let kind = NotificationKind::from_parts(notification_type, post, comment)?;

    match state.inbox.create(recipient, actor, kind).await? {
        Some(notification) => Ok(HttpResponse::Created().json(notification)),
        None => Ok(HttpResponse::Ok().json(MessageResponse::new("No self-notification created"))),
    }
}

/// PUT /api/notifications/{user_id}/read
pub async fn mark_all_read(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user")?;
    identity.ensure(user_id)?;

    let updated = state.inbox.mark_all_read(user_id).await?;
    Ok(HttpResponse::Ok().json(MarkedResponse {
        message: "All notifications marked as read".to_string(),
        updated,
    }))
}

/// PUT /api/notifications/{user_id}/{id}/read
pub async fn mark_read(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (user_id, id) = path.into_inner();
    let user_id = parse_id(&user_id, "user")?;
    let id = parse_id(&id, "notification")?;
    identity.ensure(user_id)?;

    state.inbox.mark_read(user_id, id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Notification marked as read")))
}

fn required(raw: Option<&str>, field: &str) -> AppResult<uuid::Uuid> {
    let raw = raw.ok_or_else(|| AppError::BadRequest(format!("{field} is required")))?;
    parse_id(raw, field)
}

fn optional(raw: Option<&str>, field: &str) -> AppResult<Option<uuid::Uuid>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| parse_id(s, field))
        .transpose()
}
