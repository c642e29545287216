//! Direct message handlers. Every route acts for the caller.

use actix_web::{HttpResponse, web};

use ripple_shared::dto::{CountResponse, MarkedResponse, SendMessageRequest};

use super::parse_id;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/messages `{ sender, receiver, text }`
pub async fn send(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<SendMessageRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let sender = identity.acting_as(req.sender.as_deref(), "sender")?;
    let receiver = req
        .receiver
        .as_deref()
        .ok_or_else(|| AppError::BadRequest("receiver is required".to_string()))
        .and_then(|raw| parse_id(raw, "receiver"))?;
    let text = req
        .text
        .ok_or_else(|| AppError::BadRequest("text is required".to_string()))?;

    let message = state.messaging.send(sender, receiver, &text).await?;
    Ok(HttpResponse::Created().json(message))
}

/// GET /api/messages/conversations/{user_id}
pub async fn conversations(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user")?;
    identity.ensure(user_id)?;

    Ok(HttpResponse::Ok().json(state.messaging.conversations(user_id).await?))
}

/// GET /api/messages/unread-count/{user_id}
pub async fn unread_count(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let user_id = parse_id(&path.into_inner(), "user")?;
    identity.ensure(user_id)?;

    let count = state.messaging.unread_count(user_id).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// PUT /api/messages/read/{user_id}/{other_user_id}
pub async fn mark_read(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (user_id, other) = path.into_inner();
    let user_id = parse_id(&user_id, "user")?;
    let other = parse_id(&other, "user")?;
    identity.ensure(user_id)?;

    let updated = state.messaging.mark_read(user_id, other).await?;
    Ok(HttpResponse::Ok().json(MarkedResponse {
        message: "Messages marked as read".to_string(),
        updated,
    }))
}

/// GET /api/messages/{user_id}/{other_user_id}
///
/// Returns the thread oldest first and marks the other side's messages read.
pub async fn thread(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, String)>,
) -> AppResult<HttpResponse> {
    let (user_id, other) = path.into_inner();
    let user_id = parse_id(&user_id, "user")?;
    let other = parse_id(&other, "user")?;
    identity.ensure(user_id)?;

    Ok(HttpResponse::Ok().json(state.messaging.thread(user_id, other).await?))
}
