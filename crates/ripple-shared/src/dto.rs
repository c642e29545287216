//! Data Transfer Objects - request/response types for the API.
//!
//! Identifiers arrive as optional strings so the server can tell a missing
//! id from a malformed one and answer both with a precise message.

use serde::{Deserialize, Serialize};

/// Request to sign in. `email` also accepts a username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigninRequest {
    #[serde(alias = "username", alias = "login")]
    pub email: String,
    pub password: String,
}

/// Response containing an access token and the signed-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse<U> {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: U,
}

/// `{ "user": ... }` wrapper returned by signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope<U> {
    pub user: U,
}

/// Body of follow / unfollow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    pub follower_id: Option<String>,
}

/// Body naming the acting user (like, unlike, save, unsave).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorRequest {
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub user_id: Option<String>,
    pub text: Option<String>,
}

/// Partial profile edit; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub sender: Option<String>,
    pub receiver: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub user: Option<String>,
    pub from: Option<String>,
    #[serde(rename = "type")]
    pub notification_type: Option<String>,
    pub post: Option<String>,
    pub comment: Option<String>,
}

/// Plain confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub message: String,
    pub likes_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse<C> {
    pub message: String,
    pub comment: C,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Confirmation of a bulk read-flag update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkedResponse {
    pub message: String,
    pub updated: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signin_accepts_username_alias() {
        let req: SigninRequest =
            serde_json::from_str(r#"{"username":"ana","password":"pw"}"#).unwrap();
        assert_eq!(req.email, "ana");
    }

    #[test]
    fn test_missing_actor_deserializes_to_none() {
        let req: FollowRequest = serde_json::from_str("{}").unwrap();
        assert!(req.follower_id.is_none());

        let req: CommentRequest =
            serde_json::from_str(r#"{"userId":"abc","text":"hi"}"#).unwrap();
        assert_eq!(req.user_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_like_response_is_camel_case() {
        let json = serde_json::to_value(LikeResponse {
            message: "Post liked successfully".into(),
            likes_count: 3,
        })
        .unwrap();
        assert_eq!(json["likesCount"], 3);
    }
}
