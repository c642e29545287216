//! Bearer-token authentication extractor.

use std::future::{Ready, ready};
use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};
use uuid::Uuid;

use ripple_core::ports::{AuthError, TokenClaims, TokenService};
use ripple_shared::ErrorResponse;

use super::error::{AppError, AppResult};

/// Authenticated caller, resolved from the `Authorization: Bearer` header.
///
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub username: String,
}

impl Identity {
    /// Resolve the acting user named in a request and require that it is
    /// the caller. Missing or malformed ids are 400, someone else's id is 403.
    pub fn acting_as(&self, raw: Option<&str>, field: &str) -> AppResult<Uuid> {
        let raw = raw
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::BadRequest(format!("{field} is required")))?;
        let id = Uuid::parse_str(raw)
            .map_err(|_| AppError::BadRequest(format!("Invalid {field}")))?;
        self.ensure(id)?;
        Ok(id)
    }

    /// Require that `user_id` is the caller.
    pub fn ensure(&self, user_id: Uuid) -> AppResult<()> {
        if user_id == self.user_id {
            Ok(())
        } else {
            tracing::debug!(caller = %self.user_id, claimed = %user_id, "Acting user mismatch");
            Err(AppError::Forbidden(
                "You can only act on your own behalf".to_string(),
            ))
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AuthenticationError(pub AuthError);

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> StatusCode {
        match &self.0 {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                StatusCode::UNAUTHORIZED
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match &self.0 {
            AuthError::TokenExpired => ErrorResponse::new(401, "Token Expired")
                .with_detail("Your authentication token has expired. Please sign in again."),
            AuthError::InvalidToken(msg) => {
                ErrorResponse::new(401, "Invalid Token").with_detail(msg.clone())
            }
            AuthError::MissingAuth => ErrorResponse::new(401, "Authentication Required")
                .with_detail("Please provide a valid Bearer token in the Authorization header."),
            _ => ErrorResponse::internal_error(),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(tokens) = req.app_data::<web::Data<Arc<dyn TokenService>>>() else {
        tracing::error!("TokenService not found in app data");
        return Err(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        ));
    };

    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;
    let value = header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    tokens.validate_token(token.trim()).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(AuthenticationError))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ana() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            username: "ana".to_string(),
        }
    }

    #[test]
    fn test_acting_as_self() {
        let me = ana();
        let id = me.user_id.to_string();
        assert_eq!(me.acting_as(Some(&id), "userId").unwrap(), me.user_id);
    }

    #[test]
    fn test_acting_as_missing_is_bad_request() {
        let me = ana();
        assert!(matches!(
            me.acting_as(None, "userId"),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            me.acting_as(Some("  "), "userId"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_acting_as_malformed_is_bad_request() {
        assert!(matches!(
            ana().acting_as(Some("not-a-uuid"), "userId"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_acting_as_someone_else_is_forbidden() {
        let other = Uuid::new_v4().to_string();
        assert!(matches!(
            ana().acting_as(Some(&other), "userId"),
            Err(AppError::Forbidden(_))
        ));
    }
}
