//! Authenticated-identity extraction.
//!
//! The service never verifies credentials itself. The upstream auth proxy
//! authenticates the session and forwards the verified subject id in the
//! `x-user-id` header; this extractor turns that header into a typed value
//! every coordinator call receives explicitly.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

/// Header carrying the verified subject id, set by the upstream auth proxy.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated user identity for the current request.
/// A missing or malformed header rejects the request with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let user_id = Uuid::parse_str(raw).map_err(|_| AppError::Unauthorized)?;
        Ok(AuthUser(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/v1/ideas");
        if let Some(v) = value {
            builder = builder.header(USER_ID_HEADER, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn test_valid_header_yields_user_id() {
        let user_id = Uuid::new_v4();
        let mut parts = parts_with_header(Some(&user_id.to_string()));

        let extracted = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted, AuthUser(user_id));
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let mut parts = parts_with_header(None);

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_malformed_header_is_unauthorized() {
        let mut parts = parts_with_header(Some("not-a-uuid"));

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
