use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderName},
};
use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: HeaderName = HeaderName::from_static("x-user-id");

/// Identity of the household member making the request, as asserted by the
/// upstream auth layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActingUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for ActingUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(&USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing x-user-id header".into()))?;

        let user_id = Uuid::parse_str(raw.trim()).map_err(|_| {
            warn!("malformed x-user-id header");
            AppError::Unauthorized("invalid x-user-id header".into())
        })?;

        Ok(ActingUser(user_id))
    }
}
