use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy)]
pub enum ProductAction {
    Update,
    Delete,
}

/// Ownership gate for product mutations. Updates pass unchecked (see
/// DESIGN.md); deletes are denied to a premium user on a product they do not
/// own, while admins and every other role pass.
pub fn authorize_product(
    user: &AuthUser,
    owner: &str,
    action: ProductAction,
) -> Result<(), AppError> {
    match action {
        ProductAction::Update => Ok(()),
        ProductAction::Delete => {
            if user.role == "premium" && user.email != owner {
                return Err(AppError::Unauthorized(format!(
                    "product owned by {owner} does not belong to {}, so it cannot be deleted",
                    user.email
                )));
            }
            Ok(())
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::BadRequest("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::BadRequest("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::BadRequest("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::BadRequest("Invalid user id in token".into()))?;

        Ok(AuthUser {
            user_id,
            email: decoded.claims.email.clone(),
            role: decoded.claims.role.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requester(role: &str, email: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::nil(),
            email: email.into(),
            role: role.into(),
        }
    }

    #[test]
    fn premium_cannot_delete_someone_elses_product() {
        let user = requester("premium", "ana@example.com");
        let result = authorize_product(&user, "admin", ProductAction::Delete);
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn premium_can_delete_own_product() {
        let user = requester("premium", "ana@example.com");
        assert!(authorize_product(&user, "ana@example.com", ProductAction::Delete).is_ok());
    }

    #[test]
    fn admin_can_delete_any_product() {
        let user = requester("admin", "root@example.com");
        assert!(authorize_product(&user, "ana@example.com", ProductAction::Delete).is_ok());
    }

    // Roles other than premium are not ownership-checked on delete.
    #[test]
    fn plain_user_delete_is_not_ownership_checked() {
        let user = requester("user", "bob@example.com");
        assert!(authorize_product(&user, "ana@example.com", ProductAction::Delete).is_ok());
    }

    // Updates are not ownership-checked at all.
    #[test]
    fn update_is_always_permitted() {
        let user = requester("premium", "ana@example.com");
        assert!(authorize_product(&user, "admin", ProductAction::Update).is_ok());
    }
}
