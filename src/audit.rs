use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Mutations recorded in the audit trail.
#[derive(Debug, Clone, Copy)]
pub enum AuditAction {
    UserRegister,
    UserLogin,
    ProductCreate,
    ProductUpdate,
    ProductDelete,
}

impl AuditAction {
    fn as_str(self) -> &'static str {
        match self {
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
            AuditAction::ProductCreate => "product_create",
            AuditAction::ProductUpdate => "product_update",
            AuditAction::ProductDelete => "product_delete",
        }
    }

    fn resource(self) -> &'static str {
        match self {
            AuditAction::UserRegister | AuditAction::UserLogin => "users",
            AuditAction::ProductCreate | AuditAction::ProductUpdate | AuditAction::ProductDelete => {
                "products"
            }
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}
