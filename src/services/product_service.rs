use uuid::Uuid;

use crate::{
    audit::{AuditAction, log_audit},
    dto::products::{ProductListPayload, ProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ProductAction, authorize_product},
    models::Product,
    pagination::{Page, page_links},
    response::ApiResponse,
    routes::params::{ProductQuery, SortOrder},
    state::AppState,
};
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductListPayload>> {
    let normalized = query.normalize();
    let mut condition = Condition::all();

    if let Some(category) = normalized.category.as_deref() {
        condition = condition.add(Column::Category.eq(category));
    }
    if let Some(status) = normalized.status {
        condition = condition.add(Column::Status.eq(status));
    }
    if let Some(title) = normalized.title.as_ref() {
        let pattern = format!("%{}%", title);
        condition = condition.add(Expr::col(Column::Title).ilike(pattern));
    }

    let mut finder = Products::find().filter(condition);
    finder = match normalized.sort {
        Some(SortOrder::Asc) => finder.order_by_asc(Column::Price),
        Some(SortOrder::Desc) => finder.order_by_desc(Column::Price),
        None => finder,
    };

    let total = finder.clone().count(&state.orm).await?;
    let offset = normalized.page.saturating_sub(1) * normalized.limit;
    let items: Vec<Product> = finder
        .limit(normalized.limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let page = Page::new(items, normalized.page, total, normalized.limit);
    let (prev_link, next_link) = page_links(&page, &query);

    Ok(ApiResponse::success(ProductListPayload {
        products: page.items,
        total_pages: page.total_pages,
        prev_page: page.prev_page,
        next_page: page.next_page,
        page: page.page,
        has_prev_page: page.has_prev_page,
        has_next_page: page.has_next_page,
        prev_link,
        next_link,
    }))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound(format!("no product exists with id {id}"))),
    };
    Ok(ApiResponse::success(result))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: ProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let fields = required_fields(&payload)?;

    // Pre-insert check; the unique index on code is what actually closes the
    // race between concurrent creates.
    let existing = Products::find()
        .filter(Column::Code.eq(fields.code.as_str()))
        .one(&state.orm)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(format!(
            "a product with code {} already exists",
            fields.code
        )));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(fields.title),
        description: Set(fields.description),
        code: Set(fields.code),
        price: Set(fields.price),
        stock: Set(fields.stock),
        status: Set(payload.status.unwrap_or(true)),
        category: Set(fields.category),
        thumbnails: Set(payload.thumbnails.clone()),
        owner: Set(owner_for(user)),
        created_at: NotSet,
    };
    let product = active.insert(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductCreate,
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(product_from_entity(product)))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let fields = required_fields(&payload)?;
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound(format!("no product exists with id {id}"))),
    };

    authorize_product(user, &existing.owner, ProductAction::Update)?;

    // Full replace; absent status/thumbnails keep the stored value.
    let status = payload.status.unwrap_or(existing.status);
    let thumbnails = payload.thumbnails.clone().or_else(|| existing.thumbnails.clone());

    let mut active: ActiveModel = existing.into();
    active.title = Set(fields.title);
    active.description = Set(fields.description);
    active.code = Set(fields.code);
    active.price = Set(fields.price);
    active.stock = Set(fields.stock);
    active.status = Set(status);
    active.category = Set(fields.category);
    active.thumbnails = Set(thumbnails);

    let product = active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductUpdate,
        Some(serde_json::json!({ "product_id": product.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(product_from_entity(product)))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound(format!("no product exists with id {id}"))),
    };

    authorize_product(user, &existing.owner, ProductAction::Delete)?;

    let snapshot = product_from_entity(existing);
    Products::delete_by_id(id).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        AuditAction::ProductDelete,
        Some(serde_json::json!({ "product_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(snapshot))
}

struct RequiredFields {
    title: String,
    description: String,
    code: String,
    price: f64,
    stock: i32,
    category: String,
}

// Zero price or stock counts as missing, like the empty strings; see
// DESIGN.md before changing this.
fn required_fields(payload: &ProductRequest) -> AppResult<RequiredFields> {
    let title = payload.title.as_deref().filter(|s| !s.is_empty());
    let description = payload.description.as_deref().filter(|s| !s.is_empty());
    let code = payload.code.as_deref().filter(|s| !s.is_empty());
    let category = payload.category.as_deref().filter(|s| !s.is_empty());
    let price = payload.price.filter(|p| *p != 0.0);
    let stock = payload.stock.filter(|s| *s != 0);

    match (title, description, code, price, stock, category) {
        (Some(title), Some(description), Some(code), Some(price), Some(stock), Some(category)) => {
            Ok(RequiredFields {
                title: title.to_string(),
                description: description.to_string(),
                code: code.to_string(),
                price,
                stock,
                category: category.to_string(),
            })
        }
        _ => Err(AppError::Validation(
            "missing or invalid required product fields".to_string(),
        )),
    }
}

fn owner_for(user: &AuthUser) -> String {
    if user.role == "premium" {
        user.email.clone()
    } else {
        "admin".to_string()
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        title: model.title,
        description: model.description,
        code: model.code,
        price: model.price,
        stock: model.stock,
        status: model.status,
        category: model.category,
        thumbnails: model.thumbnails,
        owner: model.owner,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> ProductRequest {
        ProductRequest {
            title: Some("Latte".into()),
            description: Some("Espresso with steamed milk".into()),
            code: Some("C1".into()),
            price: Some(5.0),
            stock: Some(10),
            category: Some("coffee".into()),
            status: None,
            thumbnails: None,
        }
    }

    fn requester(role: &str, email: &str) -> AuthUser {
        AuthUser {
            user_id: Uuid::nil(),
            email: email.into(),
            role: role.into(),
        }
    }

    #[test]
    fn complete_request_passes_validation() {
        let fields = required_fields(&valid_request()).expect("valid");
        assert_eq!(fields.title, "Latte");
        assert_eq!(fields.code, "C1");
    }

    #[test]
    fn zero_price_is_treated_as_missing() {
        let request = ProductRequest {
            price: Some(0.0),
            ..valid_request()
        };
        assert!(matches!(
            required_fields(&request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn zero_stock_is_treated_as_missing() {
        let request = ProductRequest {
            stock: Some(0),
            ..valid_request()
        };
        assert!(matches!(
            required_fields(&request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn empty_title_is_treated_as_missing() {
        let request = ProductRequest {
            title: Some(String::new()),
            ..valid_request()
        };
        assert!(matches!(
            required_fields(&request),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn premium_creator_owns_the_product() {
        let owner = owner_for(&requester("premium", "ana@example.com"));
        assert_eq!(owner, "ana@example.com");
    }

    #[test]
    fn other_roles_default_to_admin_owner() {
        assert_eq!(owner_for(&requester("admin", "root@example.com")), "admin");
        assert_eq!(owner_for(&requester("user", "bob@example.com")), "admin");
    }
}
