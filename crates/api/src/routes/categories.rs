//! Category routes. System default categories are listed for everyone and
//! editable by no one.

use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    AppState, error::ApiResult, extractors::ValidatedJson, middleware::AuthUser, response,
    validation::hex_color,
};
use lyvinx_db::{
    CategoryRepository,
    entities::categories,
    repositories::{CategoryTree, CreateCategoryInput, UpdateCategoryInput},
};
use lyvinx_shared::types::CategoryId;

/// Creates the category routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
}

/// Request body for creating a category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "must have between 1 and 50 characters"))]
    pub name: String,
    #[validate(length(max = 50, message = "must have at most 50 characters"))]
    pub icon: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
    pub parent_id: Option<Uuid>,
    #[validate(length(max = 255, message = "must have at most 255 characters"))]
    pub description: Option<String>,
}

/// Request body for updating a category.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 50, message = "must have between 1 and 50 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 50, message = "must have at most 50 characters"))]
    pub icon: Option<String>,
    #[validate(custom(function = "hex_color"))]
    pub color: Option<String>,
    pub parent_id: Option<Uuid>,
    #[validate(length(max = 255, message = "must have at most 255 characters"))]
    pub description: Option<String>,
}

/// Flat view of a category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
    /// System default, shared by every user.
    pub is_default: bool,
}

impl From<categories::Model> for CategoryResponse {
    fn from(category: categories::Model) -> Self {
        Self {
            id: category.id,
            is_default: category.user_id.is_none(),
            name: category.name,
            icon: category.icon,
            color: category.color,
            description: category.description,
            parent_id: category.parent_id,
        }
    }
}

/// A category with its parent and children.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTreeResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    pub parent: Option<CategoryResponse>,
    pub subcategories: Vec<CategoryResponse>,
}

impl From<CategoryTree> for CategoryTreeResponse {
    fn from(tree: CategoryTree) -> Self {
        Self {
            category: tree.category.into(),
            parent: tree.parent.map(Into::into),
            subcategories: tree.subcategories.into_iter().map(Into::into).collect(),
        }
    }
}

/// GET /categories - Own and default categories, by name.
async fn list_categories(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let categories = CategoryRepository::new((*state.db).clone())
        .list(auth.user_id())
        .await?;

    let data: Vec<CategoryTreeResponse> = categories.into_iter().map(Into::into).collect();
    Ok(response::ok(data))
}

/// GET /categories/{id} - Get one category.
async fn get_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let tree = CategoryRepository::new((*state.db).clone())
        .find(auth.user_id(), CategoryId::from(id))
        .await?;

    Ok(response::ok(CategoryTreeResponse::from(tree)))
}

/// POST /categories - Create a category.
async fn create_category(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let category = CategoryRepository::new((*state.db).clone())
        .create(
            auth.user_id(),
            CreateCategoryInput {
                name: payload.name.trim().to_string(),
                icon: payload.icon,
                color: payload.color,
                parent_id: payload.parent_id.map(CategoryId::from),
                description: payload.description,
            },
        )
        .await?;

    info!(category_id = %category.id, user_id = %auth.user_id(), "Category created");
    Ok(response::created(
        "Category created",
        CategoryResponse::from(category),
    ))
}

/// PUT /categories/{id} - Update one of the caller's categories.
async fn update_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateCategoryRequest>,
) -> ApiResult<impl IntoResponse> {
    let category = CategoryRepository::new((*state.db).clone())
        .update(
            auth.user_id(),
            CategoryId::from(id),
            UpdateCategoryInput {
                name: payload.name.map(|n| n.trim().to_string()),
                icon: payload.icon,
                color: payload.color,
                parent_id: payload.parent_id.map(CategoryId::from),
                description: payload.description,
            },
        )
        .await?;

    info!(category_id = %category.id, "Category updated");
    Ok(response::ok(CategoryResponse::from(category)))
}

/// DELETE /categories/{id} - Delete an unused category.
async fn delete_category(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    CategoryRepository::new((*state.db).clone())
        .delete(auth.user_id(), CategoryId::from(id))
        .await?;

    info!(category_id = %id, "Category deleted");
    Ok(response::message("Category deleted"))
}
