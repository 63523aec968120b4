//! Category repository.
//!
//! Categories with a NULL `user_id` are system defaults: visible to every
//! owner, editable by none.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use lyvinx_core::category::{CategoryOwner, DefaultCategory};
use lyvinx_shared::types::{CategoryId, UserId};

use crate::entities::{categories, transactions};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category not found, not visible, or not editable.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Parent category not found or not visible.
    #[error("Parent category not found: {0}")]
    ParentNotFound(Uuid),

    /// A category may not be its own parent.
    #[error("A category cannot be its own parent")]
    SelfParent,

    /// The requested parent is itself a subcategory.
    #[error("Category {0} is a subcategory and cannot have subcategories")]
    NestedParent(Uuid),

    /// A category with children cannot become a subcategory.
    #[error("Cannot move category: it has {0} subcategories")]
    ParentHasChildren(u64),

    /// Same name already used under the same parent.
    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    /// Category still referenced by transactions.
    #[error("Cannot delete category: it has {0} transactions")]
    HasTransactions(u64),

    /// Category still has children.
    #[error("Cannot delete category: it has {0} subcategories")]
    HasSubcategories(u64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryInput {
    /// Name, unique per (owner, parent).
    pub name: String,
    /// Icon identifier.
    pub icon: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
    /// Parent category.
    pub parent_id: Option<CategoryId>,
    /// Free text.
    pub description: Option<String>,
}

/// Input for updating a category. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryInput {
    /// Name.
    pub name: Option<String>,
    /// Icon identifier.
    pub icon: Option<String>,
    /// `#RRGGBB` color.
    pub color: Option<String>,
    /// Parent category.
    pub parent_id: Option<CategoryId>,
    /// Free text.
    pub description: Option<String>,
}

/// A category with its parent and children.
#[derive(Debug, Clone)]
pub struct CategoryTree {
    /// The category.
    pub category: categories::Model,
    /// Parent, if nested.
    pub parent: Option<categories::Model>,
    /// Direct children visible to the viewer.
    pub subcategories: Vec<categories::Model>,
}

/// Categories visible to `owner`: their own plus the system defaults.
pub(crate) fn visible_to(owner: UserId) -> Condition {
    Condition::any()
        .add(categories::Column::UserId.eq(owner.into_inner()))
        .add(categories::Column::UserId.is_null())
}

/// Loads a category only if `owner` may see it.
pub(crate) async fn find_visible<C: ConnectionTrait>(
    conn: &C,
    owner: UserId,
    id: CategoryId,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find_by_id(id.into_inner())
        .filter(visible_to(owner))
        .one(conn)
        .await
}

/// Checks that `parent_id` is visible and top-level. Nesting is one level deep.
async fn ensure_top_level_parent<C: ConnectionTrait>(
    conn: &C,
    owner: UserId,
    parent_id: CategoryId,
) -> Result<(), CategoryError> {
    let parent = find_visible(conn, owner, parent_id)
        .await?
        .ok_or(CategoryError::ParentNotFound(parent_id.into_inner()))?;
    if parent.parent_id.is_some() {
        return Err(CategoryError::NestedParent(parent.id));
    }
    Ok(())
}

/// Category repository.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists the owner's categories plus defaults by name, each with parent
    /// and subcategories.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<CategoryTree>, DbErr> {
        let all = categories::Entity::find()
            .filter(visible_to(owner))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?;

        let by_id: HashMap<Uuid, &categories::Model> = all.iter().map(|c| (c.id, c)).collect();
        let mut children: HashMap<Uuid, Vec<categories::Model>> = HashMap::new();
        for category in &all {
            if let Some(parent_id) = category.parent_id {
                children.entry(parent_id).or_default().push(category.clone());
            }
        }

        Ok(all
            .iter()
            .map(|category| CategoryTree {
                parent: category
                    .parent_id
                    .and_then(|p| by_id.get(&p))
                    .map(|p| (*p).clone()),
                subcategories: children.remove(&category.id).unwrap_or_default(),
                category: category.clone(),
            })
            .collect())
    }

    /// Finds a visible category with parent and subcategories.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Database`.
    pub async fn find(&self, owner: UserId, id: CategoryId) -> Result<CategoryTree, CategoryError> {
        let category = find_visible(&self.db, owner, id)
            .await?
            .ok_or(CategoryError::NotFound(id.into_inner()))?;

        let parent = match category.parent_id {
            Some(parent_id) => find_visible(&self.db, owner, CategoryId::from(parent_id)).await?,
            None => None,
        };
        let subcategories = categories::Entity::find()
            .filter(categories::Column::ParentId.eq(category.id))
            .filter(visible_to(owner))
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?;

        Ok(CategoryTree {
            category,
            parent,
            subcategories,
        })
    }

    /// Creates an owner-scoped category.
    ///
    /// # Errors
    ///
    /// `ParentNotFound`, `NestedParent`, `DuplicateName`, or `Database`.
    pub async fn create(
        &self,
        owner: UserId,
        input: CreateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        if let Some(parent_id) = input.parent_id {
            ensure_top_level_parent(&self.db, owner, parent_id).await?;
        }
        if self
            .name_taken(owner, &input.name, input.parent_id, None)
            .await?
        {
            return Err(CategoryError::DuplicateName(input.name));
        }

        let now = chrono::Utc::now().into();
        let model = categories::ActiveModel {
            id: Set(CategoryId::new().into_inner()),
            user_id: Set(CategoryOwner::Owner(owner).to_column().map(UserId::into_inner)),
            parent_id: Set(input.parent_id.map(CategoryId::into_inner)),
            name: Set(input.name),
            icon: Set(input.icon),
            color: Set(input.color),
            description: Set(input.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Updates one of the owner's categories. Defaults are not editable and
    /// report `NotFound`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `ParentNotFound`, `SelfParent`, `NestedParent`,
    /// `ParentHasChildren`, `DuplicateName`, or `Database`.
    pub async fn update(
        &self,
        owner: UserId,
        id: CategoryId,
        input: UpdateCategoryInput,
    ) -> Result<categories::Model, CategoryError> {
        let existing = self.find_editable(owner, id).await?;

        if let Some(parent_id) = input.parent_id {
            if parent_id == id {
                return Err(CategoryError::SelfParent);
            }
            ensure_top_level_parent(&self.db, owner, parent_id).await?;

            let child_count = categories::Entity::find()
                .filter(categories::Column::ParentId.eq(existing.id))
                .count(&self.db)
                .await?;
            if child_count > 0 {
                return Err(CategoryError::ParentHasChildren(child_count));
            }
        }

        let target_parent = input
            .parent_id
            .or_else(|| existing.parent_id.map(CategoryId::from));
        let name_changed = input.name.as_ref().is_some_and(|n| *n != existing.name);
        if name_changed || input.parent_id.is_some() {
            let name = input.name.as_deref().unwrap_or(&existing.name);
            if self.name_taken(owner, name, target_parent, Some(id)).await? {
                return Err(CategoryError::DuplicateName(name.to_string()));
            }
        }

        let mut active: categories::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(icon) = input.icon {
            active.icon = Set(Some(icon));
        }
        if let Some(color) = input.color {
            active.color = Set(Some(color));
        }
        if let Some(parent_id) = input.parent_id {
            active.parent_id = Set(Some(parent_id.into_inner()));
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes one of the owner's categories if nothing references it.
    ///
    /// # Errors
    ///
    /// `NotFound`, `HasTransactions`, `HasSubcategories`, or `Database`.
    pub async fn delete(&self, owner: UserId, id: CategoryId) -> Result<(), CategoryError> {
        let existing = self.find_editable(owner, id).await?;

        let transaction_count = transactions::Entity::find()
            .filter(transactions::Column::CategoryId.eq(existing.id))
            .count(&self.db)
            .await?;
        if transaction_count > 0 {
            return Err(CategoryError::HasTransactions(transaction_count));
        }

        let child_count = categories::Entity::find()
            .filter(categories::Column::ParentId.eq(existing.id))
            .count(&self.db)
            .await?;
        if child_count > 0 {
            return Err(CategoryError::HasSubcategories(child_count));
        }

        categories::Entity::delete_by_id(existing.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Inserts the default catalog, skipping entries that already exist.
    /// Returns the number of categories inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if a database operation fails.
    pub async fn seed_defaults(&self, catalog: &[DefaultCategory]) -> Result<usize, DbErr> {
        let mut inserted = 0;
        for entry in catalog {
            let (parent, created) = self
                .ensure_default(entry.name, entry.icon, entry.color, None)
                .await?;
            inserted += usize::from(created);
            for sub in entry.subcategories {
                let (_, created) = self
                    .ensure_default(sub, entry.icon, entry.color, Some(parent.id))
                    .await?;
                inserted += usize::from(created);
            }
        }
        Ok(inserted)
    }

    async fn ensure_default(
        &self,
        name: &str,
        icon: &str,
        color: &str,
        parent_id: Option<Uuid>,
    ) -> Result<(categories::Model, bool), DbErr> {
        let parent_filter = match parent_id {
            Some(id) => categories::Column::ParentId.eq(id),
            None => categories::Column::ParentId.is_null(),
        };
        let existing = categories::Entity::find()
            .filter(categories::Column::UserId.is_null())
            .filter(categories::Column::Name.eq(name))
            .filter(parent_filter)
            .one(&self.db)
            .await?;
        if let Some(existing) = existing {
            return Ok((existing, false));
        }

        let now = chrono::Utc::now().into();
        let created = categories::ActiveModel {
            id: Set(CategoryId::new().into_inner()),
            user_id: Set(CategoryOwner::SystemDefault.to_column().map(UserId::into_inner)),
            parent_id: Set(parent_id),
            name: Set(name.to_string()),
            icon: Set(Some(icon.to_string())),
            color: Set(Some(color.to_string())),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await?;
        Ok((created, true))
    }

    async fn find_editable(
        &self,
        owner: UserId,
        id: CategoryId,
    ) -> Result<categories::Model, CategoryError> {
        let category = find_visible(&self.db, owner, id)
            .await?
            .ok_or(CategoryError::NotFound(id.into_inner()))?;

        let category_owner = CategoryOwner::from_column(category.user_id.map(UserId::from));
        if !category_owner.is_editable_by(owner) {
            return Err(CategoryError::NotFound(id.into_inner()));
        }
        Ok(category)
    }

    async fn name_taken(
        &self,
        owner: UserId,
        name: &str,
        parent_id: Option<CategoryId>,
        except: Option<CategoryId>,
    ) -> Result<bool, DbErr> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::UserId.eq(owner.into_inner()))
            .filter(categories::Column::Name.eq(name));
        query = match parent_id {
            Some(parent_id) => query.filter(categories::Column::ParentId.eq(parent_id.into_inner())),
            None => query.filter(categories::Column::ParentId.is_null()),
        };
        if let Some(except) = except {
            query = query.filter(categories::Column::Id.ne(except.into_inner()));
        }

        Ok(query.count(&self.db).await? > 0)
    }
}
