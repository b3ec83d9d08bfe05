//! Category service
//!
//! Validated CRUD for categories. Deletion is restricted: seeded default
//! categories are never deleted, and a category still referenced by any
//! transaction is rejected with `CategoryInUse`.

use crate::audit::EntityType;
use crate::error::{VaultError, VaultResult};
use crate::models::{Category, CategoryId, CategoryKind, Money};
use crate::storage::Storage;

/// Field changes for `update_category`; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub color: Option<u32>,
    /// `Some(None)` clears the icon
    pub icon: Option<Option<String>>,
    /// `Some(None)` clears the budget limit
    pub budget_limit: Option<Option<Money>>,
    pub kind: Option<CategoryKind>,
}

impl CategoryChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.color.is_none()
            && self.icon.is_none()
            && self.budget_limit.is_none()
            && self.kind.is_none()
    }
}

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a category; names are unique ignoring case
    pub fn create_category(
        &self,
        name: &str,
        kind: CategoryKind,
        changes: CategoryChanges,
    ) -> VaultResult<Category> {
        let name = name.trim();
        if self.storage.categories.name_taken(name, None)? {
            return Err(VaultError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let mut category = Category::with_kind(name, kind);
        apply_changes(&mut category, changes);

        category
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    pub fn get_category(&self, id: CategoryId) -> VaultResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    pub fn find_category(&self, identifier: &str) -> VaultResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return self.storage.categories.get(id);
        }

        // Short display ids ("cat-1a2b3c4d")
        let wanted = identifier.trim();
        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .find(|c| c.id.to_string() == wanted))
    }

    /// Like `find_category`, but a miss is an error
    pub fn require_category(&self, identifier: &str) -> VaultResult<Category> {
        self.find_category(identifier)?
            .ok_or_else(|| VaultError::category_not_found(identifier))
    }

    pub fn list_categories(&self) -> VaultResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// Apply field changes to a category
    pub fn update_category(&self, id: CategoryId, changes: CategoryChanges) -> VaultResult<Category> {
        let mut category = self.storage.categories.require(id)?;
        let before = category.clone();

        if let Some(new_name) = &changes.name {
            let new_name = new_name.trim();
            if self.storage.categories.name_taken(new_name, Some(id))? {
                return Err(VaultError::Duplicate {
                    entity_type: "Category",
                    identifier: new_name.to_string(),
                });
            }
        }

        apply_changes(&mut category, changes);
        category.touch();
        category
            .validate()
            .map_err(|e| VaultError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Fails for default categories and for categories that still have
    /// transactions.
    pub fn delete_category(&self, id: CategoryId) -> VaultResult<Category> {
        let category = self.storage.categories.require(id)?;

        if category.is_default {
            return Err(VaultError::Validation(format!(
                "'{}' is a default category and cannot be deleted",
                category.name
            )));
        }

        let transaction_count = self.storage.transactions.count_by_category(id)?;
        if transaction_count > 0 {
            return Err(VaultError::CategoryInUse {
                category: category.name.clone(),
                transaction_count,
            });
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }
}

fn apply_changes(category: &mut Category, changes: CategoryChanges) {
    if let Some(name) = changes.name {
        category.name = name.trim().to_string();
    }
    if let Some(color) = changes.color {
        category.color = color;
    }
    if let Some(icon) = changes.icon {
        category.icon = icon;
    }
    if let Some(limit) = changes.budget_limit {
        category.budget_limit = limit;
    }
    if let Some(kind) = changes.kind {
        category.kind = Some(kind);
    }
}
