//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::{VaultError, VaultResult};
use crate::models::{Category, CategoryId};

use super::file_io::{read_json, stage_json, StagedWrite};
use super::lock_error;

/// On-disk shape of categories.json
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CategoryData {
    pub categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    categories: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            categories: RwLock::new(HashMap::new()),
        }
    }

    /// Load categories from disk
    pub fn load(&self) -> VaultResult<()> {
        let file_data: CategoryData = read_json(&self.path)?;
        self.replace_all(file_data.categories)
    }

    /// Save categories to disk, sorted by name
    pub fn save(&self) -> VaultResult<()> {
        self.stage()?.commit()
    }

    /// Write the collection to a temp file for a later commit
    pub fn stage(&self) -> VaultResult<StagedWrite> {
        let categories = self.get_all()?;
        stage_json(&self.path, &CategoryData { categories })
    }

    pub fn get(&self, id: CategoryId) -> VaultResult<Option<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.get(&id).cloned())
    }

    /// All categories sorted by name, then id
    pub fn get_all(&self) -> VaultResult<Vec<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;
        let mut list: Vec<_> = categories.values().cloned().collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(list)
    }

    /// Case-insensitive name lookup
    pub fn get_by_name(&self, name: &str) -> VaultResult<Option<Category>> {
        let categories = self.categories.read().map_err(lock_error)?;
        let wanted = name.trim().to_lowercase();
        Ok(categories
            .values()
            .find(|c| c.name.to_lowercase() == wanted)
            .cloned())
    }

    /// Insert or update a category
    pub fn upsert(&self, category: Category) -> VaultResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        categories.insert(category.id, category);
        Ok(())
    }

    /// Delete a category, returning it if it existed
    pub fn delete(&self, id: CategoryId) -> VaultResult<Option<Category>> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        Ok(categories.remove(&id))
    }

    /// Swap the whole in-memory category set (used by restore)
    pub fn replace_all(&self, list: Vec<Category>) -> VaultResult<()> {
        let mut categories = self.categories.write().map_err(lock_error)?;
        categories.clear();
        for category in list {
            categories.insert(category.id, category);
        }
        Ok(())
    }

    pub fn count(&self) -> VaultResult<usize> {
        let categories = self.categories.read().map_err(lock_error)?;
        Ok(categories.len())
    }

    /// Check whether another category already uses `name`
    pub fn name_taken(&self, name: &str, except: Option<CategoryId>) -> VaultResult<bool> {
        Ok(match self.get_by_name(name)? {
            Some(existing) => Some(existing.id) != except,
            None => false,
        })
    }

    /// Fetch a category or fail with `NotFound`
    pub fn require(&self, id: CategoryId) -> VaultResult<Category> {
        self.get(id)?
            .ok_or_else(|| VaultError::category_not_found(id.to_string()))
    }
}
