//! Storage initialization
//!
//! First-run setup: creates the directory layout and seeds the default
//! categories, including the salary, investment and yield income categories
//! the monthly rollups depend on.

use crate::config::paths::FinvaultPaths;
use crate::error::VaultResult;
use crate::models::DefaultCategory;

use super::categories::CategoryData;
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing category files are left untouched.
pub fn initialize_storage(paths: &FinvaultPaths) -> VaultResult<()> {
    paths.ensure_directories()?;

    if !paths.categories_file().exists() {
        let categories = DefaultCategory::all()
            .iter()
            .map(DefaultCategory::to_category)
            .collect();
        write_json_atomic(paths.categories_file(), &CategoryData { categories })?;
        tracing::info!(
            count = DefaultCategory::all().len(),
            "Seeded default categories"
        );
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &FinvaultPaths) -> bool {
    !paths.categories_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, CategoryKind};
    use tempfile::TempDir;

    fn read_categories(paths: &FinvaultPaths) -> CategoryData {
        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinvaultPaths::with_base_dir(temp_dir.path());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();

        assert!(!needs_initialization(&paths));
        assert!(paths.data_dir().exists());
        assert!(paths.backup_dir().exists());
    }

    #[test]
    fn test_default_categories_seeded() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinvaultPaths::with_base_dir(temp_dir.path());
        initialize_storage(&paths).unwrap();

        let data = read_categories(&paths);
        assert_eq!(data.categories.len(), DefaultCategory::all().len());
        assert!(data.categories.iter().all(|c| c.is_default));

        let kinds: Vec<_> = data.categories.iter().map(|c| c.kind()).collect();
        assert!(kinds.contains(&CategoryKind::Salary));
        assert!(kinds.contains(&CategoryKind::Investment));
        assert!(kinds.contains(&CategoryKind::Yield));
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinvaultPaths::with_base_dir(temp_dir.path());
        initialize_storage(&paths).unwrap();

        let custom = CategoryData {
            categories: vec![Category::new("Custom")],
        };
        write_json_atomic(paths.categories_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let data = read_categories(&paths);
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Custom");
    }
}
