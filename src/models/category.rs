//! Category model
//!
//! Every transaction is filed under exactly one category. Categories carry a
//! display color, an optional icon token, an optional monthly budget limit,
//! and a `CategoryKind` that decides how income is split between salary and
//! yield in the monthly rollups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::CategoryId;
use super::money::Money;

/// Maximum category name length
pub const MAX_NAME_LEN: usize = 50;

/// Color used when none is given (opaque mid grey)
pub const DEFAULT_COLOR: u32 = 0xFF9E_9E9E;

/// Stable classification of a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Ordinary spending category
    Expense,
    /// Wages and other earned income
    Salary,
    /// Money moved into investments
    Investment,
    /// Returns on investments
    Yield,
}

impl CategoryKind {
    /// Kinds excluded from expense breakdowns
    pub fn is_income_only(&self) -> bool {
        !matches!(self, Self::Expense)
    }

    /// Classify a legacy category that predates the `kind` field
    pub fn infer_from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "rendimentos" | "yield" | "yields" => Self::Yield,
            "salário" | "salario" | "salary" => Self::Salary,
            "investimentos" | "investments" | "investment" => Self::Investment,
            _ => Self::Expense,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expense => write!(f, "expense"),
            Self::Salary => write!(f, "salary"),
            Self::Investment => write!(f, "investment"),
            Self::Yield => write!(f, "yield"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "salary" => Ok(Self::Salary),
            "investment" => Ok(Self::Investment),
            "yield" => Ok(Self::Yield),
            other => Err(format!("Unknown category kind: {}", other)),
        }
    }
}

/// A transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Display label, unique (case-insensitive)
    pub name: String,

    /// Packed ARGB color
    #[serde(default = "default_color")]
    pub color: u32,

    /// Optional icon token
    #[serde(default)]
    pub icon: Option<String>,

    /// Monthly spending limit; `None` means no budget
    #[serde(default)]
    pub budget_limit: Option<Money>,

    /// Seeded categories cannot be deleted
    #[serde(default)]
    pub is_default: bool,

    /// Explicit classification; inferred from the name when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CategoryKind>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

fn default_color() -> u32 {
    DEFAULT_COLOR
}

impl Category {
    /// Create a new expense category
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: DEFAULT_COLOR,
            icon: None,
            budget_limit: None,
            is_default: false,
            kind: Some(CategoryKind::Expense),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a category with an explicit kind
    pub fn with_kind(name: impl Into<String>, kind: CategoryKind) -> Self {
        let mut category = Self::new(name);
        category.kind = Some(kind);
        category
    }

    /// Effective classification
    pub fn kind(&self) -> CategoryKind {
        self.kind
            .unwrap_or_else(|| CategoryKind::infer_from_name(&self.name))
    }

    pub fn is_yield(&self) -> bool {
        self.kind() == CategoryKind::Yield
    }

    pub fn is_income_only(&self) -> bool {
        self.kind().is_income_only()
    }

    /// Set a monthly budget limit
    pub fn set_budget(&mut self, limit: Money) {
        self.budget_limit = Some(limit);
        self.touch();
    }

    /// Remove the budget limit
    pub fn clear_budget(&mut self) {
        self.budget_limit = None;
        self.touch();
    }

    /// Mark the category as modified
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Color rendered as `#RRGGBB`, dropping the alpha channel
    pub fn color_hex(&self) -> String {
        format!("#{:06X}", self.color & 0x00FF_FFFF)
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if let Some(limit) = self.budget_limit {
            if limit.is_negative() {
                return Err(CategoryValidationError::NegativeBudget);
            }
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Parse `#RRGGBB` (opaque) or `#AARRGGBB` into a packed ARGB integer
pub fn parse_color(s: &str) -> Result<u32, CategoryValidationError> {
    let hex = s.trim().trim_start_matches('#');
    let invalid = || CategoryValidationError::InvalidColor(s.to_string());

    let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
    match hex.len() {
        6 => Ok(0xFF00_0000 | value),
        8 => Ok(value),
        _ => Err(invalid()),
    }
}

/// Categories seeded into a fresh ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultCategory {
    Food,
    Transport,
    Housing,
    Health,
    Leisure,
    Education,
    Other,
    Salary,
    Investments,
    Yield,
}

impl DefaultCategory {
    /// All defaults in seeding order
    pub fn all() -> &'static [Self] {
        &[
            Self::Food,
            Self::Transport,
            Self::Housing,
            Self::Health,
            Self::Leisure,
            Self::Education,
            Self::Other,
            Self::Salary,
            Self::Investments,
            Self::Yield,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transport => "Transport",
            Self::Housing => "Housing",
            Self::Health => "Health",
            Self::Leisure => "Leisure",
            Self::Education => "Education",
            Self::Other => "Other",
            Self::Salary => "Salary",
            Self::Investments => "Investments",
            Self::Yield => "Yield",
        }
    }

    pub fn kind(&self) -> CategoryKind {
        match self {
            Self::Salary => CategoryKind::Salary,
            Self::Investments => CategoryKind::Investment,
            Self::Yield => CategoryKind::Yield,
            _ => CategoryKind::Expense,
        }
    }

    fn color(&self) -> u32 {
        match self {
            Self::Food => 0xFFFF_7043,
            Self::Transport => 0xFF42_A5F5,
            Self::Housing => 0xFF8D_6E63,
            Self::Health => 0xFFEF_5350,
            Self::Leisure => 0xFFAB_47BC,
            Self::Education => 0xFF26_A69A,
            Self::Other => DEFAULT_COLOR,
            Self::Salary => 0xFF66_BB6A,
            Self::Investments => 0xFF5C_6BC0,
            Self::Yield => 0xFFFF_CA28,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Self::Food => "restaurant",
            Self::Transport => "directions_car",
            Self::Housing => "home",
            Self::Health => "local_hospital",
            Self::Leisure => "sports_esports",
            Self::Education => "school",
            Self::Other => "category",
            Self::Salary => "payments",
            Self::Investments => "trending_up",
            Self::Yield => "savings",
        }
    }

    /// Build the seeded category
    pub fn to_category(&self) -> Category {
        let mut category = Category::with_kind(self.name(), self.kind());
        category.color = self.color();
        category.icon = Some(self.icon().to_string());
        category.is_default = true;
        category
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeBudget,
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Category name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::NegativeBudget => write!(f, "Budget limit cannot be negative"),
            Self::InvalidColor(s) => {
                write!(f, "Invalid color '{}': expected #RRGGBB or #AARRGGBB", s)
            }
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category() {
        let category = Category::new("Rent");
        assert_eq!(category.name, "Rent");
        assert_eq!(category.kind(), CategoryKind::Expense);
        assert!(!category.is_default);
        assert!(category.budget_limit.is_none());
    }

    #[test]
    fn test_kind_inferred_for_legacy_names() {
        let mut legacy = Category::new("Rendimentos");
        legacy.kind = None;
        assert_eq!(legacy.kind(), CategoryKind::Yield);
        assert!(legacy.is_yield());

        legacy.name = "Salário".to_string();
        assert_eq!(legacy.kind(), CategoryKind::Salary);

        legacy.name = "Investimentos".to_string();
        assert_eq!(legacy.kind(), CategoryKind::Investment);

        legacy.name = "Groceries".to_string();
        assert_eq!(legacy.kind(), CategoryKind::Expense);
    }

    #[test]
    fn test_explicit_kind_wins_over_name() {
        let category = Category::with_kind("Rendimentos", CategoryKind::Expense);
        assert_eq!(category.kind(), CategoryKind::Expense);
    }

    #[test]
    fn test_income_only_kinds() {
        assert!(!CategoryKind::Expense.is_income_only());
        assert!(CategoryKind::Salary.is_income_only());
        assert!(CategoryKind::Investment.is_income_only());
        assert!(CategoryKind::Yield.is_income_only());
    }

    #[test]
    fn test_budget() {
        let mut category = Category::new("Food");
        category.set_budget(Money::from_units(500));
        assert_eq!(category.budget_limit, Some(Money::from_units(500)));
        category.clear_budget();
        assert!(category.budget_limit.is_none());
    }

    #[test]
    fn test_validation() {
        let mut category = Category::new("Valid");
        assert!(category.validate().is_ok());

        category.name = "   ".to_string();
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(_))
        ));

        category.name = "Valid".to_string();
        category.budget_limit = Some(Money::from_cents(-1));
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NegativeBudget)
        );
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF7043"), Ok(0xFFFF_7043));
        assert_eq!(parse_color("80FF7043"), Ok(0x80FF_7043));
        assert!(parse_color("#FFF").is_err());
        assert!(parse_color("#GG0000").is_err());

        let mut category = Category::new("Food");
        category.color = 0xFFFF_7043;
        assert_eq!(category.color_hex(), "#FF7043");
    }

    #[test]
    fn test_defaults() {
        let defaults = DefaultCategory::all();
        assert_eq!(defaults.len(), 10);

        let yield_cat = DefaultCategory::Yield.to_category();
        assert!(yield_cat.is_default);
        assert!(yield_cat.is_yield());
        assert_eq!(DefaultCategory::Food.to_category().kind(), CategoryKind::Expense);
    }

    #[test]
    fn test_serialization() {
        let mut category = Category::new("Food");
        category.budget_limit = Some(Money::from_units(300));
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["budgetLimit"], 30000);
        assert_eq!(json["kind"], "expense");
        assert_eq!(json["isDefault"], false);

        let back: Category = serde_json::from_value(json).unwrap();
        assert_eq!(back, category);
    }

    #[test]
    fn test_deserialize_without_kind() {
        let json = serde_json::json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "name": "Rendimentos",
            "createdAt": "2025-01-01T00:00:00Z",
            "updatedAt": "2025-01-01T00:00:00Z"
        });
        let category: Category = serde_json::from_value(json).unwrap();
        assert!(category.kind.is_none());
        assert_eq!(category.kind(), CategoryKind::Yield);
        assert_eq!(category.color, DEFAULT_COLOR);
    }
}
