use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::slugify;

/// Category entity - groups posts, optionally nested under a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// The `id` and `title` of a category, attached to related records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub title: String,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            title: category.title.clone(),
        }
    }
}

/// A category together with its parent's summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithParent {
    #[serde(flatten)]
    pub category: Category,
    pub parent_category: Option<CategorySummary>,
}

/// Normalized category fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub title: String,
    pub slug: String,
    pub parent_id: Option<i64>,
}

impl CategoryDraft {
    /// Build a draft, deriving the slug from the title when none is given.
    pub fn new(title: String, slug: Option<String>, parent_id: Option<i64>) -> Self {
        let slug = slug.unwrap_or_else(|| slugify(&title));
        Self {
            title,
            slug,
            parent_id,
        }
    }
}
