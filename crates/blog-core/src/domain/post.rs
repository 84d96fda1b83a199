use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, CategorySummary};
use crate::content::{self, Content};

/// Post entity - a blog article filed under one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub category_id: i64,
    pub user_id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content_raw: String,
    pub content_html: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A post together with its author and category summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostWithRelations {
    #[serde(flatten)]
    pub post: Post,
    pub user: Option<Author>,
    pub category: Option<CategorySummary>,
}

/// Validated post fields as submitted, before any derivation.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content_raw: Option<String>,
    pub content_html: Option<String>,
    pub category_id: i64,
    pub is_published: Option<bool>,
    /// `None` leaves the stored value alone, `Some(None)` clears it.
    pub published_at: Option<Option<DateTime<Utc>>>,
}

/// Normalized post fields, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content_raw: String,
    pub content_html: String,
    pub category_id: i64,
    pub is_published: Option<bool>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

impl PostInput {
    /// Fill every derived field.
    ///
    /// Both content renditions are populated first, then the slug falls back
    /// to the slugified title and the excerpt to the head of the raw content.
    pub fn normalize(self) -> PostDraft {
        let Content { raw, html } = Content::derive(self.content_raw, self.content_html);
        let slug = self
            .slug
            .unwrap_or_else(|| content::slugify(&self.title));
        let excerpt = self.excerpt.unwrap_or_else(|| content::excerpt(&raw));

        PostDraft {
            title: self.title,
            slug,
            excerpt,
            content_raw: raw,
            content_html: html,
            category_id: self.category_id,
            is_published: self.is_published,
            published_at: self.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> PostInput {
        PostInput {
            title: title.to_string(),
            category_id: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_derives_slug_and_excerpt() {
        let draft = PostInput {
            content_raw: Some("<p>hello</p>".to_string()),
            ..input("Hello World")
        }
        .normalize();

        assert_eq!(draft.slug, "hello-world");
        assert_eq!(draft.excerpt, "hello");
        assert_eq!(draft.content_raw, "<p>hello</p>");
        assert_eq!(draft.content_html, "<p>hello</p>");
    }

    #[test]
    fn test_normalize_html_only() {
        let draft = PostInput {
            content_html: Some("<p>Only <em>markup</em> here</p>".to_string()),
            ..input("Markup")
        }
        .normalize();

        assert_eq!(draft.content_raw, "Only markup here");
        assert_eq!(draft.content_html, "<p>Only <em>markup</em> here</p>");
        assert_eq!(draft.excerpt, "Only markup here");
    }

    #[test]
    fn test_normalize_keeps_explicit_values() {
        let draft = PostInput {
            slug: Some("custom-slug".to_string()),
            excerpt: Some("Hand written".to_string()),
            content_raw: Some("Body text".to_string()),
            is_published: Some(true),
            ..input("Whatever")
        }
        .normalize();

        assert_eq!(draft.slug, "custom-slug");
        assert_eq!(draft.excerpt, "Hand written");
        assert_eq!(draft.is_published, Some(true));
    }

    #[test]
    fn test_normalize_truncates_long_excerpt() {
        let body = "word ".repeat(100);
        let draft = PostInput {
            content_raw: Some(body.clone()),
            ..input("Long")
        }
        .normalize();

        assert_eq!(draft.excerpt, body.chars().take(200).collect::<String>());
    }
}
