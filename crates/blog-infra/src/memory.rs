//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Note: Data is lost on process restart.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use blog_core::domain::{
    Author, Category, CategoryDraft, CategorySummary, CategoryWithParent, NewUser, Post,
    PostDraft, PostWithRelations, User,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CategoryRepository, PostRepository, UserRepository};

/// Rows keyed by their auto-incremented id.
struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        self.last_id += 1;
        let id = self.last_id;
        self.rows.entry(id).or_insert(build(id))
    }
}

#[derive(Default)]
struct Tables {
    categories: Table<Category>,
    posts: Table<Post>,
    users: Table<User>,
}

impl Tables {
    fn live_category(&self, id: i64) -> Option<&Category> {
        self.categories
            .rows
            .get(&id)
            .filter(|category| category.deleted_at.is_none())
    }

    fn live_post(&self, id: i64) -> Option<&Post> {
        self.posts.rows.get(&id).filter(|post| post.deleted_at.is_none())
    }

    fn category_with_parent(&self, category: &Category) -> CategoryWithParent {
        CategoryWithParent {
            parent_category: category
                .parent_id
                .and_then(|id| self.live_category(id))
                .map(CategorySummary::from),
            category: category.clone(),
        }
    }

    fn post_with_relations(&self, post: &Post) -> PostWithRelations {
        PostWithRelations {
            user: self.users.rows.get(&post.user_id).map(Author::from),
            category: self.live_category(post.category_id).map(CategorySummary::from),
            post: post.clone(),
        }
    }
}

/// Shared in-memory tables behind the three repositories.
///
/// Every repository handed out by one store sees the same data.
#[derive(Clone, Default)]
pub struct InMemoryBlogStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        InMemoryCategoryRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }
}

/// In-memory category repository.
pub struct InMemoryCategoryRepository {
    tables: Arc<RwLock<Tables>>,
}

/// In-memory post repository.
pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

/// In-memory user repository.
pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<CategoryWithParent, i64> for InMemoryCategoryRepository {
    async fn list(&self) -> Result<Vec<CategoryWithParent>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .rows
            .values()
            .filter(|category| category.deleted_at.is_none())
            .map(|category| tables.category_with_parent(category))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryWithParent>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .live_category(id)
            .map(|category| tables.category_with_parent(category)))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let category = tables
            .categories
            .rows
            .get_mut(&id)
            .filter(|category| category.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;

        category.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn exists(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.tables.read().await.live_category(id).is_some())
    }

    async fn create(&self, draft: CategoryDraft) -> Result<CategoryWithParent, RepoError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let category = tables
            .categories
            .insert_with(|id| Category {
                id,
                parent_id: draft.parent_id,
                title: draft.title,
                slug: draft.slug,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            })
            .clone();

        Ok(tables.category_with_parent(&category))
    }

    async fn update(&self, id: i64, draft: CategoryDraft) -> Result<CategoryWithParent, RepoError> {
        let mut tables = self.tables.write().await;
        let category = tables
            .categories
            .rows
            .get_mut(&id)
            .filter(|category| category.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;

        category.parent_id = draft.parent_id;
        category.title = draft.title;
        category.slug = draft.slug;
        category.updated_at = Utc::now();
        let category = category.clone();

        Ok(tables.category_with_parent(&category))
    }
}

#[async_trait]
impl BaseRepository<PostWithRelations, i64> for InMemoryPostRepository {
    async fn list(&self) -> Result<Vec<PostWithRelations>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .rows
            .values()
            .rev()
            .filter(|post| post.deleted_at.is_none())
            .map(|post| tables.post_with_relations(post))
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostWithRelations>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .live_post(id)
            .map(|post| tables.post_with_relations(post)))
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .rows
            .get_mut(&id)
            .filter(|post| post.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;

        post.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, draft: PostDraft, author_id: i64) -> Result<PostWithRelations, RepoError> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let post = tables
            .posts
            .insert_with(|id| Post {
                id,
                category_id: draft.category_id,
                user_id: author_id,
                title: draft.title,
                slug: draft.slug,
                excerpt: draft.excerpt,
                content_raw: draft.content_raw,
                content_html: draft.content_html,
                is_published: draft.is_published.unwrap_or(false),
                published_at: draft.published_at.flatten(),
                created_at: now,
                updated_at: now,
                deleted_at: None,
            })
            .clone();

        Ok(tables.post_with_relations(&post))
    }

    async fn update(&self, id: i64, draft: PostDraft) -> Result<PostWithRelations, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables
            .posts
            .rows
            .get_mut(&id)
            .filter(|post| post.deleted_at.is_none())
            .ok_or(RepoError::NotFound)?;

        post.category_id = draft.category_id;
        post.title = draft.title;
        post.slug = draft.slug;
        post.excerpt = draft.excerpt;
        post.content_raw = draft.content_raw;
        post.content_html = draft.content_html;
        if let Some(is_published) = draft.is_published {
            post.is_published = is_published;
        }
        if let Some(published_at) = draft.published_at {
            post.published_at = published_at;
        }
        post.updated_at = Utc::now();
        let post = post.clone();

        Ok(tables.post_with_relations(&post))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .rows
            .values()
            .any(|user| user.email == new_user.email)
        {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        let now = Utc::now();
        Ok(tables
            .users
            .insert_with(|id| User {
                id,
                name: new_user.name,
                email: new_user.email,
                password_hash: new_user.password_hash,
                created_at: now,
                updated_at: now,
            })
            .clone())
    }
}
