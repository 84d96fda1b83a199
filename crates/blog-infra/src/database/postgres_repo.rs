//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, NotSet, QueryFilter, QueryOrder,
    Set,
};

use blog_core::domain::{
    Author, CategoryDraft, CategorySummary, CategoryWithParent, NewUser, PostDraft,
    PostWithRelations, User,
};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CategoryRepository, PostRepository, UserRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, query_error, write_error};

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// Summaries of the live categories among `ids`, keyed by id.
async fn category_summaries(
    db: &sea_orm::DbConn,
    ids: Vec<i64>,
) -> Result<HashMap<i64, CategorySummary>, RepoError> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = PostgresCategoryRepository::live()
        .filter(category::Column::Id.is_in(ids))
        .all(db)
        .await
        .map_err(query_error)?;

    Ok(rows.iter().map(|row| (row.id, row.into())).collect())
}

impl PostgresCategoryRepository {
    /// Attach each category's parent summary, loading all parents in one query.
    async fn with_parents(
        &self,
        rows: Vec<category::Model>,
    ) -> Result<Vec<CategoryWithParent>, RepoError> {
        let parent_ids = rows.iter().filter_map(|row| row.parent_id).collect();
        let parents = category_summaries(&self.db, parent_ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| CategoryWithParent {
                parent_category: row.parent_id.and_then(|id| parents.get(&id).cloned()),
                category: row.into(),
            })
            .collect())
    }

    async fn with_parent(&self, row: category::Model) -> Result<CategoryWithParent, RepoError> {
        self.with_parents(vec![row])
            .await?
            .pop()
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl BaseRepository<CategoryWithParent, i64> for PostgresCategoryRepository {
    async fn list(&self) -> Result<Vec<CategoryWithParent>, RepoError> {
        let rows = Self::live()
            .order_by_asc(category::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_parents(rows).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<CategoryWithParent>, RepoError> {
        tracing::debug!(category_id = id, "Finding category");

        match self.find_live(id).await? {
            Some(row) => Ok(Some(self.with_parent(row).await?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.soft_delete(id).await
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn exists(&self, id: i64) -> Result<bool, RepoError> {
        self.is_live(id).await
    }

    async fn create(&self, draft: CategoryDraft) -> Result<CategoryWithParent, RepoError> {
        let now = Utc::now().fixed_offset();
        let row = category::ActiveModel {
            id: NotSet,
            parent_id: Set(draft.parent_id),
            title: Set(draft.title),
            slug: Set(draft.slug),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        self.with_parent(row).await
    }

    async fn update(&self, id: i64, draft: CategoryDraft) -> Result<CategoryWithParent, RepoError> {
        let mut active = self
            .find_live(id)
            .await?
            .ok_or(RepoError::NotFound)?
            .into_active_model();

        active.parent_id = Set(draft.parent_id);
        active.title = Set(draft.title);
        active.slug = Set(draft.slug);
        active.updated_at = Set(Utc::now().fixed_offset());

        let row = active.update(&self.db).await.map_err(write_error)?;

        self.with_parent(row).await
    }
}

impl PostgresPostRepository {
    /// Attach author and category summaries, one query per relation.
    async fn with_relations(
        &self,
        rows: Vec<post::Model>,
    ) -> Result<Vec<PostWithRelations>, RepoError> {
        let category_ids = rows.iter().map(|row| row.category_id).collect();
        let categories = category_summaries(&self.db, category_ids).await?;

        let user_ids: Vec<i64> = rows.iter().map(|row| row.user_id).collect();
        let authors: HashMap<i64, Author> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            UserEntity::find()
                .filter(user::Column::Id.is_in(user_ids))
                .all(&self.db)
                .await
                .map_err(query_error)?
                .iter()
                .map(|row| (row.id, row.into()))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|row| PostWithRelations {
                user: authors.get(&row.user_id).cloned(),
                category: categories.get(&row.category_id).cloned(),
                post: row.into(),
            })
            .collect())
    }

    async fn with_relation(&self, row: post::Model) -> Result<PostWithRelations, RepoError> {
        self.with_relations(vec![row])
            .await?
            .pop()
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl BaseRepository<PostWithRelations, i64> for PostgresPostRepository {
    async fn list(&self) -> Result<Vec<PostWithRelations>, RepoError> {
        let rows = Self::live()
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        self.with_relations(rows).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostWithRelations>, RepoError> {
        tracing::debug!(post_id = id, "Finding post");

        match self.find_live(id).await? {
            Some(row) => Ok(Some(self.with_relation(row).await?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.soft_delete(id).await
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, draft: PostDraft, author_id: i64) -> Result<PostWithRelations, RepoError> {
        let now = Utc::now().fixed_offset();
        let row = post::ActiveModel {
            id: NotSet,
            category_id: Set(draft.category_id),
            user_id: Set(author_id),
            title: Set(draft.title),
            slug: Set(draft.slug),
            excerpt: Set(draft.excerpt),
            content_raw: Set(draft.content_raw),
            content_html: Set(draft.content_html),
            is_published: Set(draft.is_published.unwrap_or(false)),
            published_at: Set(draft.published_at.flatten().map(|at| at.fixed_offset())),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        self.with_relation(row).await
    }

    async fn update(&self, id: i64, draft: PostDraft) -> Result<PostWithRelations, RepoError> {
        let mut active = self
            .find_live(id)
            .await?
            .ok_or(RepoError::NotFound)?
            .into_active_model();

        active.category_id = Set(draft.category_id);
        active.title = Set(draft.title);
        active.slug = Set(draft.slug);
        active.excerpt = Set(draft.excerpt);
        active.content_raw = Set(draft.content_raw);
        active.content_html = Set(draft.content_html);
        if let Some(is_published) = draft.is_published {
            active.is_published = Set(is_published);
        }
        if let Some(published_at) = draft.published_at {
            active.published_at = Set(published_at.map(|at| at.fixed_offset()));
        }
        active.updated_at = Set(Utc::now().fixed_offset());

        let row = active.update(&self.db).await.map_err(write_error)?;

        self.with_relation(row).await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = match email.split_once('@') {
            Some((local, domain)) => match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
                _ => format!("***@{domain}"),
            },
            None => "***".to_string(),
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(query_error)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now().fixed_offset();
        let row = user::ActiveModel {
            id: NotSet,
            name: Set(new_user.name),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(write_error)?;

        Ok(row.into())
    }
}
