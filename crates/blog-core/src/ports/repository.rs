use async_trait::async_trait;

use crate::domain::{CategoryDraft, CategoryWithParent, NewUser, PostDraft, PostWithRelations, User};
use crate::error::RepoError;

/// Read and soft-delete operations shared by the blog resources.
///
/// Records whose `deleted_at` is set are invisible to every method.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// All live records, in the resource's listing order.
    async fn list(&self) -> Result<Vec<T>, RepoError>;

    /// Find a live record by its ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Mark a record deleted, keeping it in storage.
    ///
    /// Fails with [`RepoError::NotFound`] when no live record matches.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Category repository. Listing is ordered by ascending id.
#[async_trait]
pub trait CategoryRepository: BaseRepository<CategoryWithParent, i64> {
    /// Whether a live category with this ID exists.
    async fn exists(&self, id: i64) -> Result<bool, RepoError>;

    async fn create(&self, draft: CategoryDraft) -> Result<CategoryWithParent, RepoError>;

    async fn update(&self, id: i64, draft: CategoryDraft)
    -> Result<CategoryWithParent, RepoError>;
}

/// Post repository. Listing is ordered newest id first.
#[async_trait]
pub trait PostRepository: BaseRepository<PostWithRelations, i64> {
    async fn create(&self, draft: PostDraft, author_id: i64)
    -> Result<PostWithRelations, RepoError>;

    /// Overwrite the post's fields; the author is left unchanged.
    async fn update(&self, id: i64, draft: PostDraft) -> Result<PostWithRelations, RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}
