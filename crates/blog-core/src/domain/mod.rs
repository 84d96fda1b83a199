//! Domain entities - the core business objects.

mod category;
mod post;
mod user;

pub use category::{Category, CategoryDraft, CategorySummary, CategoryWithParent};
pub use post::{Post, PostDraft, PostInput, PostWithRelations};
pub use user::{Author, NewUser, User};
