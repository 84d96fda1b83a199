use std::marker::PhantomData;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DbConn, DbErr, EntityName, EntityTrait, QueryFilter, Select};

use blog_core::error::RepoError;

/// Entities whose rows are hidden, not removed, on delete.
pub trait SoftDeletable: EntityTrait {
    fn id_column() -> Self::Column;

    /// Nullable timestamp column; `NULL` means the row is live.
    fn deleted_at_column() -> Self::Column;
}

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

impl<E> PostgresBaseRepository<E>
where
    E: SoftDeletable,
    E::Model: Send + Sync,
{
    /// Query over live rows only.
    pub(crate) fn live() -> Select<E> {
        E::find().filter(E::deleted_at_column().is_null())
    }

    pub(crate) async fn find_live(&self, id: i64) -> Result<Option<E::Model>, RepoError> {
        Self::live()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await
            .map_err(query_error)
    }

    pub(crate) async fn is_live(&self, id: i64) -> Result<bool, RepoError> {
        Ok(self.find_live(id).await?.is_some())
    }

    /// Stamp `deleted_at` on a live row.
    pub(crate) async fn soft_delete(&self, id: i64) -> Result<(), RepoError> {
        let result = E::update_many()
            .col_expr(E::deleted_at_column(), Expr::value(Utc::now().fixed_offset()))
            .filter(E::id_column().eq(id))
            .filter(E::deleted_at_column().is_null())
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        let entity = E::default();
        tracing::debug!(table = entity.table_name(), id, "Soft-deleted row");
        Ok(())
    }
}

/// Map read failures; an unreachable pool is reported apart from bad queries.
pub(crate) fn query_error(err: DbErr) -> RepoError {
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        _ => RepoError::Query(err.to_string()),
    }
}

/// Map write failures, singling out unique-key violations.
pub(crate) fn write_error(err: DbErr) -> RepoError {
    let err_str = err.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        query_error(err)
    }
}
