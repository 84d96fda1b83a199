//! Category entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::database::SoftDeletable;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Parent,
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDeletable for Entity {
    fn id_column() -> Column {
        Column::Id
    }

    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}

/// Conversion from SeaORM Model to Domain Category.
impl From<Model> for blog_core::domain::Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            parent_id: model.parent_id,
            title: model.title,
            slug: model.slug,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
        }
    }
}

impl From<&Model> for blog_core::domain::CategorySummary {
    fn from(model: &Model) -> Self {
        Self {
            id: model.id,
            title: model.title.clone(),
        }
    }
}
