//! Milestone record entity. One row per (document, stage).

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "milestone_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    pub stage: String,
    pub status_description: String,
    pub target_start: Option<DateTimeUtc>,
    pub actual_start: Option<DateTimeUtc>,
    pub target_submit: Option<DateTimeUtc>,
    pub actual_submit: Option<DateTimeUtc>,
    pub approval_status: String,
    pub approval_comment: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id"
    )]
    Document,
    #[sea_orm(has_many = "super::document_file::Entity")]
    DocumentFiles,
    #[sea_orm(has_many = "super::file_activity_log::Entity")]
    FileActivityLogs,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl Related<super::document_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentFiles.def()
    }
}

impl Related<super::file_activity_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FileActivityLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
