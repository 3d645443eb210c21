//! Append-only upload/download audit trail entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "file_activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub milestone_record_id: Uuid,
    pub document_file_id: Option<Uuid>,
    pub action: String,
    pub actor: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::milestone_record::Entity",
        from = "Column::MilestoneRecordId",
        to = "super::milestone_record::Column::Id"
    )]
    MilestoneRecord,
    #[sea_orm(
        belongs_to = "super::document_file::Entity",
        from = "Column::DocumentFileId",
        to = "super::document_file::Column::Id"
    )]
    DocumentFile,
}

impl Related<super::milestone_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MilestoneRecord.def()
    }
}

impl Related<super::document_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentFile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
