//! Attachment entity for files uploaded against a milestone record.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "document_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub milestone_record_id: Uuid,
    pub file_name: String,
    pub file_path: String,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub uploaded_by: String,
    pub uploaded_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::milestone_record::Entity",
        from = "Column::MilestoneRecordId",
        to = "super::milestone_record::Column::Id"
    )]
    MilestoneRecord,
    #[sea_orm(has_many = "super::file_activity_log::Entity")]
    FileActivityLogs,
}

impl Related<super::milestone_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MilestoneRecord.def()
    }
}

impl Related<super::file_activity_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FileActivityLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
