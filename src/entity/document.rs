//! Document entity. Owns the three milestone records of one tracked document.
//!
//! Header fields (file_name, pic, document_number, field, discipline) live
//! here once, so an edit is visible from every milestone row without fan-out.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub project_id: Uuid,
    pub field: String,
    pub file_name: String,
    pub document_number: Option<String>,
    pub pic: Option<String>,
    pub discipline: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::project::Entity",
        from = "Column::ProjectId",
        to = "super::project::Column::Id"
    )]
    Project,
    #[sea_orm(has_many = "super::milestone_record::Entity")]
    MilestoneRecords,
}

impl Related<super::project::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::milestone_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MilestoneRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
