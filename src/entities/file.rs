use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "file")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub timeline_id: Uuid,
    pub file_name: String,
    /// Public object-store URL; empty when the upload never succeeded.
    pub url: String,
    /// Size in bytes.
    pub size: i64,
    pub mime_type: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::timeline::Entity",
        from = "Column::TimelineId",
        to = "super::timeline::Column::Id",
        on_delete = "Cascade"
    )]
    Timeline,
}

impl Related<super::timeline::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Timeline.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
