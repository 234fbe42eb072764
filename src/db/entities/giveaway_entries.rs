use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A unique (giveaway, user) pair, not a log. Joining inserts, leaving
/// deletes; deleting the giveaway cascades here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Eq)]
#[sea_orm(table_name = "giveaway_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub giveaway_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::giveaways::Entity",
        from = "Column::GiveawayId",
        to = "super::giveaways::Column::Id"
    )]
    Giveaway,
}

impl Related<super::giveaways::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Giveaway.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
