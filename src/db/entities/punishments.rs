use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Reversible timed sanctions. At most one row per (guild, user, kind);
/// re-issuing replaces the row so a stale timer can never outlive its expiry.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Eq)]
#[sea_orm(table_name = "punishments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub guild_id: i64,
    pub user_id: i64,
    pub kind: PunishmentKind,
    /// Unix epoch seconds.
    pub expires_at: i64,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PunishmentKind {
    #[sea_orm(string_value = "mute")]
    Mute,
    #[sea_orm(string_value = "tempban")]
    Tempban,
}

impl std::fmt::Display for PunishmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PunishmentKind::Mute => write!(f, "mute"),
            PunishmentKind::Tempban => write!(f, "tempban"),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
