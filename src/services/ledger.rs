use crate::db::entities::punishments::{self, PunishmentKind};
use crate::db::entities::warns;
use crate::error::ModError;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, Set,
};

/// Warns expire 60 days after issuance unless marked permanent.
const WARN_TTL_SECS: i64 = 60 * 24 * 3600;

/// CRUD over warns and active punishments. No timers live here; the
/// scheduler derives them from the rows this service writes.
pub struct LedgerService {
    db: DatabaseConnection,
}

impl LedgerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Appends an immutable warn row. `expires_at = now + 60 days` unless
    /// the warn is permanent.
    pub async fn record_warn(
        &self,
        guild_id: i64,
        user_id: i64,
        mod_id: i64,
        reason: Option<String>,
        permanent: bool,
    ) -> Result<warns::Model, ModError> {
        let now = chrono::Utc::now().timestamp();
        let expires_at = if permanent { None } else { Some(now + WARN_TTL_SECS) };

        let model = warns::ActiveModel {
            guild_id: Set(guild_id),
            user_id: Set(user_id),
            mod_id: Set(mod_id),
            reason: Set(reason),
            created_at: Set(now),
            expires_at: Set(expires_at),
            permanent: Set(permanent),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?)
    }

    /// Counts warns still in effect at `at`: permanent ones, and timed ones
    /// whose expiry lies strictly in the future.
    pub async fn count_active_warns(
        &self,
        guild_id: i64,
        user_id: i64,
        at: i64,
    ) -> Result<u64, ModError> {
        let count = warns::Entity::find()
            .filter(warns::Column::GuildId.eq(guild_id))
            .filter(warns::Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(warns::Column::Permanent.eq(true))
                    .add(warns::Column::ExpiresAt.is_null())
                    .add(warns::Column::ExpiresAt.gt(at)),
            )
            .count(&self.db)
            .await?;

        Ok(count)
    }

    pub async fn warns_for(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Vec<warns::Model>, ModError> {
        Ok(warns::Entity::find()
            .filter(warns::Column::GuildId.eq(guild_id))
            .filter(warns::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?)
    }

    /// Inserts or replaces the active punishment for (guild, user, kind) in a
    /// single statement. A reissued mute/tempban must land on the same row so
    /// the old expiry cannot survive it.
    pub async fn upsert_active_punishment(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
        expires_at: i64,
    ) -> Result<(), ModError> {
        let model = punishments::ActiveModel {
            guild_id: Set(guild_id),
            user_id: Set(user_id),
            kind: Set(kind),
            expires_at: Set(expires_at),
            ..Default::default()
        };

        punishments::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    punishments::Column::GuildId,
                    punishments::Column::UserId,
                    punishments::Column::Kind,
                ])
                .update_column(punishments::Column::ExpiresAt)
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    /// Removes the active punishment row. Returns `false` when nothing was
    /// there to remove (already settled elsewhere).
    pub async fn clear_active_punishment(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
    ) -> Result<bool, ModError> {
        let res = punishments::Entity::delete_many()
            .filter(punishments::Column::GuildId.eq(guild_id))
            .filter(punishments::Column::UserId.eq(user_id))
            .filter(punishments::Column::Kind.eq(kind))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected > 0)
    }

    /// Like `clear_active_punishment`, but only removes a row whose expiry
    /// has elapsed. A settlement racing a re-issue must not delete the
    /// replacement row carrying the newer expiry.
    pub async fn clear_if_due(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
        now: i64,
    ) -> Result<bool, ModError> {
        let res = punishments::Entity::delete_many()
            .filter(punishments::Column::GuildId.eq(guild_id))
            .filter(punishments::Column::UserId.eq(user_id))
            .filter(punishments::Column::Kind.eq(kind))
            .filter(punishments::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected > 0)
    }

    pub async fn active_punishment(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
    ) -> Result<Option<punishments::Model>, ModError> {
        Ok(punishments::Entity::find()
            .filter(punishments::Column::GuildId.eq(guild_id))
            .filter(punishments::Column::UserId.eq(user_id))
            .filter(punishments::Column::Kind.eq(kind))
            .one(&self.db)
            .await?)
    }

    /// Every active punishment row; the recovery scan on boot.
    pub async fn active_punishments(&self) -> Result<Vec<punishments::Model>, ModError> {
        Ok(punishments::Entity::find().all(&self.db).await?)
    }

    /// Rows whose expiry has elapsed; the reconciliation sweep input.
    pub async fn overdue_punishments(&self, now: i64) -> Result<Vec<punishments::Model>, ModError> {
        Ok(punishments::Entity::find()
            .filter(punishments::Column::ExpiresAt.lte(now))
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn ledger() -> LedgerService {
        LedgerService::new(crate::db::test_connection().await)
    }

    #[tokio::test]
    async fn warn_counting_follows_expiry() {
        let ledger = ledger().await;
        let now = chrono::Utc::now().timestamp();

        ledger
            .record_warn(1, 2, 3, Some("spam".into()), false)
            .await
            .unwrap();
        ledger.record_warn(1, 2, 3, None, true).await.unwrap();

        // Both active now
        assert_eq!(ledger.count_active_warns(1, 2, now).await.unwrap(), 2);

        // 61 days later only the permanent warn survives; none resurrect
        let later = now + 61 * 24 * 3600;
        assert_eq!(ledger.count_active_warns(1, 2, later).await.unwrap(), 1);
        let much_later = later + 365 * 24 * 3600;
        assert_eq!(
            ledger.count_active_warns(1, 2, much_later).await.unwrap(),
            1
        );

        // Other subjects and guilds are unaffected
        assert_eq!(ledger.count_active_warns(1, 9, now).await.unwrap(), 0);
        assert_eq!(ledger.count_active_warns(9, 2, now).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn permanent_warn_has_no_expiry() {
        let ledger = ledger().await;
        let warn = ledger.record_warn(1, 2, 3, None, true).await.unwrap();
        assert!(warn.permanent);
        assert_eq!(warn.expires_at, None);
    }

    #[tokio::test]
    async fn upsert_replaces_existing_row() {
        let ledger = ledger().await;
        let now = chrono::Utc::now().timestamp();

        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now + 100)
            .await
            .unwrap();
        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now + 500)
            .await
            .unwrap();

        let rows = ledger.active_punishments().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expires_at, now + 500);

        // A different kind for the same subject is its own row
        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Tempban, now + 900)
            .await
            .unwrap();
        assert_eq!(ledger.active_punishments().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn clear_reports_whether_a_row_existed() {
        let ledger = ledger().await;
        let now = chrono::Utc::now().timestamp();

        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now + 100)
            .await
            .unwrap();

        assert!(ledger
            .clear_active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap());
        assert!(!ledger
            .clear_active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn clear_if_due_spares_replacement_rows() {
        let ledger = ledger().await;
        let now = chrono::Utc::now().timestamp();

        // Row re-issued with a future expiry must survive a stale settlement
        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now + 600)
            .await
            .unwrap();
        assert!(!ledger
            .clear_if_due(1, 2, PunishmentKind::Mute, now)
            .await
            .unwrap());

        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now - 5)
            .await
            .unwrap();
        assert!(ledger
            .clear_if_due(1, 2, PunishmentKind::Mute, now)
            .await
            .unwrap());
    }
}
