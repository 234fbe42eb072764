use crate::db::entities::giveaway_entries;
use crate::db::entities::giveaways::{self, GiveawayStatus};
use crate::error::ModError;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryToggle {
    Joined,
    Left,
}

/// CRUD over giveaways and their entry sets. The sweep and the commands both
/// go through here; every status change is a single guarded statement.
pub struct GiveawayService {
    db: DatabaseConnection,
}

impl GiveawayService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates the giveaway provisionally, before its announcement message
    /// exists. `bind` attaches the message id once the announcement is out.
    #[allow(clippy::too_many_arguments)]
    pub async fn open(
        &self,
        guild_id: i64,
        channel_id: i64,
        host_id: i64,
        title: String,
        requirements: Option<String>,
        winners: i32,
        end_at: i64,
    ) -> Result<i32, ModError> {
        if winners < 1 {
            return Err(ModError::Validation(
                "a giveaway needs at least one winner".into(),
            ));
        }

        let model = giveaways::ActiveModel {
            guild_id: Set(guild_id),
            channel_id: Set(channel_id),
            message_id: Set(None),
            host_id: Set(host_id),
            title: Set(title),
            requirements: Set(requirements),
            winners: Set(winners),
            end_at: Set(end_at),
            status: Set(GiveawayStatus::Open),
            ..Default::default()
        };

        Ok(model.insert(&self.db).await?.id)
    }

    /// Second phase of creation: attach the announcement message handle.
    pub async fn bind(&self, giveaway_id: i32, message_id: i64) -> Result<(), ModError> {
        let res = giveaways::Entity::update_many()
            .col_expr(
                giveaways::Column::MessageId,
                sea_orm::sea_query::Expr::value(message_id),
            )
            .filter(giveaways::Column::Id.eq(giveaway_id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(ModError::NotFound("giveaway"));
        }
        Ok(())
    }

    /// Atomic join/leave flip: delete first, and when nothing was there to
    /// delete, insert with ON CONFLICT DO NOTHING. Concurrent toggles from
    /// one participant serialize on the unique (giveaway, user) pair.
    pub async fn toggle_entry(
        &self,
        giveaway_id: i32,
        user_id: i64,
    ) -> Result<(EntryToggle, u64), ModError> {
        let giveaway = self
            .get(giveaway_id)
            .await?
            .ok_or(ModError::NotFound("giveaway"))?;
        if giveaway.status != GiveawayStatus::Open {
            return Err(ModError::NotFound("open giveaway"));
        }

        let deleted = giveaway_entries::Entity::delete_many()
            .filter(giveaway_entries::Column::GiveawayId.eq(giveaway_id))
            .filter(giveaway_entries::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        let toggle = if deleted.rows_affected > 0 {
            EntryToggle::Left
        } else {
            let model = giveaway_entries::ActiveModel {
                giveaway_id: Set(giveaway_id),
                user_id: Set(user_id),
            };
            giveaway_entries::Entity::insert(model)
                .on_conflict(
                    OnConflict::columns([
                        giveaway_entries::Column::GiveawayId,
                        giveaway_entries::Column::UserId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
            EntryToggle::Joined
        };

        let count = self.entry_count(giveaway_id).await?;
        Ok((toggle, count))
    }

    pub async fn entries(&self, giveaway_id: i32) -> Result<Vec<i64>, ModError> {
        Ok(giveaway_entries::Entity::find()
            .filter(giveaway_entries::Column::GiveawayId.eq(giveaway_id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|e| e.user_id)
            .collect())
    }

    pub async fn entry_count(&self, giveaway_id: i32) -> Result<u64, ModError> {
        Ok(giveaway_entries::Entity::find()
            .filter(giveaway_entries::Column::GiveawayId.eq(giveaway_id))
            .count(&self.db)
            .await?)
    }

    /// One-way open -> closed. The affected row count is the idempotence
    /// guard: only the caller that actually flipped the status may draw
    /// winners, a second close is a no-op.
    pub async fn close(&self, giveaway_id: i32) -> Result<bool, ModError> {
        let res = giveaways::Entity::update_many()
            .col_expr(
                giveaways::Column::Status,
                sea_orm::sea_query::Expr::value(GiveawayStatus::Closed),
            )
            .filter(giveaways::Column::Id.eq(giveaway_id))
            .filter(giveaways::Column::Status.eq(GiveawayStatus::Open))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected > 0)
    }

    /// Deletes an open giveaway; entries go with it via cascade. Returns
    /// `false` when the giveaway was already closed or gone.
    pub async fn cancel(&self, giveaway_id: i32) -> Result<bool, ModError> {
        let res = giveaways::Entity::delete_many()
            .filter(giveaways::Column::Id.eq(giveaway_id))
            .filter(giveaways::Column::Status.eq(GiveawayStatus::Open))
            .exec(&self.db)
            .await?;

        Ok(res.rows_affected > 0)
    }

    pub async fn get(&self, giveaway_id: i32) -> Result<Option<giveaways::Model>, ModError> {
        Ok(giveaways::Entity::find_by_id(giveaway_id)
            .one(&self.db)
            .await?)
    }

    pub async fn find_by_message(
        &self,
        message_id: i64,
    ) -> Result<Option<giveaways::Model>, ModError> {
        Ok(giveaways::Entity::find()
            .filter(giveaways::Column::MessageId.eq(message_id))
            .one(&self.db)
            .await?)
    }

    /// Open giveaways whose end time has passed, oldest first; the sweep
    /// input.
    pub async fn due_giveaways(&self, now: i64) -> Result<Vec<giveaways::Model>, ModError> {
        Ok(giveaways::Entity::find()
            .filter(giveaways::Column::Status.eq(GiveawayStatus::Open))
            .filter(giveaways::Column::EndAt.lte(now))
            .order_by_asc(giveaways::Column::EndAt)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn service() -> GiveawayService {
        GiveawayService::new(crate::db::test_connection().await)
    }

    async fn open_one(svc: &GiveawayService, end_at: i64) -> i32 {
        svc.open(1, 10, 99, "Nitro".into(), None, 2, end_at)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_rejects_winnerless_giveaways() {
        let svc = service().await;
        let err = svc
            .open(1, 10, 99, "Nitro".into(), None, 0, 1000)
            .await
            .unwrap_err();
        assert!(matches!(err, ModError::Validation(_)));
    }

    #[tokio::test]
    async fn two_phase_creation_binds_the_message() {
        let svc = service().await;
        let id = open_one(&svc, 1000).await;

        // Provisional row has no message handle yet
        assert_eq!(svc.get(id).await.unwrap().unwrap().message_id, None);

        svc.bind(id, 555).await.unwrap();
        assert_eq!(svc.get(id).await.unwrap().unwrap().message_id, Some(555));
        assert!(svc.find_by_message(555).await.unwrap().is_some());

        assert!(matches!(
            svc.bind(424242, 556).await.unwrap_err(),
            ModError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn toggle_entry_is_its_own_inverse() {
        let svc = service().await;
        let id = open_one(&svc, 1000).await;

        let (first, count) = svc.toggle_entry(id, 7).await.unwrap();
        assert_eq!(first, EntryToggle::Joined);
        assert_eq!(count, 1);

        let (second, count) = svc.toggle_entry(id, 7).await.unwrap();
        assert_eq!(second, EntryToggle::Left);
        assert_eq!(count, 0);
        assert!(svc.entries(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn entries_are_a_set() {
        let svc = service().await;
        let id = open_one(&svc, 1000).await;

        svc.toggle_entry(id, 7).await.unwrap();
        svc.toggle_entry(id, 8).await.unwrap();

        let mut entries = svc.entries(id).await.unwrap();
        entries.sort_unstable();
        assert_eq!(entries, vec![7, 8]);
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let svc = service().await;
        let id = open_one(&svc, 1000).await;

        assert!(svc.close(id).await.unwrap());
        assert!(!svc.close(id).await.unwrap());
        assert_eq!(
            svc.get(id).await.unwrap().unwrap().status,
            GiveawayStatus::Closed
        );
    }

    #[tokio::test]
    async fn toggling_on_a_closed_giveaway_is_refused() {
        let svc = service().await;
        let id = open_one(&svc, 1000).await;
        svc.close(id).await.unwrap();

        assert!(matches!(
            svc.toggle_entry(id, 7).await.unwrap_err(),
            ModError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn cancel_only_while_open_and_cascades_entries() {
        let svc = service().await;
        let id = open_one(&svc, 1000).await;
        svc.toggle_entry(id, 7).await.unwrap();

        assert!(svc.cancel(id).await.unwrap());
        assert!(svc.get(id).await.unwrap().is_none());
        assert!(svc.entries(id).await.unwrap().is_empty());

        let closed = open_one(&svc, 1000).await;
        svc.close(closed).await.unwrap();
        assert!(!svc.cancel(closed).await.unwrap());
    }

    #[tokio::test]
    async fn due_giveaways_selects_only_elapsed_open_ones() {
        let svc = service().await;
        let now = 5000;

        let due = open_one(&svc, now - 10).await;
        let pending = open_one(&svc, now + 10).await;
        let closed = open_one(&svc, now - 20).await;
        svc.close(closed).await.unwrap();

        let ids: Vec<i32> = svc
            .due_giveaways(now)
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![due]);
        let _ = pending;
    }
}
