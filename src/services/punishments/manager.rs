use crate::db::entities::punishments::PunishmentKind;
use crate::error::ModError;
use crate::services::gateway::ModGateway;
use crate::services::ledger::LedgerService;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::task::AbortHandle;
use tokio::time::{sleep, Duration};
use tracing::{error, info, warn};

/// (guild, user, kind) — the identity of an active timed punishment.
pub type PunishmentKey = (i64, i64, PunishmentKind);

/// Per-punishment timer state. `Armed` owns the sleeping task; `Settling`
/// marks a settlement in flight so concurrent triggers (timer fire racing a
/// manual reversal or the sweep) resolve to exactly one reversal.
enum TimerState {
    Armed { deadline: i64, abort: AbortHandle },
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleMode {
    /// Expiry-driven (timer, sweep, boot recovery): only removes a row whose
    /// deadline has elapsed, so a re-issued punishment survives.
    Expired,
    /// Moderator-driven: removes the row regardless of its deadline.
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// This actor performed the reversal and cleared the row.
    Settled,
    /// The reversal ran but no row remained; someone else settled first.
    AlreadyResolved,
    /// Another actor holds the claim right now; nothing to do.
    InFlight,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RestoreSummary {
    pub settled: usize,
    pub armed: usize,
}

/// Guarantees every active timed punishment is reversed exactly once,
/// across restarts. The store is the single source of truth: no timer is
/// armed without a row, and settlement is derived from the row's expiry.
pub struct PunishmentScheduler {
    pub(crate) ledger: Arc<LedgerService>,
    gateway: Arc<dyn ModGateway>,
    timers: DashMap<PunishmentKey, TimerState>,
}

impl PunishmentScheduler {
    pub fn new(ledger: Arc<LedgerService>, gateway: Arc<dyn ModGateway>) -> Self {
        Self {
            ledger,
            gateway,
            timers: DashMap::new(),
        }
    }

    /// Persists the punishment row, then arms its timer. The row write is
    /// the durability boundary: a crash between the two re-derives the timer
    /// from the row on the next boot.
    pub async fn issue(
        self: &Arc<Self>,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
        duration_secs: i64,
    ) -> Result<i64, ModError> {
        let expires_at = chrono::Utc::now().timestamp() + duration_secs;
        self.ledger
            .upsert_active_punishment(guild_id, user_id, kind, expires_at)
            .await?;
        self.arm(guild_id, user_id, kind, expires_at);
        Ok(expires_at)
    }

    /// On boot: settle every overdue row synchronously (in arrival order),
    /// arm a timer for everything still pending. Runs to completion before
    /// the bot starts taking commands.
    pub async fn restore(self: &Arc<Self>) -> Result<RestoreSummary, ModError> {
        let rows = self.ledger.active_punishments().await?;
        let now = chrono::Utc::now().timestamp();
        let mut summary = RestoreSummary::default();

        for row in rows {
            if row.expires_at <= now {
                match self
                    .settle_inner(row.guild_id, row.user_id, row.kind, SettleMode::Expired, None)
                    .await
                {
                    Ok(_) => summary.settled += 1,
                    Err(e) => {
                        // Row stays behind; the reconciliation sweep retries it
                        error!(
                            "Could not settle overdue {} for user {} in guild {} on boot: {e}",
                            row.kind, row.user_id, row.guild_id
                        );
                    }
                }
            } else {
                self.arm(row.guild_id, row.user_id, row.kind, row.expires_at);
                summary.armed += 1;
            }
        }

        info!(
            "Punishment recovery done: {} settled, {} timers armed",
            summary.settled, summary.armed
        );
        Ok(summary)
    }

    /// Arms (or re-arms) the timer for a punishment. An existing timer for
    /// the same key is aborted first so a reissued punishment cannot leave a
    /// stale timer firing against the old expiry.
    pub fn arm(self: &Arc<Self>, guild_id: i64, user_id: i64, kind: PunishmentKind, deadline: i64) {
        let key = (guild_id, user_id, kind);
        let scheduler = Arc::clone(self);

        let handle = tokio::spawn(async move {
            let remaining = deadline - chrono::Utc::now().timestamp();
            if remaining > 0 {
                sleep(Duration::from_secs(remaining as u64)).await;
            }
            match scheduler
                .settle_inner(guild_id, user_id, kind, SettleMode::Expired, Some(deadline))
                .await
            {
                Ok(SettleOutcome::Settled) => {
                    info!("{kind} expired for user {user_id} in guild {guild_id}, reversed")
                }
                Ok(_) => {}
                Err(e) => warn!(
                    "Failed to reverse expired {kind} for user {user_id} in guild {guild_id}: {e}"
                ),
            }
        });

        let state = TimerState::Armed {
            deadline,
            abort: handle.abort_handle(),
        };
        match self.timers.entry(key) {
            Entry::Occupied(mut e) => {
                if let TimerState::Armed { abort, .. } = e.get() {
                    abort.abort();
                }
                e.insert(state);
            }
            Entry::Vacant(v) => {
                v.insert(state);
            }
        }
    }

    /// Expiry-driven settlement entry point for the sweep and recovery.
    pub async fn settle_expired(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
    ) -> Result<SettleOutcome, ModError> {
        self.settle_inner(guild_id, user_id, kind, SettleMode::Expired, None)
            .await
    }

    /// Moderator-driven reversal. Cancels the in-memory timer if one is
    /// armed; when the timer already fired and settled, the reversal still
    /// runs (it is idempotent platform-side) and the caller is told the
    /// punishment was already resolved.
    pub async fn cancel_and_settle(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
    ) -> Result<SettleOutcome, ModError> {
        self.settle_inner(guild_id, user_id, kind, SettleMode::Manual, None)
            .await
    }

    /// The deadline of the armed timer for this key, if any. Used by the
    /// status surface and tests.
    pub fn armed_deadline(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
    ) -> Option<i64> {
        self.timers
            .get(&(guild_id, user_id, kind))
            .and_then(|s| match &*s {
                TimerState::Armed { deadline, .. } => Some(*deadline),
                TimerState::Settling => None,
            })
    }

    async fn settle_inner(
        &self,
        guild_id: i64,
        user_id: i64,
        kind: PunishmentKind,
        mode: SettleMode,
        fired_deadline: Option<i64>,
    ) -> Result<SettleOutcome, ModError> {
        let key = (guild_id, user_id, kind);
        if !self.try_claim(key, fired_deadline) {
            return Ok(SettleOutcome::InFlight);
        }

        let reversal = match kind {
            PunishmentKind::Mute => self.gateway.lift_mute(guild_id, user_id).await,
            PunishmentKind::Tempban => self.gateway.lift_ban(guild_id, user_id).await,
        };

        match reversal {
            Ok(()) => {
                let now = chrono::Utc::now().timestamp();
                let cleared = match mode {
                    SettleMode::Expired => {
                        self.ledger.clear_if_due(guild_id, user_id, kind, now).await
                    }
                    SettleMode::Manual => {
                        self.ledger
                            .clear_active_punishment(guild_id, user_id, kind)
                            .await
                    }
                };
                self.release(key);
                match cleared {
                    Ok(true) => Ok(SettleOutcome::Settled),
                    Ok(false) => Ok(SettleOutcome::AlreadyResolved),
                    Err(e) => Err(e),
                }
            }
            Err(e) => {
                // Row is kept on purpose: the sweep or the next restart
                // retries the reversal.
                self.release(key);
                warn!(
                    "Platform rejected {kind} reversal for user {user_id} in guild {guild_id}: {e}"
                );
                Err(e)
            }
        }
    }

    /// ARMED (or absent) -> SETTLING. A fired timer passes its own deadline
    /// so it cannot claim a slot that was re-armed under it, and must find
    /// its own entry present (a vacant or replaced slot means it lost).
    fn try_claim(&self, key: PunishmentKey, fired_deadline: Option<i64>) -> bool {
        match self.timers.entry(key) {
            Entry::Occupied(mut e) => {
                let claimed = match e.get() {
                    TimerState::Armed { deadline, abort } => match fired_deadline {
                        Some(own) => *deadline == own,
                        None => {
                            abort.abort();
                            true
                        }
                    },
                    TimerState::Settling => false,
                };
                if claimed {
                    e.insert(TimerState::Settling);
                }
                claimed
            }
            Entry::Vacant(v) => {
                if fired_deadline.is_some() {
                    return false;
                }
                v.insert(TimerState::Settling);
                true
            }
        }
    }

    /// SETTLING -> SETTLED (entry removed). Leaves the entry alone when a
    /// re-issue already re-armed the key mid-settlement.
    fn release(&self, key: PunishmentKey) {
        self.timers
            .remove_if(&key, |_, state| matches!(state, TimerState::Settling));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeGateway {
        lifted_mutes: Mutex<Vec<(i64, i64)>>,
        lifted_bans: Mutex<Vec<(i64, i64)>>,
        fail: AtomicBool,
    }

    #[async_trait::async_trait]
    impl ModGateway for FakeGateway {
        async fn lift_mute(&self, guild_id: i64, user_id: i64) -> Result<(), ModError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ModError::Platform("missing permission".into()));
            }
            self.lifted_mutes.lock().unwrap().push((guild_id, user_id));
            Ok(())
        }

        async fn lift_ban(&self, guild_id: i64, user_id: i64) -> Result<(), ModError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ModError::Platform("missing permission".into()));
            }
            self.lifted_bans.lock().unwrap().push((guild_id, user_id));
            Ok(())
        }
    }

    async fn scheduler() -> (Arc<PunishmentScheduler>, Arc<FakeGateway>, Arc<LedgerService>) {
        let ledger = Arc::new(LedgerService::new(crate::db::test_connection().await));
        let gateway = Arc::new(FakeGateway::default());
        let scheduler = Arc::new(PunishmentScheduler::new(
            ledger.clone(),
            gateway.clone() as Arc<dyn ModGateway>,
        ));
        (scheduler, gateway, ledger)
    }

    #[tokio::test]
    async fn recovery_settles_overdue_rows_before_ready() {
        let (scheduler, gateway, ledger) = scheduler().await;
        let now = chrono::Utc::now().timestamp();

        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now - 30)
            .await
            .unwrap();

        let summary = scheduler.restore().await.unwrap();
        assert_eq!(summary.settled, 1);
        assert_eq!(summary.armed, 0);

        // Reversal happened and the row is gone by the time restore returns
        assert_eq!(*gateway.lifted_mutes.lock().unwrap(), vec![(1, 2)]);
        assert!(ledger
            .active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap()
            .is_none());
        assert_eq!(scheduler.armed_deadline(1, 2, PunishmentKind::Mute), None);
    }

    #[tokio::test]
    async fn recovery_arms_future_rows_for_their_remaining_time() {
        let (scheduler, gateway, ledger) = scheduler().await;
        let now = chrono::Utc::now().timestamp();

        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Tempban, now + 600)
            .await
            .unwrap();

        let summary = scheduler.restore().await.unwrap();
        assert_eq!(summary.settled, 0);
        assert_eq!(summary.armed, 1);

        // Timer deadline matches the row exactly; nothing was reversed
        assert_eq!(
            scheduler.armed_deadline(1, 2, PunishmentKind::Tempban),
            Some(now + 600)
        );
        assert!(gateway.lifted_bans.lock().unwrap().is_empty());
        assert!(ledger
            .active_punishment(1, 2, PunishmentKind::Tempban)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn issue_persists_then_arms() {
        let (scheduler, _gateway, ledger) = scheduler().await;

        let expires_at = scheduler
            .issue(1, 2, PunishmentKind::Mute, 3600)
            .await
            .unwrap();

        let row = ledger
            .active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap()
            .expect("row persisted");
        assert_eq!(row.expires_at, expires_at);
        assert_eq!(
            scheduler.armed_deadline(1, 2, PunishmentKind::Mute),
            Some(expires_at)
        );
    }

    #[tokio::test]
    async fn reissue_replaces_row_and_timer() {
        let (scheduler, _gateway, ledger) = scheduler().await;

        scheduler
            .issue(1, 2, PunishmentKind::Mute, 100)
            .await
            .unwrap();
        let second = scheduler
            .issue(1, 2, PunishmentKind::Mute, 5000)
            .await
            .unwrap();

        let rows = ledger.active_punishments().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expires_at, second);
        assert_eq!(
            scheduler.armed_deadline(1, 2, PunishmentKind::Mute),
            Some(second)
        );
    }

    #[tokio::test]
    async fn manual_reversal_settles_and_cancels_timer() {
        let (scheduler, gateway, ledger) = scheduler().await;

        scheduler
            .issue(1, 2, PunishmentKind::Mute, 3600)
            .await
            .unwrap();

        let outcome = scheduler
            .cancel_and_settle(1, 2, PunishmentKind::Mute)
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::Settled);
        assert_eq!(*gateway.lifted_mutes.lock().unwrap(), vec![(1, 2)]);
        assert!(ledger
            .active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap()
            .is_none());
        assert_eq!(scheduler.armed_deadline(1, 2, PunishmentKind::Mute), None);
    }

    #[tokio::test]
    async fn manual_reversal_after_settlement_reports_already_resolved() {
        let (scheduler, _gateway, _ledger) = scheduler().await;

        // No row, no timer: the race where the timer settled first
        let outcome = scheduler
            .cancel_and_settle(1, 2, PunishmentKind::Tempban)
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::AlreadyResolved);
    }

    #[tokio::test]
    async fn platform_failure_keeps_row_for_retry() {
        let (scheduler, gateway, ledger) = scheduler().await;
        let now = chrono::Utc::now().timestamp();

        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now - 10)
            .await
            .unwrap();

        gateway.fail.store(true, Ordering::SeqCst);
        let err = scheduler
            .settle_expired(1, 2, PunishmentKind::Mute)
            .await
            .unwrap_err();
        assert!(matches!(err, ModError::Platform(_)));

        // Row survived and the claim was released, so a later sweep succeeds
        assert!(ledger
            .active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap()
            .is_some());
        gateway.fail.store(false, Ordering::SeqCst);
        let outcome = scheduler
            .settle_expired(1, 2, PunishmentKind::Mute)
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::Settled);
        assert!(ledger
            .active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn expired_settlement_spares_a_reissued_row() {
        let (scheduler, _gateway, ledger) = scheduler().await;
        let now = chrono::Utc::now().timestamp();

        // The row was replaced with a future expiry before the stale
        // settlement got to run; the replacement must survive.
        ledger
            .upsert_active_punishment(1, 2, PunishmentKind::Mute, now + 3600)
            .await
            .unwrap();

        let outcome = scheduler
            .settle_expired(1, 2, PunishmentKind::Mute)
            .await
            .unwrap();
        assert_eq!(outcome, SettleOutcome::AlreadyResolved);
        assert!(ledger
            .active_punishment(1, 2, PunishmentKind::Mute)
            .await
            .unwrap()
            .is_some());
    }
}
