use super::manager::{PunishmentScheduler, SettleOutcome};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

impl PunishmentScheduler {
    /// Starts the background reconciliation sweep. It re-settles rows whose
    /// reversal previously failed (platform errors keep the row) and acts as
    /// a net under the per-punishment timers.
    pub fn start_reconcile_runner(self: Arc<Self>) {
        tokio::spawn(async move {
            info!("Punishment reconciliation runner started.");
            loop {
                sleep(SWEEP_INTERVAL).await;
                let now = chrono::Utc::now().timestamp();

                let overdue = match self.ledger.overdue_punishments(now).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        error!("Failed to fetch overdue punishments: {e}");
                        continue;
                    }
                };

                for row in overdue {
                    match self
                        .settle_expired(row.guild_id, row.user_id, row.kind)
                        .await
                    {
                        Ok(SettleOutcome::Settled) => info!(
                            "Sweep reversed overdue {} for user {} in guild {}",
                            row.kind, row.user_id, row.guild_id
                        ),
                        // InFlight: a timer beat us to it. AlreadyResolved:
                        // the row vanished between select and settle.
                        Ok(_) => {}
                        Err(e) => error!(
                            "Sweep could not reverse {} for user {} in guild {}: {e}",
                            row.kind, row.user_id, row.guild_id
                        ),
                    }
                }
            }
        });
    }
}
