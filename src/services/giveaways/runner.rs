use super::manager::GiveawayService;
use super::selection::draw_winners;
use crate::db::entities::giveaways;
use crate::error::ModError;
use crate::services::presenter;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use tracing::{error, info};

const SWEEP_INTERVAL: Duration = Duration::from_secs(30);

impl GiveawayService {
    /// Starts the background sweep that closes elapsed giveaways and draws
    /// their winners. One sweep task serves every giveaway regardless of
    /// duration; closing is guarded by `close` so a giveaway is drawn at
    /// most once even if a sweep races a cancel or a restart.
    pub fn start_sweep_runner(
        self: Arc<Self>,
        http: Arc<serenity::Http>,
        preferred_winner: Option<i64>,
    ) {
        tokio::spawn(async move {
            info!("Giveaway sweep runner started.");
            loop {
                sleep(SWEEP_INTERVAL).await;
                let now = chrono::Utc::now().timestamp();

                let due = match self.due_giveaways(now).await {
                    Ok(rows) => rows,
                    Err(e) => {
                        error!("Failed to fetch elapsed giveaways: {e}");
                        continue;
                    }
                };

                for giveaway in due {
                    if let Err(e) = self.finish(&http, &giveaway, preferred_winner).await {
                        error!("Failed to finish giveaway {}: {e}", giveaway.id);
                    }
                }
            }
        });
    }

    /// Closes one elapsed giveaway and announces the result. The status flip
    /// happens before anything is sent, so a crash mid-announcement can only
    /// lose the report, never re-draw the winners.
    pub(crate) async fn finish(
        &self,
        http: &serenity::Http,
        giveaway: &giveaways::Model,
        preferred_winner: Option<i64>,
    ) -> Result<(), ModError> {
        if !self.close(giveaway.id).await? {
            // Someone else closed it first; their draw stands
            return Ok(());
        }

        let entries = self.entries(giveaway.id).await?;
        let winner_ids = {
            let mut rng = rand::thread_rng();
            draw_winners(
                &mut rng,
                &entries,
                giveaway.winners as usize,
                preferred_winner,
            )
        };

        let channel = serenity::ChannelId::new(giveaway.channel_id as u64);

        // Disable the join button on the original announcement, if bound
        if let Some(message_id) = giveaway.message_id {
            let edit = serenity::EditMessage::new()
                .components(vec![presenter::join_row(giveaway.id, entries.len() as u64, true)]);
            if let Err(e) = http
                .edit_message(
                    channel.into(),
                    serenity::MessageId::new(message_id as u64),
                    &edit,
                    Vec::new(),
                )
                .await
            {
                error!(
                    "Could not disable join button for giveaway {}: {e}",
                    giveaway.id
                );
            }
        }

        let message = if winner_ids.is_empty() {
            info!("Giveaway {} ended with no entries", giveaway.id);
            serenity::CreateMessage::new().content(format!(
                "❌ No valid entries for **{}**, giveaway canceled.",
                giveaway.title
            ))
        } else {
            info!(
                "Giveaway {} ended, winners: {:?}",
                giveaway.id, winner_ids
            );
            serenity::CreateMessage::new().embed(presenter::giveaway_ended_embed(
                &giveaway.title,
                giveaway.host_id,
                giveaway.winners,
                &winner_ids,
            ))
        };

        http.send_message(channel.into(), Vec::new(), &message)
            .await?;

        Ok(())
    }
}
