use poise::serenity_prelude as serenity;
use tracing::{error, info};

/// Custom event handler for non-command Discord events
pub struct Handler;

#[serenity::async_trait]
impl serenity::EventHandler for Handler {
    async fn dispatch(&self, ctx: &serenity::Context, event: &serenity::FullEvent) {
        match event {
            serenity::FullEvent::Ready { data_about_bot, .. } => {
                info!("Logged in as {}", data_about_bot.user.name);
            }
            serenity::FullEvent::GuildCreate { guild, is_new, .. } => {
                if is_new.unwrap_or(false) {
                    info!("Joined new guild: {} ({})", guild.name, guild.id);
                }
            }
            serenity::FullEvent::GuildDelete { incomplete, .. } => {
                info!("Left guild: {}", incomplete.id);
            }
            serenity::FullEvent::InteractionCreate { interaction, .. } => {
                handle_interactions(ctx, interaction).await;
            }
            _ => {}
        }
    }
}

async fn handle_interactions(ctx: &serenity::Context, interaction: &serenity::Interaction) {
    if let serenity::Interaction::Component(component_interaction) = interaction {
        let ctx = ctx.clone();
        let component_interaction = component_interaction.clone();

        tokio::spawn(async move {
            let custom_id = &component_interaction.data.custom_id;

            if custom_id.starts_with("giveaway_join_") {
                if let Err(e) = crate::modules::giveaways::events::handle_join_toggle(
                    &ctx,
                    &component_interaction,
                )
                .await
                {
                    error!("Error handling giveaway join interaction: {:?}", e);
                }
            }
        });
    }
}
