use crate::error::ModError;
use crate::services::giveaways::EntryToggle;
use crate::services::presenter;
use crate::Data;
use poise::serenity_prelude as serenity;
use tracing::warn;

/// Handles a press on a giveaway's join button (`giveaway_join_<id>`):
/// flips the caller's entry, refreshes the count in the button label and
/// answers ephemerally, mirroring what the announcement shows publicly.
pub async fn handle_join_toggle(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
) -> Result<(), crate::Error> {
    let data = ctx.data::<Data>();

    let Some(id_str) = interaction.data.custom_id.strip_prefix("giveaway_join_") else {
        return Ok(());
    };
    let Ok(giveaway_id) = id_str.parse::<i32>() else {
        return Ok(());
    };

    let Some(giveaway) = data.giveaways.get(giveaway_id).await? else {
        respond(ctx, interaction, "❌ This giveaway no longer exists.").await?;
        return Ok(());
    };

    let (toggle, count) = match data
        .giveaways
        .toggle_entry(giveaway_id, interaction.user.id.get() as i64)
        .await
    {
        Ok(result) => result,
        Err(ModError::NotFound(_)) => {
            respond(ctx, interaction, "❌ This giveaway has already ended.").await?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Refresh the count shown on the button; losing this edit only stales
    // the label, the entry set is already correct
    let edit = serenity::EditMessage::new()
        .components(vec![presenter::join_row(giveaway_id, count, false)]);
    if let Err(e) = ctx
        .http
        .edit_message(
            interaction.message.channel_id,
            interaction.message.id,
            &edit,
            Vec::new(),
        )
        .await
    {
        warn!("Could not refresh join button for giveaway {giveaway_id}: {e}");
    }

    let reply = match toggle {
        EntryToggle::Joined => format!(
            "🎉 You have successfully entered the **{}** giveaway!",
            giveaway.title
        ),
        EntryToggle::Left => format!("❌ You left the **{}** giveaway.", giveaway.title),
    };
    respond(ctx, interaction, &reply).await?;

    Ok(())
}

async fn respond(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: &str,
) -> Result<(), crate::Error> {
    interaction
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content.to_string())
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}
