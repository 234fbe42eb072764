use crate::services::presenter;
use crate::{Context, Error};

/// See all participants in a giveaway (mods only)
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_GUILD",
    ephemeral
)]
pub async fn giveaway_participants(
    ctx: Context<'_>,
    #[description = "Message id of the giveaway announcement"] message_id: String,
) -> Result<(), Error> {
    let data = ctx.data();

    let Ok(message_ref) = message_id.trim().parse::<i64>() else {
        ctx.say("❌ That is not a valid message id.").await?;
        return Ok(());
    };

    let Some(giveaway) = data.giveaways.find_by_message(message_ref).await? else {
        ctx.say("❌ Giveaway not found.").await?;
        return Ok(());
    };

    let entries = data.giveaways.entries(giveaway.id).await?;
    if entries.is_empty() {
        ctx.say("❌ No participants.").await?;
        return Ok(());
    }

    ctx.send(
        poise::CreateReply::default()
            .embed(presenter::participants_embed(&giveaway.title, &entries)),
    )
    .await?;

    Ok(())
}
