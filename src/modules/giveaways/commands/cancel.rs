use crate::services::presenter;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Cancel an open giveaway; its entries are discarded
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn giveaway_cancel(
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

    if !data.giveaways.cancel(giveaway.id).await? {
        ctx.say("❌ That giveaway has already ended.").await?;
        return Ok(());
    }

    // Best effort: grey out the join button on the old announcement
    let edit = serenity::EditMessage::new()
        .components(vec![presenter::join_row(giveaway.id, 0, true)]);
    let _ = ctx
        .http()
        .edit_message(
            serenity::ChannelId::new(giveaway.channel_id as u64).into(),
            serenity::MessageId::new(message_ref as u64),
            &edit,
            Vec::new(),
        )
        .await;

    ctx.say(format!("🛑 Giveaway **{}** has been canceled.", giveaway.title))
        .await?;

    Ok(())
}
