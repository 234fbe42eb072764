use crate::services::giveaways::selection::draw_winners;
use crate::services::presenter;
use crate::{Context, Error};

/// Reroll winners for an ended giveaway
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn giveaway_reroll(
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
        ctx.say("❌ No participants found.").await?;
        return Ok(());
    }

    let winner_ids = {
        let mut rng = rand::thread_rng();
        draw_winners(
            &mut rng,
            &entries,
            giveaway.winners as usize,
            data.preferred_winner,
        )
    };

    ctx.say(format!(
        "🔁 Rerolled! Congratulations {} — you won the giveaway for **{}**!",
        presenter::mention_list(&winner_ids),
        giveaway.title
    ))
    .await?;

    Ok(())
}
