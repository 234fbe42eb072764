use crate::modules::moderation::duration_parser::parse_duration;
use crate::services::presenter;
use crate::{Context, Error};

/// Start a new giveaway in this channel
#[poise::command(slash_command, guild_only, required_permissions = "MANAGE_GUILD")]
pub async fn giveaway_start(
    ctx: Context<'_>,
    #[description = "What is being given away"] title: String,
    #[description = "Number of winners"] winners: i32,
    #[description = "How long it runs (e.g. 10m, 2h, 3d)"] duration: String,
    #[description = "Entry requirements"] requirements: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();

    let dur = match parse_duration(&duration) {
        Some(d) => d,
        None => {
            ctx.say("❌ Invalid duration format. Use m, h, or d (e.g., 10m, 2h, 3d).")
                .await?;
            return Ok(());
        }
    };
    if winners < 1 {
        ctx.say("❌ A giveaway needs at least one winner.").await?;
        return Ok(());
    }

    let host_id = ctx.author().id.get() as i64;
    let end_at = chrono::Utc::now().timestamp() + dur.num_seconds();

    // Phase one: persist provisionally so the join button can carry a real
    // giveaway id before the announcement exists
    let giveaway_id = data
        .giveaways
        .open(
            guild_id.get() as i64,
            ctx.channel_id().get() as i64,
            host_id,
            title.clone(),
            requirements.clone(),
            winners,
            end_at,
        )
        .await?;

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .embed(presenter::giveaway_embed(
                    &title,
                    host_id,
                    winners,
                    requirements.as_deref(),
                    end_at,
                ))
                .components(vec![presenter::join_row(giveaway_id, 0, false)]),
        )
        .await?;

    // Phase two: bind the announcement message so the sweep and the
    // message-ref commands can find it
    let message = reply.into_message().await?;
    data.giveaways
        .bind(giveaway_id, message.id.get() as i64)
        .await?;

    Ok(())
}
