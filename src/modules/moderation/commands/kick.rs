use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Kick a user from the server
#[poise::command(slash_command, guild_only, required_permissions = "KICK_MEMBERS")]
pub async fn kick(
    ctx: Context<'_>,
    #[description = "User to kick"] user: serenity::User,
    #[description = "Reason for the kick"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let kick_reason = reason.unwrap_or_else(|| "No reason provided".to_string());

    guild_id
        .kick(ctx.http(), user.id, Some(&kick_reason))
        .await?;

    ctx.say(format!(
        "👢 <@{}> has been kicked. Reason: {kick_reason}",
        user.id.get()
    ))
    .await?;

    Ok(())
}
