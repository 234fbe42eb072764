use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Permanently ban a user from the server
#[poise::command(slash_command, guild_only, required_permissions = "BAN_MEMBERS")]
pub async fn ban(
    ctx: Context<'_>,
    #[description = "User to ban"] user: serenity::User,
    #[description = "Reason for the ban"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let ban_reason = reason.unwrap_or_else(|| "No reason provided".to_string());

    guild_id
        .ban(ctx.http(), user.id, 0, Some(&ban_reason))
        .await?;

    ctx.say(format!(
        "🔨 <@{}> has been permanently banned. Reason: {ban_reason}",
        user.id.get()
    ))
    .await?;

    Ok(())
}
