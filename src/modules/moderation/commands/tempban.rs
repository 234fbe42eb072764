use crate::db::entities::punishments::PunishmentKind;
use crate::modules::moderation::duration_parser::parse_duration;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Temporarily ban a user; the ban is lifted automatically when it expires
#[poise::command(slash_command, guild_only, required_permissions = "BAN_MEMBERS")]
pub async fn tempban(
    ctx: Context<'_>,
    #[description = "User to ban"] user: serenity::User,
    #[description = "Duration of the ban (e.g. 10m, 2h, 3d)"] duration: String,
    #[description = "Reason for the ban"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();
    let guild = guild_id.get() as i64;
    let subject = user.id.get() as i64;

    let dur = match parse_duration(&duration) {
        Some(d) => d,
        None => {
            ctx.say("❌ Invalid duration format. Use m, h, or d (e.g., 10m, 2h, 3d).")
                .await?;
            return Ok(());
        }
    };

    let ban_reason = reason.unwrap_or_else(|| "No reason provided".to_string());

    // Platform ban first; the row write below is what makes the unban
    // survive a restart
    guild_id
        .ban(ctx.http(), user.id, 0, Some(&ban_reason))
        .await?;

    let expires_at = data
        .scheduler
        .issue(guild, subject, PunishmentKind::Tempban, dur.num_seconds())
        .await?;

    ctx.say(format!(
        "🔨 <@{subject}> has been banned until <t:{expires_at}:F>. Reason: {ban_reason}"
    ))
    .await?;

    Ok(())
}
