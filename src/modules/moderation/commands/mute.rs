use crate::db::entities::punishments::PunishmentKind;
use crate::modules::moderation::duration_parser::parse_duration;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Mute a user, optionally for a limited time
#[poise::command(slash_command, guild_only, required_permissions = "MODERATE_MEMBERS")]
pub async fn mute(
    ctx: Context<'_>,
    #[description = "User to mute"] user: serenity::User,
    #[description = "Duration (e.g. 10m, 2h, 3d); omit for indefinite"] duration: Option<String>,
    #[description = "Reason for the mute"] reason: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();
    let guild = guild_id.get() as i64;
    let subject = user.id.get() as i64;

    // Validate before touching anything
    let duration_parsed = match duration {
        Some(ref d) => match parse_duration(d) {
            Some(dur) => Some(dur),
            None => {
                ctx.say("❌ Invalid duration format. Use m, h, or d (e.g., 10m, 2h, 3d).")
                    .await?;
                return Ok(());
            }
        },
        None => None,
    };

    let mute_reason = reason.unwrap_or_else(|| "No reason provided".to_string());

    data.gateway.apply_mute(guild, subject).await?;

    if let Some(dur) = duration_parsed {
        let expires_at = data
            .scheduler
            .issue(guild, subject, PunishmentKind::Mute, dur.num_seconds())
            .await?;

        ctx.say(format!(
            "🔇 <@{subject}> has been muted until <t:{expires_at}:F>. Reason: {mute_reason}"
        ))
        .await?;
    } else {
        ctx.say(format!(
            "🔇 <@{subject}> has been muted indefinitely. Reason: {mute_reason}"
        ))
        .await?;
    }

    Ok(())
}
