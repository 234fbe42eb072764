use crate::db::entities::punishments::PunishmentKind;
use crate::services::punishments::SettleOutcome;
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Unmute a user
#[poise::command(slash_command, guild_only, required_permissions = "MODERATE_MEMBERS")]
pub async fn unmute(
    ctx: Context<'_>,
    #[description = "User to unmute"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();
    let guild = guild_id.get() as i64;
    let subject = user.id.get() as i64;

    match data
        .scheduler
        .cancel_and_settle(guild, subject, PunishmentKind::Mute)
        .await?
    {
        SettleOutcome::Settled => {
            ctx.say(format!("🔊 <@{subject}> has been unmuted.")).await?;
        }
        // Covers indefinite mutes (no timer) and the race where the timer
        // settled first; the role lift already ran either way.
        SettleOutcome::AlreadyResolved => {
            ctx.say(format!(
                "🔊 <@{subject}> is no longer muted (no timed mute was pending)."
            ))
            .await?;
        }
        SettleOutcome::InFlight => {
            ctx.say(format!(
                "⏳ <@{subject}>'s mute is already being resolved."
            ))
            .await?;
        }
    }

    Ok(())
}
