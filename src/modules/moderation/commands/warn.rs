use crate::db::entities::punishments::PunishmentKind;
use crate::services::escalation::{self, Directive};
use crate::{Context, Error};
use poise::serenity_prelude as serenity;

/// Warn a user; repeated warns escalate to mutes and eventually a ban
#[poise::command(slash_command, guild_only, required_permissions = "MODERATE_MEMBERS")]
pub async fn warn(
    ctx: Context<'_>,
    #[description = "User to warn"] user: serenity::User,
    #[description = "Reason for the warning"] reason: String,
    #[description = "Permanent warn (never expires)"] permanent: Option<bool>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();
    let guild = guild_id.get() as i64;
    let subject = user.id.get() as i64;
    let permanent = permanent.unwrap_or(false);

    data.ledger
        .record_warn(
            guild,
            subject,
            ctx.author().id.get() as i64,
            Some(reason.clone()),
            permanent,
        )
        .await?;

    let count = data
        .ledger
        .count_active_warns(guild, subject, chrono::Utc::now().timestamp())
        .await?;

    match escalation::directive_for(count) {
        Directive::None => {
            ctx.say(format!(
                "⚠️ <@{subject}> has been warned ({count} active). Reason: {reason}"
            ))
            .await?;
        }
        Directive::Mute(duration) => {
            data.gateway.apply_mute(guild, subject).await?;
            let expires_at = data
                .scheduler
                .issue(
                    guild,
                    subject,
                    PunishmentKind::Mute,
                    duration.as_secs() as i64,
                )
                .await?;

            ctx.say(format!(
                "⚠️ <@{subject}> reached {count} active warns and has been muted until <t:{expires_at}:F>."
            ))
            .await?;
        }
        Directive::Ban => {
            // Permanent: no ledger row, no timer to reverse it
            guild_id
                .ban(ctx.http(), user.id, 0, Some("Reached the warn limit"))
                .await?;

            ctx.say(format!(
                "🔨 <@{subject}> reached {count} active warns and has been permanently banned."
            ))
            .await?;
        }
    }

    Ok(())
}

/// Show how many active warns a user has
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MODERATE_MEMBERS",
    ephemeral
)]
pub async fn warns(
    ctx: Context<'_>,
    #[description = "User to look up"] user: serenity::User,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();
    let guild = guild_id.get() as i64;
    let subject = user.id.get() as i64;

    let active = data
        .ledger
        .count_active_warns(guild, subject, chrono::Utc::now().timestamp())
        .await?;
    let total = data.ledger.warns_for(guild, subject).await?.len();

    ctx.say(format!(
        "<@{subject}> has {active} active warns ({total} on record)."
    ))
    .await?;

    Ok(())
}
