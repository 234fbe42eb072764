use crate::db::entities::punishments::PunishmentKind;
use crate::services::punishments::SettleOutcome;
use crate::{Context, Error};

/// Unban a user by their id
#[poise::command(slash_command, guild_only, required_permissions = "BAN_MEMBERS")]
pub async fn unban(
    ctx: Context<'_>,
    #[description = "Id of the user to unban"] user_id: String,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().unwrap();
    let data = ctx.data();

    let subject: i64 = match user_id.trim().parse() {
        Ok(id) => id,
        Err(_) => {
            ctx.say("❌ That is not a valid user id.").await?;
            return Ok(());
        }
    };

    match data
        .scheduler
        .cancel_and_settle(guild_id.get() as i64, subject, PunishmentKind::Tempban)
        .await?
    {
        SettleOutcome::Settled => {
            ctx.say(format!(
                "✅ <@{subject}> has been unbanned and their pending unban timer cleared."
            ))
            .await?;
        }
        SettleOutcome::AlreadyResolved => {
            ctx.say(format!("✅ <@{subject}> has been unbanned.")).await?;
        }
        SettleOutcome::InFlight => {
            ctx.say(format!("⏳ <@{subject}>'s ban is already being lifted."))
                .await?;
        }
    }

    Ok(())
}
