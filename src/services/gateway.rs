use crate::error::ModError;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing::warn;

pub const MUTED_ROLE_NAME: &str = "Muted";

/// The platform-side actions the punishment scheduler needs to reverse a
/// sanction. Behind a trait so settlement logic can be exercised without a
/// live Discord connection.
#[async_trait::async_trait]
pub trait ModGateway: Send + Sync {
    async fn lift_mute(&self, guild_id: i64, user_id: i64) -> Result<(), ModError>;
    async fn lift_ban(&self, guild_id: i64, user_id: i64) -> Result<(), ModError>;
}

pub struct SerenityGateway {
    http: Arc<serenity::Http>,
}

impl SerenityGateway {
    pub fn new(http: Arc<serenity::Http>) -> Self {
        Self { http }
    }

    /// Finds the guild's "Muted" role, creating it (and denying send/speak/
    /// reaction permissions on every channel) when missing. Per-channel
    /// overwrite failures are logged and skipped so one broken channel does
    /// not abort the mute.
    pub async fn ensure_muted_role(
        &self,
        guild_id: serenity::GuildId,
    ) -> Result<serenity::RoleId, ModError> {
        let roles = self.http.get_guild_roles(guild_id).await?;
        if let Some(role) = roles.iter().find(|r| r.name == MUTED_ROLE_NAME) {
            return Ok(role.id);
        }

        let role = guild_id
            .create_role(
                &self.http,
                serenity::EditRole::new()
                    .name(MUTED_ROLE_NAME)
                    .permissions(serenity::Permissions::empty()),
            )
            .await?;

        let overwrite_for = |role_id| serenity::PermissionOverwrite {
            allow: serenity::Permissions::empty(),
            deny: serenity::Permissions::SEND_MESSAGES
                | serenity::Permissions::SPEAK
                | serenity::Permissions::ADD_REACTIONS,
            kind: serenity::PermissionOverwriteType::Role(role_id),
        };

        for channel in self.http.get_channels(guild_id).await? {
            if let Err(e) = channel
                .id
                .create_permission(&self.http, overwrite_for(role.id), None)
                .await
            {
                warn!(
                    "Could not deny Muted permissions on channel {}: {e}",
                    channel.id
                );
            }
        }

        Ok(role.id)
    }

    pub async fn apply_mute(&self, guild_id: i64, user_id: i64) -> Result<(), ModError> {
        let guild = serenity::GuildId::new(guild_id as u64);
        let user = serenity::UserId::new(user_id as u64);
        let role = self.ensure_muted_role(guild).await?;

        self.http
            .add_member_role(guild, user, role, Some("Muted by moderator"))
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ModGateway for SerenityGateway {
    async fn lift_mute(&self, guild_id: i64, user_id: i64) -> Result<(), ModError> {
        let guild = serenity::GuildId::new(guild_id as u64);
        let user = serenity::UserId::new(user_id as u64);

        let roles = self.http.get_guild_roles(guild).await?;
        let Some(role) = roles.iter().find(|r| r.name == MUTED_ROLE_NAME) else {
            // No Muted role in the guild means nothing to take off
            return Ok(());
        };

        self.http
            .remove_member_role(guild, user, role.id, Some("Mute expired or lifted"))
            .await?;
        Ok(())
    }

    async fn lift_ban(&self, guild_id: i64, user_id: i64) -> Result<(), ModError> {
        let guild = serenity::GuildId::new(guild_id as u64);
        let user = serenity::UserId::new(user_id as u64);

        self.http
            .remove_ban(guild, user, Some("Temporary ban expired"))
            .await?;
        Ok(())
    }
}
