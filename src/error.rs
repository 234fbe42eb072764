use poise::serenity_prelude as serenity;

/// Service-layer error taxonomy. Commands surface these through the
/// framework's `anyhow::Error` boundary.
#[derive(Debug, thiserror::Error)]
pub enum ModError {
    /// Rejected before any mutation (bad duration string, winners < 1, ...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// The store was unreachable or a constraint fired. Writes are single
    /// statements, so there is no partial state to clean up.
    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),

    /// The target row no longer exists. Races against timers and other
    /// moderators are expected, so callers report this as a no-op.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The hosting platform rejected an action (missing permission, unknown
    /// member). The punishment row is kept so a later sweep can retry.
    #[error("platform error: {0}")]
    Platform(String),
}

impl From<serenity::Error> for ModError {
    fn from(e: serenity::Error) -> Self {
        ModError::Platform(e.to_string())
    }
}
