pub mod manager;
pub mod runner;

pub use manager::{PunishmentScheduler, SettleMode, SettleOutcome};
