pub mod ban;
pub mod kick;
pub mod mute;
pub mod tempban;
pub mod unban;
pub mod unmute;
pub mod warn;

pub use ban::*;
pub use kick::*;
pub use mute::*;
pub use tempban::*;
pub use unban::*;
pub use unmute::*;
pub use warn::*;
