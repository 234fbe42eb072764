pub mod giveaway_entries;
pub mod giveaways;
pub mod punishments;
pub mod warns;

pub mod prelude {
    pub use super::giveaway_entries::Entity as GiveawayEntries;
    pub use super::giveaways::Entity as Giveaways;
    pub use super::punishments::Entity as Punishments;
    pub use super::warns::Entity as Warns;
}
