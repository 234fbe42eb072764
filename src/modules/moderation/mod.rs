pub mod commands;
pub mod duration_parser;

use crate::modules::{Module, ModuleDefinition};

pub fn module() -> Module {
    Module {
        definition: ModuleDefinition {
            id: "moderation",
            name: "Moderation",
            description: "Warns, mutes, kicks and (temporary) bans with automatic escalation",
        },
        commands: vec![
            commands::warn(),
            commands::warns(),
            commands::mute(),
            commands::unmute(),
            commands::kick(),
            commands::ban(),
            commands::tempban(),
            commands::unban(),
        ],
    }
}
