pub mod commands;
pub mod events;

use crate::modules::{Module, ModuleDefinition};

pub fn module() -> Module {
    Module {
        definition: ModuleDefinition {
            id: "giveaways",
            name: "Giveaways",
            description: "Timed giveaways with a join button and automatic winner draws",
        },
        commands: vec![
            commands::giveaway_start(),
            commands::giveaway_participants(),
            commands::giveaway_cancel(),
            commands::giveaway_reroll(),
        ],
    }
}
