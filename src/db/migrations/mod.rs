pub mod m000001_create_warns;
pub mod m000002_create_punishments;
pub mod m000003_create_giveaways;
pub mod m000004_create_giveaway_entries;

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m000001_create_warns::Migration),
            Box::new(m000002_create_punishments::Migration),
            Box::new(m000003_create_giveaways::Migration),
            Box::new(m000004_create_giveaway_entries::Migration),
        ]
    }
}
