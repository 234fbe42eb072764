use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GiveawayEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GiveawayEntries::GiveawayId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiveawayEntries::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(GiveawayEntries::GiveawayId)
                            .col(GiveawayEntries::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-giveaway-entries-giveaway")
                            .from(GiveawayEntries::Table, GiveawayEntries::GiveawayId)
                            .to(Giveaways::Table, Giveaways::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GiveawayEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GiveawayEntries {
    Table,
    GiveawayId,
    UserId,
}

#[derive(DeriveIden)]
enum Giveaways {
    Table,
    Id,
}
