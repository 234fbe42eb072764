use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Punishments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Punishments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Punishments::GuildId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Punishments::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Punishments::Kind)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Punishments::ExpiresAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // One active row per (guild, user, kind); the upsert conflict target
        manager
            .create_index(
                Index::create()
                    .name("idx-punishments-guild-user-kind")
                    .table(Punishments::Table)
                    .col(Punishments::GuildId)
                    .col(Punishments::UserId)
                    .col(Punishments::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index for faster expiry sweeps
        manager
            .create_index(
                Index::create()
                    .name("idx-punishments-expires-at")
                    .table(Punishments::Table)
                    .col(Punishments::ExpiresAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Punishments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Punishments {
    Table,
    Id,
    GuildId,
    UserId,
    Kind,
    ExpiresAt,
}
