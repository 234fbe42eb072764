use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Warns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Warns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Warns::GuildId).big_integer().not_null())
                    .col(ColumnDef::new(Warns::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Warns::ModId).big_integer().not_null())
                    .col(ColumnDef::new(Warns::Reason).string())
                    .col(ColumnDef::new(Warns::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Warns::ExpiresAt).big_integer())
                    .col(
                        ColumnDef::new(Warns::Permanent)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Active-warn counting always filters on (guild, user)
        manager
            .create_index(
                Index::create()
                    .name("idx-warns-guild-user")
                    .table(Warns::Table)
                    .col(Warns::GuildId)
                    .col(Warns::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Warns::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Warns {
    Table,
    Id,
    GuildId,
    UserId,
    ModId,
    Reason,
    CreatedAt,
    ExpiresAt,
    Permanent,
}
