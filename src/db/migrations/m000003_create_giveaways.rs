use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Giveaways::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Giveaways::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Giveaways::GuildId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Giveaways::ChannelId)
                            .big_integer()
                            .not_null(),
                    )
                    // NULL until the announcement message is bound
                    .col(ColumnDef::new(Giveaways::MessageId).big_integer())
                    .col(ColumnDef::new(Giveaways::HostId).big_integer().not_null())
                    .col(ColumnDef::new(Giveaways::Title).string().not_null())
                    .col(ColumnDef::new(Giveaways::Requirements).string())
                    .col(ColumnDef::new(Giveaways::Winners).integer().not_null())
                    .col(ColumnDef::new(Giveaways::EndAt).big_integer().not_null())
                    .col(
                        ColumnDef::new(Giveaways::Status)
                            .string_len(16)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // The sweep selects on (status, end_at)
        manager
            .create_index(
                Index::create()
                    .name("idx-giveaways-status-end-at")
                    .table(Giveaways::Table)
                    .col(Giveaways::Status)
                    .col(Giveaways::EndAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-giveaways-message-id")
                    .table(Giveaways::Table)
                    .col(Giveaways::MessageId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Giveaways::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Giveaways {
    Table,
    Id,
    GuildId,
    ChannelId,
    MessageId,
    HostId,
    Title,
    Requirements,
    Winners,
    EndAt,
    Status,
}
