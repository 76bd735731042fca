use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    // Primary key is the remote player id, never autoincremented.
                    .col(big_integer(Players::Id).primary_key())
                    .col(string(Players::Name))
                    .col(string_null(Players::Position))
                    .col(string_null(Players::NflTeam))
                    .col(string_null(Players::Status))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Players {
    Table,
    Id,
    Name,
    Position,
    NflTeam,
    Status,
}
