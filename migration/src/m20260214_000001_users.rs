use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_uniq(Users::Email))
                    .col(string_null(Users::RemoteUsername))
                    .col(string(Users::Plan))
                    .col(integer_null(Users::MassOfferDailyCap))
                    .col(integer(Users::BonusMassOffers).default(0))
                    .col(text_null(Users::CanonicalToken))
                    .col(text_null(Users::HostTokens))
                    .col(timestamp_null(Users::TokensRefreshedAt))
                    .col(timestamp_null(Users::FounderExpiresAt))
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Users {
    Table,
    Id,
    Email,
    RemoteUsername,
    Plan,
    MassOfferDailyCap,
    BonusMassOffers,
    CanonicalToken,
    HostTokens,
    TokensRefreshedAt,
    FounderExpiresAt,
    CreatedAt,
    UpdatedAt,
}
