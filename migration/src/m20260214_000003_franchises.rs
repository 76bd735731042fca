use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260214_000002_leagues::Leagues;

static IDX_FRANCHISE_LEAGUE_ID: &str = "idx_franchise_league_id";
static IDX_FRANCHISE_LEAGUE_REMOTE: &str = "idx_franchise_league_remote";
static FK_FRANCHISE_LEAGUE_ID: &str = "fk_franchise_league_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Franchises::Table)
                    .if_not_exists()
                    .col(pk_auto(Franchises::Id))
                    .col(integer(Franchises::LeagueId))
                    .col(string(Franchises::RemoteId))
                    .col(string(Franchises::Name))
                    .col(string_null(Franchises::OwnerName))
                    .col(string_null(Franchises::Record))
                    .col(integer_null(Franchises::PointsFor))
                    .col(integer_null(Franchises::PointsAgainst))
                    .col(integer_null(Franchises::Standing))
                    .col(string_null(Franchises::OpponentId))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_FRANCHISE_LEAGUE_ID)
                    .table(Franchises::Table)
                    .col(Franchises::LeagueId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_FRANCHISE_LEAGUE_REMOTE)
                    .table(Franchises::Table)
                    .col(Franchises::LeagueId)
                    .col(Franchises::RemoteId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_FRANCHISE_LEAGUE_ID)
                    .from_tbl(Franchises::Table)
                    .from_col(Franchises::LeagueId)
                    .to_tbl(Leagues::Table)
                    .to_col(Leagues::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_FRANCHISE_LEAGUE_ID)
                    .table(Franchises::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_FRANCHISE_LEAGUE_REMOTE)
                    .table(Franchises::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_FRANCHISE_LEAGUE_ID)
                    .table(Franchises::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Franchises::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Franchises {
    Table,
    Id,
    LeagueId,
    RemoteId,
    Name,
    OwnerName,
    Record,
    PointsFor,
    PointsAgainst,
    Standing,
    OpponentId,
}
