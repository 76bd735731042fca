use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260214_000001_users::Users;

static IDX_LEAGUE_USER_ID: &str = "idx_league_user_id";
static IDX_LEAGUE_USER_REMOTE_SEASON: &str = "idx_league_user_remote_season";
static FK_LEAGUE_USER_ID: &str = "fk_league_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Leagues::Table)
                    .if_not_exists()
                    .col(pk_auto(Leagues::Id))
                    .col(integer(Leagues::UserId))
                    .col(string(Leagues::RemoteId))
                    .col(string(Leagues::Name))
                    .col(integer(Leagues::Season))
                    .col(string_null(Leagues::FranchiseId))
                    .col(string_null(Leagues::Host))
                    .col(string_null(Leagues::StarterSlots))
                    .col(timestamp_null(Leagues::SyncedAt))
                    .col(timestamp(Leagues::CreatedAt))
                    .col(timestamp(Leagues::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LEAGUE_USER_ID)
                    .table(Leagues::Table)
                    .col(Leagues::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_LEAGUE_USER_REMOTE_SEASON)
                    .table(Leagues::Table)
                    .col(Leagues::UserId)
                    .col(Leagues::RemoteId)
                    .col(Leagues::Season)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_LEAGUE_USER_ID)
                    .from_tbl(Leagues::Table)
                    .from_col(Leagues::UserId)
                    .to_tbl(Users::Table)
                    .to_col(Users::Id)
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
                    .name(FK_LEAGUE_USER_ID)
                    .table(Leagues::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_LEAGUE_USER_REMOTE_SEASON)
                    .table(Leagues::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_LEAGUE_USER_ID)
                    .table(Leagues::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Leagues::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Leagues {
    Table,
    Id,
    UserId,
    RemoteId,
    Name,
    Season,
    FranchiseId,
    Host,
    StarterSlots,
    SyncedAt,
    CreatedAt,
    UpdatedAt,
}
