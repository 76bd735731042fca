use sea_orm_migration::{prelude::*, schema::*};

use crate::{m20260214_000003_franchises::Franchises, m20260214_000004_players::Players};

static IDX_ROSTER_ENTRY_FRANCHISE_ID: &str = "idx_roster_entry_franchise_id";
static IDX_ROSTER_ENTRY_PLAYER_ID: &str = "idx_roster_entry_player_id";
static FK_ROSTER_ENTRY_FRANCHISE_ID: &str = "fk_roster_entry_franchise_id";
static FK_ROSTER_ENTRY_PLAYER_ID: &str = "fk_roster_entry_player_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RosterEntries::Table)
                    .if_not_exists()
                    .col(pk_auto(RosterEntries::Id))
                    .col(integer(RosterEntries::FranchiseId))
                    .col(big_integer(RosterEntries::PlayerId))
                    .col(boolean(RosterEntries::IsStarter).default(false))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ROSTER_ENTRY_FRANCHISE_ID)
                    .table(RosterEntries::Table)
                    .col(RosterEntries::FranchiseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_ROSTER_ENTRY_PLAYER_ID)
                    .table(RosterEntries::Table)
                    .col(RosterEntries::PlayerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ROSTER_ENTRY_FRANCHISE_ID)
                    .from_tbl(RosterEntries::Table)
                    .from_col(RosterEntries::FranchiseId)
                    .to_tbl(Franchises::Table)
                    .to_col(Franchises::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_ROSTER_ENTRY_PLAYER_ID)
                    .from_tbl(RosterEntries::Table)
                    .from_col(RosterEntries::PlayerId)
                    .to_tbl(Players::Table)
                    .to_col(Players::Id)
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
                    .name(FK_ROSTER_ENTRY_PLAYER_ID)
                    .table(RosterEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_foreign_key(
                ForeignKey::drop()
                    .name(FK_ROSTER_ENTRY_FRANCHISE_ID)
                    .table(RosterEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ROSTER_ENTRY_PLAYER_ID)
                    .table(RosterEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_ROSTER_ENTRY_FRANCHISE_ID)
                    .table(RosterEntries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(RosterEntries::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum RosterEntries {
    Table,
    Id,
    FranchiseId,
    PlayerId,
    IsStarter,
}
