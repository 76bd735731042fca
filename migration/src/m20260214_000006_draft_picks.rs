use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260214_000003_franchises::Franchises;

static IDX_DRAFT_PICK_FRANCHISE_ID: &str = "idx_draft_pick_franchise_id";
static FK_DRAFT_PICK_FRANCHISE_ID: &str = "fk_draft_pick_franchise_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DraftPicks::Table)
                    .if_not_exists()
                    .col(pk_auto(DraftPicks::Id))
                    .col(integer(DraftPicks::FranchiseId))
                    .col(integer(DraftPicks::Season))
                    .col(integer(DraftPicks::Round))
                    .col(integer_null(DraftPicks::PickNumber))
                    .col(string_null(DraftPicks::OriginalFranchise))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_DRAFT_PICK_FRANCHISE_ID)
                    .table(DraftPicks::Table)
                    .col(DraftPicks::FranchiseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_DRAFT_PICK_FRANCHISE_ID)
                    .from_tbl(DraftPicks::Table)
                    .from_col(DraftPicks::FranchiseId)
                    .to_tbl(Franchises::Table)
                    .to_col(Franchises::Id)
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
                    .name(FK_DRAFT_PICK_FRANCHISE_ID)
                    .table(DraftPicks::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_DRAFT_PICK_FRANCHISE_ID)
                    .table(DraftPicks::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(DraftPicks::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum DraftPicks {
    Table,
    Id,
    FranchiseId,
    Season,
    Round,
    PickNumber,
    OriginalFranchise,
}
