use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260214_000001_users::Users;

static IDX_USAGE_COUNTER_PERIOD: &str = "idx_usage_counter_user_metric_period";
static FK_USAGE_COUNTER_USER_ID: &str = "fk_usage_counter_user_id";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UsageCounters::Table)
                    .if_not_exists()
                    .col(pk_auto(UsageCounters::Id))
                    .col(integer(UsageCounters::UserId))
                    .col(string(UsageCounters::Metric))
                    .col(string(UsageCounters::PeriodKey))
                    .col(integer(UsageCounters::Count).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_USAGE_COUNTER_PERIOD)
                    .table(UsageCounters::Table)
                    .col(UsageCounters::UserId)
                    .col(UsageCounters::Metric)
                    .col(UsageCounters::PeriodKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name(FK_USAGE_COUNTER_USER_ID)
                    .from_tbl(UsageCounters::Table)
                    .from_col(UsageCounters::UserId)
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
                    .name(FK_USAGE_COUNTER_USER_ID)
                    .table(UsageCounters::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name(IDX_USAGE_COUNTER_PERIOD)
                    .table(UsageCounters::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(UsageCounters::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UsageCounters {
    Table,
    Id,
    UserId,
    Metric,
    PeriodKey,
    Count,
}
