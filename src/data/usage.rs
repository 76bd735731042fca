use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

/// Daily mass-offer counter metric.
pub const METRIC_MASS_OFFER_DAY: &str = "mass_offer_day";
/// Weekly free-send flag metric (free tier).
pub const METRIC_MASS_OFFER_WEEKFREE: &str = "mass_offer_weekfree";

pub struct UsageRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UsageRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(
        &self,
        user_id: i32,
        metric: &str,
        period_key: &str,
    ) -> Result<i32, DbErr> {
        let row = self.find(user_id, metric, period_key).await?;
        Ok(row.map(|row| row.count).unwrap_or(0))
    }

    /// Increment the counter, creating the row lazily on first use.
    pub async fn increment(
        &self,
        user_id: i32,
        metric: &str,
        period_key: &str,
        by: i32,
    ) -> Result<i32, DbErr> {
        match self.find(user_id, metric, period_key).await? {
            Some(row) => {
                let next = row.count + by;
                entity::usage_counter::ActiveModel {
                    id: ActiveValue::Set(row.id),
                    count: ActiveValue::Set(next),
                    ..Default::default()
                }
                .update(self.db)
                .await?;
                Ok(next)
            }
            None => {
                self.insert(user_id, metric, period_key, by).await?;
                Ok(by)
            }
        }
    }

    /// Force a value, used for one-off flags like the weekly free send.
    pub async fn set(
        &self,
        user_id: i32,
        metric: &str,
        period_key: &str,
        value: i32,
    ) -> Result<(), DbErr> {
        match self.find(user_id, metric, period_key).await? {
            Some(row) => {
                entity::usage_counter::ActiveModel {
                    id: ActiveValue::Set(row.id),
                    count: ActiveValue::Set(value),
                    ..Default::default()
                }
                .update(self.db)
                .await?;
            }
            None => {
                self.insert(user_id, metric, period_key, value).await?;
            }
        }
        Ok(())
    }

    async fn find(
        &self,
        user_id: i32,
        metric: &str,
        period_key: &str,
    ) -> Result<Option<entity::usage_counter::Model>, DbErr> {
        entity::prelude::UsageCounter::find()
            .filter(entity::usage_counter::Column::UserId.eq(user_id))
            .filter(entity::usage_counter::Column::Metric.eq(metric))
            .filter(entity::usage_counter::Column::PeriodKey.eq(period_key))
            .one(self.db)
            .await
    }

    async fn insert(
        &self,
        user_id: i32,
        metric: &str,
        period_key: &str,
        count: i32,
    ) -> Result<entity::usage_counter::Model, DbErr> {
        entity::usage_counter::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            metric: ActiveValue::Set(metric.to_string()),
            period_key: ActiveValue::Set(period_key.to_string()),
            count: ActiveValue::Set(count),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}
