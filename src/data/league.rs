use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

pub struct LeagueRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LeagueRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, league_id: i32) -> Result<Option<entity::league::Model>, DbErr> {
        entity::prelude::League::find_by_id(league_id).one(self.db).await
    }

    pub async fn list_by_user_season(
        &self,
        user_id: i32,
        season: i32,
    ) -> Result<Vec<entity::league::Model>, DbErr> {
        entity::prelude::League::find()
            .filter(entity::league::Column::UserId.eq(user_id))
            .filter(entity::league::Column::Season.eq(season))
            .order_by_asc(entity::league::Column::RemoteId)
            .all(self.db)
            .await
    }

    pub async fn find_by_remote_id(
        &self,
        user_id: i32,
        remote_id: &str,
    ) -> Result<Option<entity::league::Model>, DbErr> {
        entity::prelude::League::find()
            .filter(entity::league::Column::UserId.eq(user_id))
            .filter(entity::league::Column::RemoteId.eq(remote_id))
            .one(self.db)
            .await
    }

    pub async fn create(
        &self,
        user_id: i32,
        remote_id: &str,
        name: &str,
        season: i32,
        franchise_id: Option<String>,
    ) -> Result<entity::league::Model, DbErr> {
        let now = Utc::now().naive_utc();
        entity::league::ActiveModel {
            user_id: ActiveValue::Set(user_id),
            remote_id: ActiveValue::Set(remote_id.to_string()),
            name: ActiveValue::Set(name.to_string()),
            season: ActiveValue::Set(season),
            franchise_id: ActiveValue::Set(franchise_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn update_franchise_id(
        &self,
        league_id: i32,
        franchise_id: Option<String>,
    ) -> Result<entity::league::Model, DbErr> {
        entity::league::ActiveModel {
            id: ActiveValue::Set(league_id),
            franchise_id: ActiveValue::Set(franchise_id),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn set_host(
        &self,
        league_id: i32,
        host: &str,
    ) -> Result<entity::league::Model, DbErr> {
        entity::league::ActiveModel {
            id: ActiveValue::Set(league_id),
            host: ActiveValue::Set(Some(host.to_string())),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn set_starter_slots(
        &self,
        league_id: i32,
        starter_slots: &str,
    ) -> Result<entity::league::Model, DbErr> {
        entity::league::ActiveModel {
            id: ActiveValue::Set(league_id),
            starter_slots: ActiveValue::Set(Some(starter_slots.to_string())),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    pub async fn mark_synced(
        &self,
        league_id: i32,
        at: NaiveDateTime,
    ) -> Result<entity::league::Model, DbErr> {
        entity::league::ActiveModel {
            id: ActiveValue::Set(league_id),
            synced_at: ActiveValue::Set(Some(at)),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Whether any of the user's leagues synced within the freshness window.
    pub async fn has_recent_sync(
        &self,
        user_id: i32,
        cutoff: NaiveDateTime,
    ) -> Result<bool, DbErr> {
        let found = entity::prelude::League::find()
            .filter(entity::league::Column::UserId.eq(user_id))
            .filter(entity::league::Column::SyncedAt.gte(cutoff))
            .one(self.db)
            .await?;
        Ok(found.is_some())
    }

    /// Delete a league and everything it owns, children first: some backends
    /// are deployed without cascades and complain otherwise.
    pub async fn delete_with_children(&self, league_id: i32) -> Result<(), DbErr> {
        let franchise_ids: Vec<i32> = entity::prelude::Franchise::find()
            .filter(entity::franchise::Column::LeagueId.eq(league_id))
            .all(self.db)
            .await?
            .into_iter()
            .map(|franchise| franchise.id)
            .collect();

        if !franchise_ids.is_empty() {
            entity::prelude::RosterEntry::delete_many()
                .filter(entity::roster_entry::Column::FranchiseId.is_in(franchise_ids.clone()))
                .exec(self.db)
                .await?;
            entity::prelude::DraftPick::delete_many()
                .filter(entity::draft_pick::Column::FranchiseId.is_in(franchise_ids))
                .exec(self.db)
                .await?;
        }

        entity::prelude::Franchise::delete_many()
            .filter(entity::franchise::Column::LeagueId.eq(league_id))
            .exec(self.db)
            .await?;
        entity::prelude::League::delete_by_id(league_id)
            .exec(self.db)
            .await?;

        Ok(())
    }
}
