use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use crate::parser::pick::normalize_fid;

/// Placeholder name prefix. Rows created before metadata is available get
/// `Franchise <fid>` and are upgraded once a real name shows up.
const PLACEHOLDER_PREFIX: &str = "Franchise ";

pub struct FranchiseRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> FranchiseRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, franchise_id: i32) -> Result<Option<entity::franchise::Model>, DbErr> {
        entity::prelude::Franchise::find_by_id(franchise_id)
            .one(self.db)
            .await
    }

    pub async fn list_by_league(
        &self,
        league_id: i32,
    ) -> Result<Vec<entity::franchise::Model>, DbErr> {
        entity::prelude::Franchise::find()
            .filter(entity::franchise::Column::LeagueId.eq(league_id))
            .order_by_asc(entity::franchise::Column::RemoteId)
            .all(self.db)
            .await
    }

    pub async fn find_by_remote_id(
        &self,
        league_id: i32,
        remote_id: &str,
    ) -> Result<Option<entity::franchise::Model>, DbErr> {
        entity::prelude::Franchise::find()
            .filter(entity::franchise::Column::LeagueId.eq(league_id))
            .filter(entity::franchise::Column::RemoteId.eq(normalize_fid(remote_id)))
            .one(self.db)
            .await
    }

    /// Resolve-or-create the franchise row for (league, remote id).
    ///
    /// When a name hint is available it is used on create, and upgrades an
    /// existing placeholder name opportunistically.
    pub async fn ensure(
        &self,
        league_id: i32,
        remote_id: &str,
        name_hint: Option<&str>,
    ) -> Result<entity::franchise::Model, DbErr> {
        let fid = normalize_fid(remote_id);
        let hint = name_hint.map(str::trim).filter(|name| !name.is_empty());

        if let Some(existing) = self.find_by_remote_id(league_id, &fid).await? {
            if let Some(hint) = hint {
                let placeholder = existing.name.is_empty()
                    || existing
                        .name
                        .to_lowercase()
                        .starts_with(&PLACEHOLDER_PREFIX.to_lowercase());
                if placeholder && existing.name != hint {
                    return entity::franchise::ActiveModel {
                        id: ActiveValue::Set(existing.id),
                        name: ActiveValue::Set(hint.to_string()),
                        ..Default::default()
                    }
                    .update(self.db)
                    .await;
                }
            }
            return Ok(existing);
        }

        let display_name = hint
            .map(str::to_string)
            .unwrap_or_else(|| format!("{PLACEHOLDER_PREFIX}{fid}"));

        entity::franchise::ActiveModel {
            league_id: ActiveValue::Set(league_id),
            remote_id: ActiveValue::Set(fid),
            name: ActiveValue::Set(display_name),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Update display metadata (name/owner) from a league-info payload.
    pub async fn update_meta(
        &self,
        franchise_id: i32,
        name: Option<&str>,
        owner_name: Option<&str>,
    ) -> Result<entity::franchise::Model, DbErr> {
        let mut model = entity::franchise::ActiveModel {
            id: ActiveValue::Set(franchise_id),
            ..Default::default()
        };
        if let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) {
            model.name = ActiveValue::Set(name.to_string());
        }
        if let Some(owner) = owner_name.map(str::trim).filter(|o| !o.is_empty()) {
            model.owner_name = ActiveValue::Set(Some(owner.to_string()));
        }
        model.update(self.db).await
    }

    /// Apply a standings row: record, points (rounded to ints), rank.
    pub async fn apply_standings(
        &self,
        franchise_id: i32,
        record: &str,
        points_for: f64,
        points_against: f64,
        standing: i32,
    ) -> Result<entity::franchise::Model, DbErr> {
        entity::franchise::ActiveModel {
            id: ActiveValue::Set(franchise_id),
            record: ActiveValue::Set(Some(record.to_string())),
            points_for: ActiveValue::Set(Some(points_for.round() as i32)),
            points_against: ActiveValue::Set(Some(points_against.round() as i32)),
            standing: ActiveValue::Set(Some(standing)),
            ..Default::default()
        }
        .update(self.db)
        .await
    }
}
