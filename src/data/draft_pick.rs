use std::collections::HashMap;

use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::parser::pick::PickToken;

pub struct DraftPickRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DraftPickRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_for_franchise(
        &self,
        franchise_id: i32,
    ) -> Result<Vec<entity::draft_pick::Model>, DbErr> {
        entity::prelude::DraftPick::find()
            .filter(entity::draft_pick::Column::FranchiseId.eq(franchise_id))
            .order_by_asc(entity::draft_pick::Column::Season)
            .order_by_asc(entity::draft_pick::Column::Round)
            .all(self.db)
            .await
    }

    pub async fn get_many(
        &self,
        pick_ids: &[i32],
    ) -> Result<Vec<entity::draft_pick::Model>, DbErr> {
        if pick_ids.is_empty() {
            return Ok(Vec::new());
        }
        entity::prelude::DraftPick::find()
            .filter(entity::draft_pick::Column::Id.is_in(pick_ids.to_vec()))
            .all(self.db)
            .await
    }

    /// Full-replace semantics, mirroring the roster path. Pick numbers are
    /// unknown until the draft order is set.
    pub async fn replace_for_franchise(
        &self,
        franchise_id: i32,
        picks: &[PickToken],
    ) -> Result<u32, DbErr> {
        entity::prelude::DraftPick::delete_many()
            .filter(entity::draft_pick::Column::FranchiseId.eq(franchise_id))
            .exec(self.db)
            .await?;

        if picks.is_empty() {
            return Ok(0);
        }

        let rows: Vec<entity::draft_pick::ActiveModel> = picks
            .iter()
            .map(|pick| entity::draft_pick::ActiveModel {
                franchise_id: sea_orm::ActiveValue::Set(franchise_id),
                season: sea_orm::ActiveValue::Set(pick.season),
                round: sea_orm::ActiveValue::Set(pick.round),
                pick_number: sea_orm::ActiveValue::Set(None),
                original_franchise: sea_orm::ActiveValue::Set(Some(pick.original.clone())),
                ..Default::default()
            })
            .collect();

        let inserted = rows.len() as u32;
        entity::prelude::DraftPick::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(inserted)
    }

    pub async fn counts_by_round(
        &self,
        franchise_id: i32,
    ) -> Result<HashMap<i32, u32>, DbErr> {
        let mut counts: HashMap<i32, u32> = HashMap::new();
        for pick in self.list_for_franchise(franchise_id).await? {
            *counts.entry(pick.round).or_insert(0) += 1;
        }
        Ok(counts)
    }

    pub async fn list_by_round(
        &self,
        franchise_id: i32,
        round: i32,
    ) -> Result<Vec<entity::draft_pick::Model>, DbErr> {
        entity::prelude::DraftPick::find()
            .filter(entity::draft_pick::Column::FranchiseId.eq(franchise_id))
            .filter(entity::draft_pick::Column::Round.eq(round))
            .order_by_asc(entity::draft_pick::Column::Season)
            .all(self.db)
            .await
    }
}
