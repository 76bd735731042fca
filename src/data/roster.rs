use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, JoinType, QueryFilter, QuerySelect,
    RelationTrait,
};

pub struct RosterRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RosterRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_for_franchise(
        &self,
        franchise_id: i32,
    ) -> Result<Vec<entity::roster_entry::Model>, DbErr> {
        entity::prelude::RosterEntry::find()
            .filter(entity::roster_entry::Column::FranchiseId.eq(franchise_id))
            .all(self.db)
            .await
    }

    /// Full-replace semantics: delete every row the franchise owns, then
    /// insert the fresh snapshot. Remote payloads are always full snapshots,
    /// so there is no diffing.
    pub async fn replace_for_franchise(
        &self,
        franchise_id: i32,
        player_ids: &[i64],
    ) -> Result<u32, DbErr> {
        entity::prelude::RosterEntry::delete_many()
            .filter(entity::roster_entry::Column::FranchiseId.eq(franchise_id))
            .exec(self.db)
            .await?;

        if player_ids.is_empty() {
            return Ok(0);
        }

        let rows: Vec<entity::roster_entry::ActiveModel> = player_ids
            .iter()
            .map(|player_id| entity::roster_entry::ActiveModel {
                franchise_id: sea_orm::ActiveValue::Set(franchise_id),
                player_id: sea_orm::ActiveValue::Set(*player_id),
                is_starter: sea_orm::ActiveValue::Set(false),
                ..Default::default()
            })
            .collect();

        let inserted = rows.len() as u32;
        entity::prelude::RosterEntry::insert_many(rows)
            .exec(self.db)
            .await?;

        Ok(inserted)
    }

    pub async fn is_rostered(&self, franchise_id: i32, player_id: i64) -> Result<bool, DbErr> {
        let found = entity::prelude::RosterEntry::find()
            .filter(entity::roster_entry::Column::FranchiseId.eq(franchise_id))
            .filter(entity::roster_entry::Column::PlayerId.eq(player_id))
            .one(self.db)
            .await?;
        Ok(found.is_some())
    }

    /// The franchise currently rostering a player within a league, if any.
    pub async fn owner_of_player(
        &self,
        league_id: i32,
        player_id: i64,
    ) -> Result<Option<entity::franchise::Model>, DbErr> {
        entity::prelude::Franchise::find()
            .filter(entity::franchise::Column::LeagueId.eq(league_id))
            .join(
                JoinType::InnerJoin,
                entity::franchise::Relation::RosterEntry.def(),
            )
            .filter(entity::roster_entry::Column::PlayerId.eq(player_id))
            .one(self.db)
            .await
    }
}
