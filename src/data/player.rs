use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

pub struct PlayerRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PlayerRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, player_id: i64) -> Result<Option<entity::player::Model>, DbErr> {
        entity::prelude::Player::find_by_id(player_id).one(self.db).await
    }

    pub async fn get_many(
        &self,
        player_ids: &[i64],
    ) -> Result<Vec<entity::player::Model>, DbErr> {
        if player_ids.is_empty() {
            return Ok(Vec::new());
        }
        entity::prelude::Player::find()
            .filter(entity::player::Column::Id.is_in(player_ids.to_vec()))
            .all(self.db)
            .await
    }

    /// Create a placeholder row for a never-seen player id; the catalog
    /// import enriches it later.
    pub async fn ensure_placeholder(
        &self,
        player_id: i64,
    ) -> Result<entity::player::Model, DbErr> {
        if let Some(player) = self.get(player_id).await? {
            return Ok(player);
        }

        entity::player::ActiveModel {
            id: ActiveValue::Set(player_id),
            name: ActiveValue::Set(format!("Player #{player_id}")),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn search_by_name(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<entity::player::Model>, DbErr> {
        entity::prelude::Player::find()
            .filter(entity::player::Column::Name.contains(query))
            .order_by_asc(entity::player::Column::Name)
            .limit(limit)
            .all(self.db)
            .await
    }
}
