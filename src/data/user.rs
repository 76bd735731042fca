use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

pub struct UserRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get(&self, user_id: i32) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find_by_id(user_id).one(self.db).await
    }

    pub async fn get_by_email(&self, email: &str) -> Result<Option<entity::user::Model>, DbErr> {
        entity::prelude::User::find()
            .filter(entity::user::Column::Email.eq(email))
            .one(self.db)
            .await
    }

    pub async fn create(&self, email: &str, plan: &str) -> Result<entity::user::Model, DbErr> {
        let now = Utc::now().naive_utc();
        entity::user::ActiveModel {
            email: ActiveValue::Set(email.to_string()),
            plan: ActiveValue::Set(plan.to_string()),
            bonus_mass_offers: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Persist the canonical token plus the per-host token map, stamping the
    /// refresh time.
    pub async fn store_token_bundle(
        &self,
        user_id: i32,
        remote_username: &str,
        canonical_token: &str,
        host_tokens: &HashMap<String, String>,
    ) -> Result<entity::user::Model, DbErr> {
        let encoded = serde_json::to_string(host_tokens).unwrap_or_else(|_| "{}".to_string());
        let now = Utc::now().naive_utc();

        entity::user::ActiveModel {
            id: ActiveValue::Set(user_id),
            remote_username: ActiveValue::Set(Some(remote_username.to_string())),
            canonical_token: ActiveValue::Set(Some(canonical_token.to_string())),
            host_tokens: ActiveValue::Set(Some(encoded)),
            tokens_refreshed_at: ActiveValue::Set(Some(now)),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .update(self.db)
        .await
    }

    /// Set the remaining bonus mass-offer balance (never below zero).
    pub async fn set_bonus_offers(
        &self,
        user_id: i32,
        remaining: i32,
    ) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            id: ActiveValue::Set(user_id),
            bonus_mass_offers: ActiveValue::Set(remaining.max(0)),
            updated_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .update(self.db)
        .await
    }
}
