use sea_orm::entity::prelude::*;

/// Application account holding the linked commissioner-platform credentials.
///
/// `canonical_token` is the cookie obtained from the canonical host;
/// `host_tokens` is a JSON object mapping league-host names to their own
/// cookies. Tokens never expire client-side; staleness is only discovered
/// when the remote host rejects a call.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub remote_username: Option<String>,
    pub plan: String,
    /// Per-user override of the plan's daily mass-offer cap.
    pub mass_offer_daily_cap: Option<i32>,
    pub bonus_mass_offers: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub canonical_token: Option<String>,
    /// JSON map of league host -> session cookie.
    #[sea_orm(column_type = "Text", nullable)]
    pub host_tokens: Option<String>,
    pub tokens_refreshed_at: Option<DateTime>,
    pub founder_expires_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::league::Entity")]
    League,
    #[sea_orm(has_many = "super::usage_counter::Entity")]
    UsageCounter,
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl Related<super::usage_counter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsageCounter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
