use sea_orm::entity::prelude::*;

/// One user's subscription to one remote league for one season.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leagues")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    /// League identifier on the commissioner platform, e.g. "55188".
    pub remote_id: String,
    pub name: String,
    pub season: i32,
    /// The user's own franchise id inside the league, zero-padded ("0006").
    pub franchise_id: Option<String>,
    /// League host, e.g. "www43.myfantasyleague.com"; None until discovered.
    pub host: Option<String>,
    /// Starter requirements, e.g. "QB:1,RB:2-4,WR:3-5,TE:1-3".
    pub starter_slots: Option<String>,
    pub synced_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::franchise::Entity")]
    Franchise,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::franchise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Franchise.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
