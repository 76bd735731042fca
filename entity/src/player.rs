use sea_orm::entity::prelude::*;

/// League-independent player identity keyed by the remote player id.
///
/// Created as a placeholder ("Player #<id>") the first time any league
/// references an unknown id; enriched later by the catalog import.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    pub name: String,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub status: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roster_entry::Entity")]
    RosterEntry,
}

impl Related<super::roster_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RosterEntry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
