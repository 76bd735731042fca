use sea_orm::entity::prelude::*;

/// One competing team inside a league.
///
/// `remote_id` is stored in the 4-character zero-padded canonical form
/// (non-numeric ids pass through unchanged).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "franchises")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub league_id: i32,
    pub remote_id: String,
    pub name: String,
    pub owner_name: Option<String>,
    /// Season record string, e.g. "3-1-1".
    pub record: Option<String>,
    pub points_for: Option<i32>,
    pub points_against: Option<i32>,
    pub standing: Option<i32>,
    /// Currently scheduled opponent franchise id.
    pub opponent_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::league::Entity",
        from = "Column::LeagueId",
        to = "super::league::Column::Id",
        on_delete = "Cascade"
    )]
    League,
    #[sea_orm(has_many = "super::roster_entry::Entity")]
    RosterEntry,
    #[sea_orm(has_many = "super::draft_pick::Entity")]
    DraftPick,
}

impl Related<super::league::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::League.def()
    }
}

impl Related<super::roster_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RosterEntry.def()
    }
}

impl Related<super::draft_pick::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DraftPick.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
