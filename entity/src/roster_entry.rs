use sea_orm::entity::prelude::*;

/// Franchise/player membership, fully replaced on every asset sync.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "roster_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub franchise_id: i32,
    pub player_id: i64,
    pub is_starter: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::franchise::Entity",
        from = "Column::FranchiseId",
        to = "super::franchise::Column::Id",
        on_delete = "Cascade"
    )]
    Franchise,
    #[sea_orm(
        belongs_to = "super::player::Entity",
        from = "Column::PlayerId",
        to = "super::player::Column::Id",
        on_delete = "Cascade"
    )]
    Player,
}

impl Related<super::franchise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Franchise.def()
    }
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Player.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
