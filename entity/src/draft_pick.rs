use sea_orm::entity::prelude::*;

/// A future draft pick owned by a franchise, fully replaced on every asset
/// sync. `original_franchise` tracks provenance through chains of trades.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "draft_picks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub franchise_id: i32,
    pub season: i32,
    pub round: i32,
    /// Null until the draft order is set.
    pub pick_number: Option<i32>,
    pub original_franchise: Option<String>,
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
}

impl Related<super::franchise::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Franchise.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
