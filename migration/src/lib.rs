pub use sea_orm_migration::prelude::*;

mod m20260214_000001_users;
mod m20260214_000002_leagues;
mod m20260214_000003_franchises;
mod m20260214_000004_players;
mod m20260214_000005_roster_entries;
mod m20260214_000006_draft_picks;
mod m20260214_000007_usage_counters;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260214_000001_users::Migration),
            Box::new(m20260214_000002_leagues::Migration),
            Box::new(m20260214_000003_franchises::Migration),
            Box::new(m20260214_000004_players::Migration),
            Box::new(m20260214_000005_roster_entries::Migration),
            Box::new(m20260214_000006_draft_picks::Migration),
            Box::new(m20260214_000007_usage_counters::Migration),
        ]
    }
}
