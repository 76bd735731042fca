//! Repositories: thin sea-orm query layers, one per aggregate. Services own
//! all cross-aggregate logic; repositories only read and write rows.

pub mod draft_pick;
pub mod franchise;
pub mod league;
pub mod player;
pub mod roster;
pub mod usage;
pub mod user;
