pub mod prelude;

pub mod draft_pick;
pub mod franchise;
pub mod league;
pub mod player;
pub mod roster_entry;
pub mod usage_counter;
pub mod user;
