pub use super::draft_pick::Entity as DraftPick;
pub use super::franchise::Entity as Franchise;
pub use super::league::Entity as League;
pub use super::player::Entity as Player;
pub use super::roster_entry::Entity as RosterEntry;
pub use super::usage_counter::Entity as UsageCounter;
pub use super::user::Entity as User;
