pub mod cache;
pub mod entitlement;
pub mod live;
pub mod sync;
pub mod trade;
pub mod trades_feed;
