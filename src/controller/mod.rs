//! Thin JSON handlers over the services. The real web front end lives
//! elsewhere; these endpoints are its programmatic surface.

pub mod league;
pub mod live;
pub mod offer;
pub mod session;
pub mod trades;
pub mod util;
