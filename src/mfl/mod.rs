//! Remote commissioner-platform protocol: per-host HTTP clients, the shared
//! rate limiter, session management, and per-host call serialization.

pub mod client;
pub mod gateway;
pub mod locks;
pub mod rate_limit;
pub mod session;
