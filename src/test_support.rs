//! Crate-internal helpers for unit tests: an application environment wired
//! to a mock remote host.

use std::sync::Arc;

use crate::{
    config::Config,
    mfl::{gateway::MflGateway, locks::HostLocks},
};

pub struct TestEnv {
    pub config: Config,
    pub gateway: MflGateway,
    pub locks: Arc<HostLocks>,
}

/// Build a test environment whose canonical host is the mock server.
pub fn env(server_url: &str) -> TestEnv {
    let mut config = Config::new("sqlite::memory:".to_string(), server_url.to_string());
    // Keep retry backoff negligible so failure-path tests stay fast.
    config.retry_backoff_base_ms = 10;

    let gateway = MflGateway::new(&config).expect("gateway builds");

    TestEnv {
        config,
        gateway,
        locks: Arc::new(HostLocks::new()),
    }
}
