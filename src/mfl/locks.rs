use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Per-host async mutexes.
///
/// The commissioner platform's session cookie is not safe for concurrent use,
/// so at most one call may be in flight per host; distinct hosts proceed in
/// parallel. Workers hold the host's lock for the duration of that host's
/// unit of work.
#[derive(Default)]
pub struct HostLocks {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl HostLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or lazily create) the lock for a host.
    pub fn for_host(&self, host: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut inner = self.inner.lock().expect("host lock map poisoned");
        inner
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}
