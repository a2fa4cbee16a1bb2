use std::sync::{Arc, PoisonError, RwLock};

use crate::ViewConfig;

/// View configuration shared between the engines and their host.
///
/// Clones refer to the same configuration, so switching to offline mode in
/// one place is seen everywhere.
#[derive(Debug, Clone)]
pub struct SharedConfig {
    inner: Arc<RwLock<ViewConfig>>,
}

impl SharedConfig {
    #[must_use]
    pub fn new(config: ViewConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    /// Copy of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> ViewConfig {
        self.read(Clone::clone)
    }

    pub fn read<R>(&self, f: impl FnOnce(&ViewConfig) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.read(ViewConfig::is_offline)
    }

    pub fn set_offline(&self, offline: bool) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.set_offline(offline);
    }
}

impl From<ViewConfig> for SharedConfig {
    fn from(config: ViewConfig) -> Self {
        Self::new(config)
    }
}
