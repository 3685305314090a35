//! Folder creation and rollback compensation configuration.

use serde::{Deserialize, Serialize};

/// Folder creation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolderConfig {
    /// Disable the deferred rollback cleanup. Set in test runs, where the
    /// test harness owns the filesystem lifecycle.
    #[serde(default)]
    pub disable_rollback_cleanup: bool,
    /// Delay before the rollback cleanup removes a just-created directory,
    /// giving the remote object time to become visible.
    #[serde(default = "default_cleanup_delay")]
    pub rollback_cleanup_delay_ms: u64,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            disable_rollback_cleanup: false,
            rollback_cleanup_delay_ms: default_cleanup_delay(),
        }
    }
}

fn default_cleanup_delay() -> u64 {
    500
}
