//! Tracks metadata for a loading/rendering session.

use crate::log;

/// Metadata for a loading/rendering session.
///
/// Every public entry point creates a fresh `Session` and hands it down to the
/// render tree and canvas it creates, so that they can decide whether to log.
/// Nothing in a session is shared between calls.
#[derive(Clone, Debug)]
pub struct Session {
    log_enabled: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            log_enabled: log::log_enabled(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session that ignores `SVG_RENDER_LOG` and logs only if `enabled`.
    pub fn new_with_log(enabled: bool) -> Self {
        Self {
            log_enabled: enabled,
        }
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }
}
