//! Process-wide initialization guard
//!
//! Lifecycle: unclaimed at page load, claimed by the first call to the
//! entry point, never reset. The entry point reads it before wiring any
//! global listener, so listeners are installed exactly once no matter how
//! many times initialization is requested.

use std::sync::atomic::{AtomicBool, Ordering};

/// One-shot flag guarding listener wiring
#[derive(Debug)]
pub struct InitFlag {
    claimed: AtomicBool,
}

impl InitFlag {
    pub const fn new() -> Self {
        Self {
            claimed: AtomicBool::new(false),
        }
    }

    /// Returns true exactly once: for the caller that should do the wiring
    pub fn claim(&self) -> bool {
        !self.claimed.swap(true, Ordering::AcqRel)
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }
}

impl Default for InitFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// The page's flag
pub static HEADER_INIT: InitFlag = InitFlag::new();
