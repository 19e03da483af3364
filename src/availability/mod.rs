// Copyright 2019-2026 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

//! Retention modes and the bookkeeping that keeps a store honest about them.
//!
//! A store remembers two independent things: the last retention mode it ran
//! under (the previous-mode record, owned here) and how far pruning has
//! progressed (the checkpoint, owned by [`crate::prune`]). [`guard::check`]
//! combines both before a node is allowed to start.

pub mod guard;
mod mode;

pub use guard::{ModeCheck, RevertToArchivalError, check};
pub use mode::{PreviousModeRecord, RetentionMode};

use std::time::{Duration, SystemTime};

/// Default availability window: 30 days.
pub const DEFAULT_AVAILABILITY_WINDOW: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Reports whether a block produced at `block_time` is still inside the
/// availability window, i.e. guaranteed to be retained by pruned peers.
pub fn is_within_window(block_time: SystemTime, window: Duration) -> bool {
    match SystemTime::now().duration_since(block_time) {
        Ok(age) => age <= window,
        // block time in the future
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_boundaries() {
        let window = Duration::from_secs(60);
        let now = SystemTime::now();
        assert!(is_within_window(now, window));
        assert!(is_within_window(now + Duration::from_secs(5), window));
        assert!(is_within_window(now - Duration::from_secs(30), window));
        assert!(!is_within_window(now - Duration::from_secs(120), window));
        assert!(!is_within_window(now - Duration::from_millis(5), Duration::ZERO));
    }
}
