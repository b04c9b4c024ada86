// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide stop flag.
//!
//! The flag moves once from running to stopping. Drain loops check it once
//! per sample, the main loop polls it between sleeps. Setting it takes no
//! lock, so it is safe from the signal-handling thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

/// Cloneable handle to the stop flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownController {
    stop: Arc<AtomicBool>,
}

impl ShutdownController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route SIGINT and SIGTERM to [`request_stop`](Self::request_stop).
    ///
    /// Can be installed once per process.
    pub fn install_signal_handlers(&self) -> Result<()> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            if handle.request_stop() {
                tracing::info!("Termination signal received, shutting down");
            }
        })?;
        Ok(())
    }

    /// Set the flag. Returns `true` only for the call that flipped it.
    pub fn request_stop(&self) -> bool {
        !self.stop.swap(true, Ordering::AcqRel)
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Block until the flag is set, checking every `poll`.
    pub fn wait_for_stop(&self, poll: Duration) {
        while !self.is_stopping() {
            std::thread::sleep(poll);
        }
    }
}
