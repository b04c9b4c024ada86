// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Monitor error type.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while configuring or running the monitor.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A domain token could not be parsed under the strict policy.
    #[error("invalid domain token '{token}': {reason}")]
    InvalidDomainToken { token: String, reason: String },

    /// Output destination could not be opened.
    #[error("cannot open output {path}: {source}")]
    OutputOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output destination failed.
    #[error("output write failed: {0}")]
    OutputWrite(#[from] std::io::Error),

    /// Termination signal handler could not be installed.
    #[error("cannot install signal handler: {0}")]
    SignalHandler(#[from] ctrlc::Error),

    /// JSON rendering failed.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Drain thread for a domain session could not be spawned.
    #[error("cannot start drain thread for domain {domain}: {source}")]
    DrainThread {
        domain: u32,
        #[source]
        source: std::io::Error,
    },

    /// Error reported by the DDS middleware.
    #[error("dds: {0}")]
    Bus(#[from] hdds::Error),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
