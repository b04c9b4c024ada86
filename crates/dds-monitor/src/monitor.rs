// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Orchestrator: opens one session per domain, idles until stopped, then
//! tears every session down.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::credentials::{local_hostname, resolve_dds_root, Credentials};
use crate::domains::DomainId;
use crate::output::OutputSink;
use crate::session::{DomainSession, SessionSetup, TeardownReport};
use crate::shutdown::ShutdownController;
use crate::topics::{RecordKind, TopicTable};
use crate::MonitorConfig;

/// Totals reported after [`Monitor::shutdown`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonitorSummary {
    /// Samples printed, per record kind, over all domains.
    pub accepted: BTreeMap<RecordKind, u64>,
    pub discarded: u64,
    pub lines_written: u64,
    pub sessions_closed: usize,
    /// Domains whose credentials, participant or subscriber were unusable.
    pub failed_domains: Vec<DomainId>,
    pub teardown_errors: Vec<String>,
}

impl MonitorSummary {
    pub fn accepted(&self, kind: RecordKind) -> u64 {
        self.accepted.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_accepted(&self) -> u64 {
        self.accepted.values().sum()
    }
}

/// Running monitor.
pub struct Monitor {
    config: MonitorConfig,
    sink: Arc<OutputSink>,
    shutdown: ShutdownController,
    sessions: Vec<DomainSession>,
    failed: Vec<DomainId>,
}

impl Monitor {
    /// Open one session per configured domain.
    ///
    /// Every configured domain is attempted in order; a domain that cannot be
    /// set up is logged and skipped. No new session is opened once a stop has
    /// been requested.
    pub fn start(config: MonitorConfig, sink: Arc<OutputSink>, shutdown: ShutdownController) -> Self {
        let root = resolve_dds_root(config.dds_root.as_deref());
        let host = local_hostname();
        let credentials = Credentials::for_host(&root, &host);
        let missing = credentials.missing();
        if !missing.is_empty() {
            tracing::warn!(
                root = %root.display(),
                host = %host,
                missing = ?missing,
                "security credentials not found"
            );
        }
        tracing::debug!(root = %root.display(), host = %host, "credential root resolved");
        let topics = TopicTable::standard();

        let mut sessions = Vec::with_capacity(config.domains.len());
        let mut failed = Vec::new();
        {
            let setup = SessionSetup {
                participant_name: &config.participant_name,
                transport: config.transport,
                credentials: &credentials,
                topics: &topics,
                format: config.format,
                sink: &sink,
                shutdown: &shutdown,
            };
            for &domain in &config.domains {
                if shutdown.is_stopping() {
                    tracing::info!(domain, "stop requested, skipping remaining domains");
                    break;
                }
                match DomainSession::open(domain, &setup) {
                    Ok(session) => sessions.push(session),
                    Err(e) => {
                        tracing::error!(domain, error = %e, "domain skipped");
                        failed.push(domain);
                    }
                }
            }
        }

        let monitor = Self {
            config,
            sink,
            shutdown,
            sessions,
            failed,
        };
        tracing::info!(domains = ?monitor.active_domains(), "waiting for data");
        monitor
    }

    /// Domains with an open session, in configuration order.
    pub fn active_domains(&self) -> Vec<DomainId> {
        self.sessions.iter().map(DomainSession::domain).collect()
    }

    pub fn failed_domains(&self) -> &[DomainId] {
        &self.failed
    }

    pub fn sessions(&self) -> &[DomainSession] {
        &self.sessions
    }

    /// Block until the stop flag is set, polling at the configured interval.
    pub fn run_until_stopped(&self) {
        self.shutdown.wait_for_stop(self.config.poll_interval());
        tracing::info!("stop requested");
    }

    /// Close every session and report totals.
    pub fn shutdown(self) -> MonitorSummary {
        let mut summary = MonitorSummary {
            failed_domains: self.failed,
            ..Default::default()
        };
        for kind in RecordKind::ALL {
            summary.accepted.insert(kind, 0);
        }

        for session in self.sessions {
            for kind in RecordKind::ALL {
                *summary.accepted.entry(kind).or_default() += session.samples_accepted(kind);
            }
            summary.discarded += session.samples_discarded();

            let report: TeardownReport = session.close();
            for error in &report.errors {
                tracing::warn!(domain = report.domain, %error, "teardown step failed");
            }
            summary
                .teardown_errors
                .extend(report.errors.into_iter().map(|e| format!("domain {}: {}", report.domain, e)));
            summary.sessions_closed += 1;
        }

        if let Err(e) = self.sink.flush() {
            tracing::warn!(error = %e, "failed to flush output");
        }
        summary.lines_written = self.sink.lines_written();

        tracing::info!(
            sessions = summary.sessions_closed,
            samples = summary.total_accepted(),
            discarded = summary.discarded,
            errors = summary.teardown_errors.len(),
            "teardown complete"
        );
        summary
    }
}

impl std::fmt::Debug for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("active_domains", &self.active_domains())
            .field("failed_domains", &self.failed)
            .finish()
    }
}
