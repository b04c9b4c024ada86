// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Multi-domain DDS sample monitor
//!
//! Attaches to several DDS domains at once and prints every sample received
//! on the core-data, intelligence and messaging topics to one shared stream,
//! tagged by domain and topic.
//!
//! # Features
//!
//! - **Many domains**: one session per domain, each failing independently
//! - **Secure by default**: PKI-DH authentication and AES-GCM-GMAC payload
//!   encryption on hdds participants, credentials located by hostname
//! - **Network or in-process**: UDP multicast (RTPS) by default, intra-process
//!   transport for embedding and tests
//! - **Stable output**: byte-stable text blocks, or JSON Lines
//! - **Graceful stop**: SIGINT/SIGTERM trigger ordered teardown
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use dds_monitor::{Monitor, MonitorConfig, OutputFormat, OutputSink, ShutdownController};
//!
//! let config = MonitorConfig::builder()
//!     .domains(vec![1, 3, 4])
//!     .format(OutputFormat::Json)
//!     .build();
//!
//! let shutdown = ShutdownController::new();
//! shutdown.install_signal_handlers()?;
//!
//! let monitor = Monitor::start(config, Arc::new(OutputSink::stdout()), shutdown);
//! monitor.run_until_stopped();
//! let summary = monitor.shutdown();
//! ```

pub mod credentials;
pub mod domains;
mod drain;
mod error;
pub mod format;
mod monitor;
mod output;
mod session;
mod shutdown;
pub mod topics;
pub mod types;

pub use credentials::{local_hostname, resolve_dds_root, Credentials};
pub use domains::{parse_domains, resolve_domains, DomainId, TokenPolicy, DEFAULT_DOMAINS};
pub use drain::{MatchTracker, MatchedChange, RecordMonitor};
pub use error::{MonitorError, Result};
pub use format::{FieldValue, OutputFormat, SampleContext};
pub use monitor::{Monitor, MonitorSummary};
pub use output::{OutputSink, OutputTarget};
pub use session::{reader_qos, DomainSession, SessionSetup, TeardownReport};
pub use shutdown::ShutdownController;
pub use topics::{classify_core_data, validate_topic_name, RecordKind, TopicTable};
pub use types::{FlatCoreData, FlatIntelligence, FlatMessagingPacket, Record};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Participant name announced in every domain.
pub const DEFAULT_PARTICIPANT_NAME: &str = "DDS_Monitor_participant";

/// Main-loop poll interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 200;

/// Transport each domain participant runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// RTPS over UDP multicast, reaching publishers in other processes.
    #[default]
    Udp,
    /// Same-process delivery only.
    IntraProcess,
}

impl Transport {
    pub fn mode(self) -> hdds::TransportMode {
        match self {
            Transport::Udp => hdds::TransportMode::UdpMulticast,
            Transport::IntraProcess => hdds::TransportMode::IntraProcess,
        }
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Transport::Udp => "udp",
            Transport::IntraProcess => "intra-process",
        })
    }
}

/// Monitor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Domains to attach to, in order.
    pub domains: Vec<DomainId>,
    /// Policy the domain list was parsed with.
    pub token_policy: TokenPolicy,
    /// Sample output format.
    pub format: OutputFormat,
    /// Sample output destination.
    pub output: OutputTarget,
    #[serde(default)]
    pub transport: Transport,
    /// Credential root; discovered when unset.
    pub dds_root: Option<PathBuf>,
    /// Stop-flag poll interval of the main loop.
    pub poll_interval_ms: u64,
    pub participant_name: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            domains: DEFAULT_DOMAINS.to_vec(),
            token_policy: TokenPolicy::Lenient,
            format: OutputFormat::Text,
            output: OutputTarget::Stdout,
            transport: Transport::Udp,
            dds_root: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            participant_name: DEFAULT_PARTICIPANT_NAME.to_string(),
        }
    }
}

impl MonitorConfig {
    /// Create a new builder.
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::default()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Builder for MonitorConfig.
#[derive(Debug, Default)]
pub struct MonitorConfigBuilder {
    domains: Option<Vec<DomainId>>,
    token_policy: Option<TokenPolicy>,
    format: Option<OutputFormat>,
    output: Option<OutputTarget>,
    transport: Option<Transport>,
    dds_root: Option<PathBuf>,
    poll_interval_ms: Option<u64>,
    participant_name: Option<String>,
}

impl MonitorConfigBuilder {
    /// Set the domain list. An empty list keeps the default.
    pub fn domains(mut self, domains: Vec<DomainId>) -> Self {
        self.domains = Some(domains).filter(|d| !d.is_empty());
        self
    }

    /// Resolve the domain list from a CLI argument and an environment value.
    pub fn domain_spec(
        mut self,
        arg: Option<&str>,
        env: Option<&str>,
        policy: TokenPolicy,
    ) -> Result<Self> {
        self.domains = Some(resolve_domains(arg, env, policy)?);
        self.token_policy = Some(policy);
        Ok(self)
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Append samples to a file instead of stdout.
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(OutputTarget::File { path: path.into() });
        self
    }

    pub fn output_stdout(mut self) -> Self {
        self.output = Some(OutputTarget::Stdout);
        self
    }

    pub fn transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use `root` as credential root, skipping discovery.
    pub fn dds_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.dds_root = Some(root.into());
        self
    }

    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = Some(ms);
        self
    }

    pub fn participant_name(mut self, name: impl Into<String>) -> Self {
        self.participant_name = Some(name.into());
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MonitorConfig {
        MonitorConfig {
            domains: self.domains.unwrap_or_else(|| DEFAULT_DOMAINS.to_vec()),
            token_policy: self.token_policy.unwrap_or_default(),
            format: self.format.unwrap_or_default(),
            output: self.output.unwrap_or_default(),
            transport: self.transport.unwrap_or_default(),
            dds_root: self.dds_root,
            poll_interval_ms: self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            participant_name: self
                .participant_name
                .unwrap_or_else(|| DEFAULT_PARTICIPANT_NAME.to_string()),
        }
    }
}
