// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DDS Monitor CLI
//!
//! Print every sample received on several DDS domains.
//!
//! # Usage
//!
//! ```bash
//! # Domains 0-5 (or $MONITOR_DOMAINS)
//! dds-monitor
//!
//! # Domain 1 and domains 3 to 4, rejecting malformed tokens
//! dds-monitor 1,3-4 --strict-domains
//!
//! # JSON Lines to a file, explicit credential root
//! dds-monitor 0-2 --format json --output samples.jsonl --dds-root /opt/dds
//!
//! # Same-process delivery only (no UDP sockets)
//! dds-monitor 0 --transport intra
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dds_monitor::domains::DOMAINS_ENV;
use dds_monitor::{
    Monitor, MonitorConfig, OutputFormat, ShutdownController, TokenPolicy, Transport,
    DEFAULT_POLL_INTERVAL_MS,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "dds-monitor")]
#[command(author = "naskel.com")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Multi-domain DDS monitor - print every received sample tagged by domain and topic")]
#[command(long_about = None)]
struct Cli {
    /// Domains to monitor, e.g. "0-3,7" (default: $MONITOR_DOMAINS, then 0-5)
    domains: Option<String>,

    /// Reject malformed domain tokens instead of reading them as 0
    #[arg(long)]
    strict_domains: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Append samples to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Participant transport
    #[arg(short, long, value_enum, default_value = "udp")]
    transport: TransportArg,

    /// Credential root containing secure_dds/ (default: $DDS_ROOT, then discovery)
    #[arg(long)]
    dds_root: Option<PathBuf>,

    /// Stop-flag poll interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    poll_interval_ms: u64,

    /// Verbose mode (show hdds internals)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TransportArg {
    Udp,
    Intra,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Udp => Transport::Udp,
            TransportArg::Intra => Transport::IntraProcess,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries samples only
    let default_filter = if cli.verbose {
        "dds_monitor=debug,hdds=debug"
    } else {
        "dds_monitor=info,hdds=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let env_domains = std::env::var(DOMAINS_ENV).ok();
    let config = build_config(&cli, env_domains.as_deref())?;

    tracing::info!(
        domains = ?config.domains,
        format = ?cli.format,
        transport = %config.transport,
        "Starting DDS Monitor"
    );

    let sink = Arc::new(config.output.open().context("Failed to open sample output")?);

    let shutdown = ShutdownController::new();
    shutdown
        .install_signal_handlers()
        .context("Failed to install signal handlers")?;

    let monitor = Monitor::start(config, sink, shutdown);
    monitor.run_until_stopped();
    let summary = monitor.shutdown();

    tracing::info!(
        core_data = summary.accepted(dds_monitor::RecordKind::CoreData),
        intelligence = summary.accepted(dds_monitor::RecordKind::Intelligence),
        messaging = summary.accepted(dds_monitor::RecordKind::Messaging),
        failed_domains = ?summary.failed_domains,
        "Monitor shutdown complete"
    );

    Ok(())
}

fn build_config(cli: &Cli, env_domains: Option<&str>) -> Result<MonitorConfig> {
    let policy = if cli.strict_domains {
        TokenPolicy::Strict
    } else {
        TokenPolicy::Lenient
    };

    let mut builder = MonitorConfig::builder()
        .domain_spec(cli.domains.as_deref(), env_domains, policy)
        .context("Invalid domain specification")?
        .format(cli.format.into())
        .transport(cli.transport.into())
        .poll_interval_ms(cli.poll_interval_ms);

    if let Some(ref path) = cli.output {
        builder = builder.output_file(path.clone());
    }
    if let Some(ref root) = cli.dds_root {
        builder = builder.dds_root(root.clone());
    }

    Ok(builder.build())
}
