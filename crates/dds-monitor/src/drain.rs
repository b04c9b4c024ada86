// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-record-kind sample drain and publication match tracking.
//!
//! One [`RecordMonitor`] serves every reader of its record kind in a domain
//! session (the four core-data topics share one). Its counter is atomic, so
//! readers may drain concurrently without losing or repeating numbers.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use hdds::DataReader;

use crate::domains::DomainId;
use crate::format::{OutputFormat, SampleContext};
use crate::output::OutputSink;
use crate::shutdown::ShutdownController;
use crate::types::Record;

/// Drains readers of record type `R` into the shared sink.
pub struct RecordMonitor<R: Record> {
    domain: DomainId,
    format: OutputFormat,
    sink: Arc<OutputSink>,
    shutdown: ShutdownController,
    accepted: AtomicU64,
    discarded: AtomicU64,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordMonitor<R> {
    pub fn new(
        domain: DomainId,
        format: OutputFormat,
        sink: Arc<OutputSink>,
        shutdown: ShutdownController,
    ) -> Self {
        Self {
            domain,
            format,
            sink,
            shutdown,
            accepted: AtomicU64::new(0),
            discarded: AtomicU64::new(0),
            _record: PhantomData,
        }
    }

    pub fn domain(&self) -> DomainId {
        self.domain
    }

    /// Samples printed so far; also the number shown on the latest one.
    pub fn samples_accepted(&self) -> u64 {
        self.accepted.load(Ordering::Acquire)
    }

    /// Undecodable samples skipped so far.
    pub fn samples_discarded(&self) -> u64 {
        self.discarded.load(Ordering::Acquire)
    }

    /// Take samples from `reader` until it is empty or a stop is requested.
    ///
    /// Returns the number of samples printed by this pass. Samples still
    /// queued when the stop flag is seen are left in the reader.
    pub fn drain(&self, reader: &DataReader<R>) -> u64 {
        let mut printed = 0;
        while !self.shutdown.is_stopping() {
            match reader.take() {
                Ok(Some(sample)) => {
                    self.accept(reader.topic_name(), &sample);
                    printed += 1;
                }
                Ok(None) => break,
                // A failed decode consumes the offending payload
                Err(e @ (hdds::Error::SerializationError | hdds::Error::EndianMismatch)) => {
                    self.discarded.fetch_add(1, Ordering::AcqRel);
                    tracing::warn!(
                        domain = self.domain,
                        topic = reader.topic_name(),
                        error = %e,
                        "dropping undecodable sample"
                    );
                }
                Err(e) => {
                    tracing::debug!(domain = self.domain, error = %e, "drain stopped");
                    break;
                }
            }
        }
        printed
    }

    /// Number, render and print one sample.
    pub fn accept(&self, topic: &str, sample: &R) {
        let sequence = self.accepted.fetch_add(1, Ordering::AcqRel) + 1;
        let ctx = SampleContext {
            domain: self.domain,
            topic,
            sequence,
            received_at: Utc::now(),
        };
        let written = self
            .format
            .render(&ctx, sample)
            .and_then(|block| self.sink.write(&block));
        if let Err(e) = written {
            tracing::warn!(domain = self.domain, topic, error = %e, "failed to write sample");
        }
    }
}

/// Change in the number of remote publications matched on one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedChange {
    pub topic: String,
    pub current_count: usize,
    pub current_count_change: i64,
}

/// Publication counts of the monitored topics, fed from discovery.
#[derive(Debug, Default)]
pub struct MatchTracker {
    counts: HashMap<String, usize>,
}

impl MatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the publisher count now seen on `topic`.
    ///
    /// Returns the change when it differs from the last observation; an
    /// unseen topic starts at zero.
    pub fn observe(&mut self, topic: &str, publishers: usize) -> Option<MatchedChange> {
        let previous = self.counts.insert(topic.to_string(), publishers).unwrap_or(0);
        if previous == publishers {
            return None;
        }
        Some(MatchedChange {
            topic: topic.to_string(),
            current_count: publishers,
            current_count_change: publishers as i64 - previous as i64,
        })
    }

    /// Compare a discovery snapshot against `topics`.
    ///
    /// Topics absent from the snapshot count as having no publisher.
    pub fn update<'a>(
        &mut self,
        topics: &[&str],
        snapshot: impl IntoIterator<Item = (&'a str, usize)>,
    ) -> Vec<MatchedChange> {
        let seen: HashMap<&str, usize> = snapshot.into_iter().collect();
        topics
            .iter()
            .filter_map(|&topic| self.observe(topic, seen.get(topic).copied().unwrap_or(0)))
            .collect()
    }
}
