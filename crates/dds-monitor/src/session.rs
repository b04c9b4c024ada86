// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One domain's participant, subscriber, topics and readers.
//!
//! A session only exists when both its participant and its subscriber were
//! created. Topics and readers are optional: one that fails to create is
//! logged and left absent while the rest of the session keeps working.
//!
//! Each session owns a drain thread that takes samples from every present
//! reader and, on the UDP transport, watches discovery for publications
//! matching the monitored topics. Teardown stops that thread, then releases
//! readers, topics, the subscriber and the participant, in that order.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use hdds::dds::Subscriber;
use hdds::{DataReader, Participant, QoS, Topic};
use serde::Serialize;

use crate::credentials::Credentials;
use crate::domains::DomainId;
use crate::drain::{MatchTracker, RecordMonitor};
use crate::error::{MonitorError, Result};
use crate::format::OutputFormat;
use crate::output::OutputSink;
use crate::shutdown::ShutdownController;
use crate::topics::{validate_topic_name, RecordKind, TopicTable};
use crate::types::{FlatCoreData, FlatIntelligence, FlatMessagingPacket, Record};
use crate::Transport;

/// Pause between two drain passes over a session's readers.
pub const DRAIN_INTERVAL: Duration = Duration::from_millis(20);

/// Pause between two discovery snapshots used for match tracking.
const MATCH_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Inputs shared by every session of one monitor.
#[derive(Clone, Copy)]
pub struct SessionSetup<'a> {
    pub participant_name: &'a str,
    pub transport: Transport,
    /// Identity CA, certificate and key used for every participant.
    pub credentials: &'a Credentials,
    pub topics: &'a TopicTable,
    pub format: OutputFormat,
    pub sink: &'a Arc<OutputSink>,
    pub shutdown: &'a ShutdownController,
}

/// Reader QoS: reliable, transient-local, keep-all.
pub fn reader_qos() -> QoS {
    QoS::reliable().transient_local().keep_all()
}

/// Outcome of [`DomainSession::close`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub domain: DomainId,
    pub readers_deleted: usize,
    pub topics_deleted: usize,
    pub subscriber_deleted: bool,
    pub participant_deleted: bool,
    /// Steps that went wrong; teardown carried on past each of them.
    pub errors: Vec<String>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.subscriber_deleted && self.participant_deleted
    }
}

struct TopicSlot<R: Record> {
    name: String,
    topic: Option<Topic<R>>,
    reader: Option<Arc<DataReader<R>>>,
}

/// Topics and readers of one record kind, sharing one monitor.
struct KindReaders<R: Record> {
    monitor: Arc<RecordMonitor<R>>,
    slots: Vec<TopicSlot<R>>,
}

type DrainFn = Box<dyn Fn() -> u64 + Send>;

impl<R: Record> KindReaders<R> {
    fn open(
        domain: DomainId,
        participant: &Arc<Participant>,
        subscriber: &Subscriber,
        setup: &SessionSetup<'_>,
    ) -> Self {
        let monitor = Arc::new(RecordMonitor::<R>::new(
            domain,
            setup.format,
            Arc::clone(setup.sink),
            setup.shutdown.clone(),
        ));

        let slots = setup
            .topics
            .topics(R::KIND)
            .iter()
            .map(|name| {
                let topic = validate_topic_name(name)
                    .map_err(hdds::Error::InvalidState)
                    .and_then(|()| participant.topic::<R>(name))
                    .map_err(|e| {
                        tracing::warn!(domain, topic = %name, type_name = R::type_name(), error = %e, "failed to create topic")
                    })
                    .ok();
                let reader = topic.as_ref().and_then(|_| {
                    subscriber
                        .create_reader::<R>(name, reader_qos())
                        .map(Arc::new)
                        .map_err(|e| tracing::warn!(domain, topic = %name, error = %e, "failed to create reader"))
                        .ok()
                });
                TopicSlot {
                    name: name.clone(),
                    topic,
                    reader,
                }
            })
            .collect();

        Self { monitor, slots }
    }

    fn present_readers(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.reader.is_some())
            .map(|slot| slot.name.as_str())
    }

    /// One closure per present reader, for the drain thread.
    fn drain_fns(&self) -> Vec<DrainFn> {
        self.slots
            .iter()
            .filter_map(|slot| slot.reader.as_ref())
            .map(|reader| {
                let monitor = Arc::clone(&self.monitor);
                let reader = Arc::clone(reader);
                Box::new(move || monitor.drain(&reader)) as DrainFn
            })
            .collect()
    }

    fn delete_readers(&mut self, report: &mut TeardownReport) {
        for slot in &mut self.slots {
            let Some(reader) = slot.reader.take() else {
                continue;
            };
            match Arc::try_unwrap(reader) {
                Ok(reader) => {
                    drop(reader);
                    report.readers_deleted += 1;
                }
                Err(_) => report.errors.push(format!("reader '{}': still in use", slot.name)),
            }
        }
    }

    fn delete_topics(&mut self, report: &mut TeardownReport) {
        for slot in &mut self.slots {
            if slot.topic.take().is_some() {
                report.topics_deleted += 1;
            }
        }
    }
}

/// Everything opened for one domain.
pub struct DomainSession {
    domain: DomainId,
    participant: Arc<Participant>,
    subscriber: Subscriber,
    core_data: KindReaders<FlatCoreData>,
    intelligence: KindReaders<FlatIntelligence>,
    messaging: KindReaders<FlatMessagingPacket>,
    running: Arc<AtomicBool>,
    drain_thread: Option<JoinHandle<()>>,
}

impl DomainSession {
    /// Set up `domain` and start draining it.
    ///
    /// Fails when the credentials are unusable, or when the participant, the
    /// subscriber or the drain thread cannot be created. Whatever was created
    /// before the failure is released.
    pub fn open(domain: DomainId, setup: &SessionSetup<'_>) -> Result<Self> {
        let security = setup.credentials.security_config()?;
        let participant = Participant::builder(setup.participant_name)
            .with_transport(setup.transport.mode())
            .domain_id(domain)
            .with_security(security)
            .build()?;
        tracing::info!(
            domain,
            participant_id = participant.participant_id(),
            transport = %setup.transport,
            "participant created"
        );

        let subscriber = participant.create_subscriber(QoS::default())?;
        tracing::info!(domain, "subscriber created");

        let mut session = Self {
            core_data: KindReaders::open(domain, &participant, &subscriber, setup),
            intelligence: KindReaders::open(domain, &participant, &subscriber, setup),
            messaging: KindReaders::open(domain, &participant, &subscriber, setup),
            domain,
            participant,
            subscriber,
            running: Arc::new(AtomicBool::new(true)),
            drain_thread: None,
        };
        tracing::info!(
            domain,
            readers = session.present_readers().len(),
            "readers created"
        );

        session.drain_thread = Some(session.spawn_drain_thread(setup)?);
        Ok(session)
    }

    fn spawn_drain_thread(&self, setup: &SessionSetup<'_>) -> Result<JoinHandle<()>> {
        let domain = self.domain;
        let drains: Vec<DrainFn> = self
            .core_data
            .drain_fns()
            .into_iter()
            .chain(self.intelligence.drain_fns())
            .chain(self.messaging.drain_fns())
            .collect();
        let watched: Vec<String> = self.present_readers().into_iter().map(str::to_string).collect();
        let participant = (setup.transport == Transport::Udp).then(|| Arc::clone(&self.participant));
        let running = Arc::clone(&self.running);
        let shutdown = setup.shutdown.clone();

        std::thread::Builder::new()
            .name(format!("monitor-domain-{}", domain))
            .spawn(move || {
                let mut tracker = MatchTracker::new();
                let mut last_match_poll: Option<Instant> = None;
                while running.load(Ordering::Acquire) && !shutdown.is_stopping() {
                    if let Some(ref participant) = participant {
                        if last_match_poll.map_or(true, |at| at.elapsed() >= MATCH_POLL_INTERVAL) {
                            log_matched_changes(domain, participant, &watched, &mut tracker);
                            last_match_poll = Some(Instant::now());
                        }
                    }
                    for drain in &drains {
                        drain();
                    }
                    std::thread::sleep(DRAIN_INTERVAL);
                }
                tracing::debug!(domain, "drain thread stopped");
            })
            .map_err(|source| MonitorError::DrainThread { domain, source })
    }

    pub fn domain(&self) -> DomainId {
        self.domain
    }

    pub fn participant_id(&self) -> u8 {
        self.participant.participant_id()
    }

    /// Topics that have a live reader.
    pub fn present_readers(&self) -> Vec<&str> {
        self.core_data
            .present_readers()
            .chain(self.intelligence.present_readers())
            .chain(self.messaging.present_readers())
            .collect()
    }

    pub fn samples_accepted(&self, kind: RecordKind) -> u64 {
        match kind {
            RecordKind::CoreData => self.core_data.monitor.samples_accepted(),
            RecordKind::Intelligence => self.intelligence.monitor.samples_accepted(),
            RecordKind::Messaging => self.messaging.monitor.samples_accepted(),
        }
    }

    pub fn samples_discarded(&self) -> u64 {
        self.core_data.monitor.samples_discarded()
            + self.intelligence.monitor.samples_discarded()
            + self.messaging.monitor.samples_discarded()
    }

    /// Stop draining, then release readers, topics, subscriber and
    /// participant, in that order.
    ///
    /// Never panics; failed steps are collected in the report.
    pub fn close(mut self) -> TeardownReport {
        let mut report = TeardownReport {
            domain: self.domain,
            ..Default::default()
        };

        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.drain_thread.take() {
            if handle.join().is_err() {
                report.errors.push("drain thread panicked".to_string());
            }
        }

        self.core_data.delete_readers(&mut report);
        self.intelligence.delete_readers(&mut report);
        self.messaging.delete_readers(&mut report);

        self.core_data.delete_topics(&mut report);
        self.intelligence.delete_topics(&mut report);
        self.messaging.delete_topics(&mut report);

        let Self {
            domain,
            participant,
            subscriber,
            ..
        } = self;
        drop(subscriber);
        report.subscriber_deleted = true;
        drop(participant);
        report.participant_deleted = true;

        tracing::debug!(
            domain,
            readers = report.readers_deleted,
            topics = report.topics_deleted,
            errors = report.errors.len(),
            "session closed"
        );
        report
    }
}

fn log_matched_changes(
    domain: DomainId,
    participant: &Arc<Participant>,
    watched: &[String],
    tracker: &mut MatchTracker,
) {
    let discovered = match participant.discover_topics() {
        Ok(discovered) => discovered,
        Err(e) => {
            tracing::debug!(domain, error = %e, "discovery snapshot unavailable");
            return;
        }
    };
    let watched: Vec<&str> = watched.iter().map(String::as_str).collect();
    let snapshot = discovered
        .iter()
        .map(|info| (info.name.as_str(), info.publisher_count));
    for change in tracker.update(&watched, snapshot) {
        tracing::info!(
            domain,
            topic = %change.topic,
            current_count = change.current_count,
            current_count_change = change.current_count_change,
            "matched change"
        );
    }
}

impl std::fmt::Debug for DomainSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainSession")
            .field("domain", &self.domain)
            .field("readers", &self.present_readers())
            .finish()
    }
}
