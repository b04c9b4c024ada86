// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! The shipped binary, fed by a publisher in another process over UDP
//! multicast, then stopped with SIGTERM.

#![cfg(unix)]

mod common;

use std::io::{BufRead, BufReader};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use common::{writer, Pki};
use dds_monitor::FlatCoreData;
use hdds::TransportMode;

const DOMAIN: u32 = 0;
const SAMPLES: usize = 5;
const WAIT: Duration = Duration::from_secs(20);

fn spawn_monitor(pki: &Pki) -> Child {
    Command::new(env!("CARGO_BIN_EXE_dds-monitor"))
        .arg(DOMAIN.to_string())
        .args(["--transport", "udp", "--dds-root"])
        .arg(pki.root())
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap()
}

fn terminate(child: &Child) {
    let pid = libc::pid_t::try_from(child.id()).unwrap();
    // SAFETY: pid names a child we spawned and have not reaped yet
    let ret = unsafe { libc::kill(pid, libc::SIGTERM) };
    assert_eq!(ret, 0);
}

#[test]
#[ignore = "requires UDP multicast, flaky in CI"]
fn test_binary_prints_samples_from_another_process() {
    let pki = Pki::new();
    let mut child = spawn_monitor(&pki);

    let stdout = child.stdout.take().unwrap();
    let (lines_tx, lines_rx) = mpsc::channel();
    let reader = thread::spawn(move || {
        for line in BufReader::new(stdout).lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    let publisher = pki.publisher(DOMAIN, TransportMode::UdpMulticast);
    let core = writer::<FlatCoreData>(&publisher, "CoreDataTopic");
    for i in 0..SAMPLES {
        core.write(&FlatCoreData {
            latitude: i as f64,
            orientation_degrees: 90,
            ..Default::default()
        })
        .unwrap();
    }

    let deadline = Instant::now() + WAIT;
    let mut lines = Vec::new();
    while lines.len() < SAMPLES * 3 && Instant::now() < deadline {
        if let Ok(line) = lines_rx.recv_timeout(Duration::from_millis(100)) {
            lines.push(line);
        }
    }

    terminate(&child);
    let status = child.wait().unwrap();
    reader.join().unwrap();
    lines.extend(lines_rx.try_iter());

    assert!(status.success(), "monitor exited with {status}");
    let headers: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| l.starts_with("Sample"))
        .collect();
    let expected: Vec<String> = (1..=SAMPLES).map(|k| format!("Sample '{k}' RECEIVED")).collect();
    assert_eq!(headers, expected, "stdout was: {lines:#?}");
    let topics: Vec<&str> = lines
        .iter()
        .map(String::as_str)
        .filter(|l| l.starts_with("[domain="))
        .collect();
    assert_eq!(topics, vec!["[domain=0] TOPIC: aircraft coredata"; SAMPLES]);
    assert!(lines.iter().any(|l| l.starts_with(" - {latitude: 4, ")));
}
