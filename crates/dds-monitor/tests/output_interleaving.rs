// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent writers sharing one sink never interleave inside a block.

use std::io::{self, Write};
use std::sync::{Arc, Barrier};
use std::thread;

use dds_monitor::OutputSink;
use parking_lot::Mutex;

/// Writer that records each `write` call separately and yields between
/// calls, making torn blocks likely if the sink did not hold its lock.
#[derive(Clone, Default)]
struct ChunkRecorder(Arc<Mutex<Vec<u8>>>);

impl Write for ChunkRecorder {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // Accept at most 7 bytes per call so every block needs many writes.
        let n = buf.len().min(7);
        self.0.lock().extend_from_slice(&buf[..n]);
        thread::yield_now();
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn block(writer: usize, seq: usize) -> String {
    format!(
        "[domain={w}] TOPIC: aircraft coredata\nSample '{s}' RECEIVED\n - {{writer: {w}, seq: {s}}}",
        w = writer,
        s = seq
    )
}

#[test]
fn test_concurrent_multiline_blocks_stay_contiguous() {
    const WRITERS: usize = 8;
    const BLOCKS: usize = 50;

    let recorder = ChunkRecorder::default();
    let sink = Arc::new(OutputSink::from_writer(recorder.clone()));
    let barrier = Arc::new(Barrier::new(WRITERS));

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let sink = Arc::clone(&sink);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for s in 0..BLOCKS {
                    sink.write(&block(w, s)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let output = String::from_utf8(recorder.0.lock().clone()).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), WRITERS * BLOCKS * 3);
    assert_eq!(sink.lines_written(), (WRITERS * BLOCKS * 3) as u64);

    // Every group of three lines must be exactly one intact block.
    let mut next_seq = vec![0usize; WRITERS];
    for group in lines.chunks(3) {
        let joined = group.join("\n");
        let writer: usize = group[0]
            .strip_prefix("[domain=")
            .and_then(|rest| rest.split(']').next())
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(|| panic!("torn header: {:?}", group));
        let seq = next_seq[writer];
        assert_eq!(joined, block(writer, seq), "interleaved block");
        next_seq[writer] += 1;
    }
    assert!(next_seq.iter().all(|&n| n == BLOCKS));
}
