// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared sample output: stdout or a file.
//!
//! One sink is shared by every drain thread of every domain. Each call to
//! [`OutputSink::write`] emits a whole block under one lock, so concurrent
//! multi-line samples never interleave. Formatting happens before the lock.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, Result};

/// Output destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputTarget {
    /// Write to stdout.
    #[default]
    Stdout,
    /// Append to a file, creating parent directories as needed.
    File { path: PathBuf },
}

impl OutputTarget {
    pub fn open(&self) -> Result<OutputSink> {
        match self {
            OutputTarget::Stdout => Ok(OutputSink::stdout()),
            OutputTarget::File { path } => OutputSink::file(path),
        }
    }
}

/// Line-oriented sink guarded by one mutex.
pub struct OutputSink {
    writer: Mutex<Box<dyn Write + Send>>,
    lines: AtomicU64,
}

impl OutputSink {
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Open `path` for appending.
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let open = || -> io::Result<std::fs::File> {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            OpenOptions::new().create(true).append(true).open(path)
        };
        let file = open().map_err(|source| MonitorError::OutputOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(Box::new(BufWriter::new(file))))
    }

    /// Wrap any writer.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self::new(Box::new(writer))
    }

    fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            lines: AtomicU64::new(0),
        }
    }

    /// Write `block` followed by a newline as one unit, then flush so the
    /// stream can be tailed live.
    pub fn write(&self, block: &str) -> Result<()> {
        let line_count = block.matches('\n').count() as u64 + 1;
        {
            let mut writer = self.writer.lock();
            writer.write_all(block.as_bytes())?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        self.lines.fetch_add(line_count, Ordering::Relaxed);
        Ok(())
    }

    /// Lines emitted so far (a text sample counts three).
    pub fn lines_written(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("lines_written", &self.lines_written())
            .finish()
    }
}
