/*
[INPUT]:  Coordinator, UI settings, tracing output
[OUTPUT]: Ratatui Kanban board, list, stats and log views; in-memory log sink
[POS]:    TUI module for the devflow binary
[UPDATE]: When changing TUI layout, keybindings, or log capture
[UPDATE]: 2026-10-16 Split runtime, events and terminal guard out of the module root
*/

mod app;
mod events;
mod runtime;
mod terminal;
mod ui;

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

pub use runtime::run_tui;

pub(crate) const LOG_BUFFER_CAPACITY: usize = 2000;

pub type LogBufferHandle = Arc<StdMutex<LogBuffer>>;

/// Ring of the most recent log lines shown on the Logs tab.
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            capacity,
        }
    }

    pub fn handle(capacity: usize) -> LogBufferHandle {
        Arc::new(StdMutex::new(Self::new(capacity)))
    }

    pub fn push_line(&mut self, line: String) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    /// The last `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let start = self.lines.len().saturating_sub(count);
        self.lines.iter().skip(start).cloned().collect()
    }
}

#[derive(Clone)]
pub struct LogWriterFactory {
    buffer: LogBufferHandle,
}

impl LogWriterFactory {
    pub fn new(buffer: LogBufferHandle) -> Self {
        Self { buffer }
    }
}

pub struct LogWriter {
    buffer: LogBufferHandle,
    partial: String,
}

impl LogWriter {
    fn push(&self, line: String) {
        let mut guard = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        guard.push_line(line);
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let chunk = String::from_utf8_lossy(buf);
        self.partial.push_str(&chunk);
        while let Some(pos) = self.partial.find('\n') {
            let line = self.partial[..pos].trim_end_matches('\r').to_string();
            self.partial = self.partial[pos + 1..].to_string();
            self.push(line);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.partial.is_empty() {
            let line = std::mem::take(&mut self.partial);
            self.push(line);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buffer: self.buffer.clone(),
            partial: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_keeps_the_newest_lines() {
        let mut buffer = LogBuffer::new(2);
        buffer.push_line("one".into());
        buffer.push_line("two".into());
        buffer.push_line("three".into());
        assert_eq!(buffer.tail(5), vec!["two", "three"]);
        assert_eq!(buffer.tail(1), vec!["three"]);
    }

    #[test]
    fn zero_capacity_drops_everything() {
        let mut buffer = LogBuffer::new(0);
        buffer.push_line("ignored".into());
        assert!(buffer.tail(5).is_empty());
    }

    #[test]
    fn writer_splits_lines_and_flushes_the_rest() {
        let handle = LogBuffer::handle(10);
        let factory = LogWriterFactory::new(handle.clone());
        {
            let mut writer = factory.make_writer();
            writer.write_all(b"first\r\nsecond\npart").unwrap();
            writer.write_all(b"ial").unwrap();
        }
        let lines = handle.lock().unwrap().tail(10);
        assert_eq!(lines, vec!["first", "second", "partial"]);
    }
}
