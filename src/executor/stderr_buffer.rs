//! Bounded tail of an action's diagnostic output.
//!
//! A failing action can print a lot. Only the most recent lines (up to a line
//! and byte limit) are attached to the error shown to the user.

use std::collections::VecDeque;

/// Default maximum number of lines to keep
pub const DEFAULT_MAX_LINES: usize = 50;

/// Default maximum total bytes to keep (4KB)
pub const DEFAULT_MAX_BYTES: usize = 4 * 1024;

/// A ring buffer of output lines, newest at the back
#[derive(Debug, Clone)]
pub struct StderrBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
    max_bytes: usize,
    current_bytes: usize,
}

impl Default for StderrBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES, DEFAULT_MAX_BYTES)
    }
}

impl StderrBuffer {
    pub fn new(max_lines: usize, max_bytes: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines.min(1024)),
            max_lines,
            max_bytes,
            current_bytes: 0,
        }
    }

    /// Buffer the tail of raw process output.
    pub fn from_output(bytes: &[u8]) -> Self {
        let mut buffer = Self::default();
        buffer.extend_from_bytes(bytes);
        buffer
    }

    pub fn extend_from_bytes(&mut self, bytes: &[u8]) {
        for line in String::from_utf8_lossy(bytes).lines() {
            self.push_line(line.trim_end().to_string());
        }
    }

    /// Add a line, evicting old lines if necessary
    pub fn push_line(&mut self, line: String) {
        let line_bytes = line.len();

        while self.current_bytes + line_bytes > self.max_bytes && !self.lines.is_empty() {
            self.pop_oldest();
        }
        while self.lines.len() >= self.max_lines && !self.lines.is_empty() {
            self.pop_oldest();
        }

        self.current_bytes += line_bytes;
        self.lines.push_back(line);
    }

    fn pop_oldest(&mut self) {
        if let Some(old) = self.lines.pop_front() {
            self.current_bytes = self.current_bytes.saturating_sub(old.len());
        }
    }

    /// All buffered lines joined, without leading/trailing blank lines
    pub fn contents(&self) -> String {
        let joined = self.lines.iter().cloned().collect::<Vec<_>>().join("\n");
        joined.trim().to_string()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn byte_count(&self) -> usize {
        self.current_bytes
    }
}
