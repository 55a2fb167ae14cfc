//! Output sink for extracted text
//!
//! Holds the decoded text of one extraction call plus its advisory log.
//! - Growable by default; a capacity limit turns on bounded mode where
//!   the output is cut at the limit and every later write is dropped, so
//!   the text is always a prefix of the full extraction
//! - A caller-owned `String` can be bound so its allocation is reused,
//!   and handed back with `take_buffer`
//! - Log messages are joined by a configurable separator and mirrored to
//!   the `log` facade at debug level

use thiserror::Error;

/// Errors raised while preparing the output buffer
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("unable to allocate {requested} bytes for extracted text")]
    Allocation { requested: usize },
    #[error("output needs at least {requested} bytes but the buffer is limited to {limit}")]
    InsufficientCapacity { requested: usize, limit: usize },
}

/// Text buffer and diagnostic log for one extractor
#[derive(Debug)]
pub struct TextSink {
    buffer: String,
    capacity_limit: Option<usize>,
    /// Bytes refused since the limit was reached
    dropped: usize,
    overflowed: bool,
    log: String,
    log_separator: String,
}

impl Default for TextSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSink {
    pub fn new() -> Self {
        TextSink {
            buffer: String::new(),
            capacity_limit: None,
            dropped: 0,
            overflowed: false,
            log: String::new(),
            log_separator: "\n".to_string(),
        }
    }

    /// Reuse a caller-owned allocation as the output buffer
    ///
    /// The contents are discarded; only the capacity is kept.
    pub fn bind_buffer(&mut self, mut buffer: String) {
        buffer.clear();
        self.buffer = buffer;
    }

    /// Hand the output buffer (and its allocation) back to the caller
    pub fn take_buffer(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    /// Limit the output to `limit` bytes, or lift the limit with `None`
    pub fn set_capacity_limit(&mut self, limit: Option<usize>) {
        self.capacity_limit = limit;
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity_limit
    }

    /// Clear the buffer and make room for `capacity` bytes
    ///
    /// In bounded mode the reservation is capped at the limit; the input size
    /// is only an estimate of the output, so it never causes a refusal.
    pub fn allocate(&mut self, capacity: usize) -> Result<(), SinkError> {
        self.clear();
        let requested = self.capacity_limit.map_or(capacity, |limit| capacity.min(limit));
        self.buffer
            .try_reserve(requested)
            .map_err(|_| SinkError::Allocation { requested })
    }

    /// Bytes of `additional` that can still be written
    #[inline]
    fn room(&mut self, additional: usize) -> usize {
        if self.overflowed {
            self.dropped += additional;
            return 0;
        }
        match self.capacity_limit {
            Some(limit) if self.buffer.len() + additional > limit => {
                let room = limit.saturating_sub(self.buffer.len());
                self.overflowed = true;
                self.dropped += additional - room;
                room
            }
            _ => additional,
        }
    }

    /// Append one character. NUL is never written.
    #[inline]
    pub fn push(&mut self, c: char) {
        debug_assert!(c != '\0', "NUL pushed into text sink");
        if c == '\0' {
            return;
        }
        let len = c.len_utf8();
        let room = self.room(len);
        if room == len {
            self.buffer.push(c);
        } else {
            self.dropped += room;
        }
    }

    /// Append a run of text, cut at the limit on a char boundary
    #[inline]
    pub fn push_str(&mut self, s: &str) {
        if s.is_empty() {
            return;
        }
        let room = self.room(s.len());
        let mut cut = room;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        self.dropped += room - cut;
        self.buffer.push_str(&s[..cut]);
    }

    /// Replace the text written since `start`
    ///
    /// The replacement is subject to the limit as if the old span had never
    /// been written.
    pub fn replace_tail(&mut self, start: usize, replacement: &str) {
        if start >= self.buffer.len() || !self.buffer.is_char_boundary(start) {
            return;
        }
        self.buffer.truncate(start);
        self.overflowed = false;
        self.dropped = 0;
        self.push_str(replacement);
    }

    /// `InsufficientCapacity` when the limit cut the output short
    pub fn check_capacity(&self) -> Result<(), SinkError> {
        match self.capacity_limit {
            Some(limit) if self.overflowed => Err(SinkError::InsufficientCapacity {
                requested: self.buffer.len() + self.dropped,
                limit,
            }),
            _ => Ok(()),
        }
    }

    /// Whether a write was dropped because of the capacity limit
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Text written since byte offset `from`
    pub fn tail(&self, from: usize) -> &str {
        self.buffer.get(from..).unwrap_or("")
    }

    pub fn last_char(&self) -> Option<char> {
        self.buffer.chars().next_back()
    }

    /// Trim trailing whitespace
    pub fn trim_end(&mut self) {
        let trimmed = self.buffer.trim_end().len();
        self.buffer.truncate(trimmed);
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.dropped = 0;
        self.overflowed = false;
    }

    // ========================================================================
    // Log
    // ========================================================================

    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Append a message; the separator only goes between messages
    pub fn log(&mut self, message: &str) {
        log::debug!("{}", message);
        if !self.log.is_empty() {
            self.log.push_str(&self.log_separator);
        }
        self.log.push_str(message);
    }

    pub fn log_text(&self) -> &str {
        &self.log
    }

    pub fn set_log_separator(&mut self, separator: &str) {
        self.log_separator = separator.to_string();
    }
}
