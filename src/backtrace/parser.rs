//! Line scanner splitting a raw backtrace into message and frames.
//!
//! A frame line looks like
//!
//! ```text
//!     at <function> (<source>:<line>[:<column>])
//!     at <function>
//! ```
//!
//! with optional whitespace around it. `<source>` may not contain `:`, and `<line>` /
//! `<column>` are decimal digits. Anything else is not a frame.
//!
//! The scanner is a two-state machine. Until the first frame line it collects every line
//! into the error message; once a frame has been seen it stays in
//! [`ScanState::AfterFirstFrame`] for good and non-frame lines are dropped.

use std::sync::OnceLock;

use regex::Regex;

use super::{Backtrace, Frame, UNKNOWN_LOCATION};

fn frame_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*at (\S+)(?:\s+\(([^:]*):([0-9]+)(?::([0-9]+))?\))?\s*$")
            .expect("frame pattern is a valid regex")
    })
}

/// Parses a single line as a frame.
///
/// Line and column numbers too large for `u32` are left unset; the line still counts as a
/// frame.
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::backtrace::parser::parse_frame_line;
///
/// let frame = parse_frame_line("    at render (app.js:12:7)").unwrap();
/// assert_eq!(frame.function_name.as_deref(), Some("render"));
/// assert_eq!((frame.line, frame.column), (Some(12), Some(7)));
///
/// assert!(parse_frame_line("TypeError: nope").is_none());
/// ```
#[must_use]
pub fn parse_frame_line(line: &str) -> Option<Frame> {
    let captures = frame_pattern().captures(line)?;
    let number = |index| {
        captures
            .get(index)
            .and_then(|m: regex::Match<'_>| m.as_str().parse::<u32>().ok())
    };

    Some(Frame {
        function_name: Some(captures[1].to_string()),
        source: captures
            .get(2)
            .map_or_else(|| UNKNOWN_LOCATION.to_string(), |m| m.as_str().to_string()),
        line: number(3),
        column: number(4),
        mapped: None,
    })
}

/// Where the scanner is relative to the first frame line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No frame seen yet; lines feed the error message.
    BeforeFirstFrame,
    /// At least one frame seen; non-frame lines are ignored.
    AfterFirstFrame,
}

/// What the scanner did with one input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// The line was a frame.
    Frame,
    /// The line was appended to the error message.
    Message,
    /// The line was neither, because a frame had already been seen.
    Ignored,
}

/// Incremental backtrace scanner.
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::backtrace::parser::{FrameScanner, LineKind, ScanState};
///
/// let mut scanner = FrameScanner::new();
/// assert_eq!(scanner.feed_line("Error: boom"), LineKind::Message);
/// assert_eq!(scanner.feed_line("    at f (a.js:1:2)"), LineKind::Frame);
/// assert_eq!(scanner.state(), ScanState::AfterFirstFrame);
/// assert_eq!(scanner.feed_line("    at g (native)"), LineKind::Ignored);
///
/// let bt = scanner.finish("Error: boom\n    at f (a.js:1:2)\n    at g (native)");
/// assert_eq!(bt.error_message, "Error: boom");
/// assert_eq!(bt.frames.len(), 1);
/// ```
#[derive(Debug)]
pub struct FrameScanner {
    state: ScanState,
    error_message: String,
    frames: Vec<Frame>,
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScanner {
    /// Create a scanner in [`ScanState::BeforeFirstFrame`].
    #[must_use]
    pub fn new() -> Self {
        FrameScanner {
            state: ScanState::BeforeFirstFrame,
            error_message: String::new(),
            frames: Vec::new(),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Process one line (without its `\n`).
    pub fn feed_line(&mut self, line: &str) -> LineKind {
        if let Some(frame) = parse_frame_line(line) {
            self.frames.push(frame);
            self.state = ScanState::AfterFirstFrame;
            return LineKind::Frame;
        }

        match self.state {
            ScanState::BeforeFirstFrame => {
                self.error_message.push_str(line);
                LineKind::Message
            }
            ScanState::AfterFirstFrame => LineKind::Ignored,
        }
    }

    /// Finish scanning and produce the backtrace; `raw` is stored trimmed.
    #[must_use]
    pub fn finish(self, raw: &str) -> Backtrace {
        Backtrace {
            error_message: self.error_message.trim().to_string(),
            frames: self.frames,
            raw: raw.trim().to_string(),
        }
    }
}

/// Split a raw backtrace into its error message and frames.
///
/// Lines before the first frame are concatenated without separators to form the message.
/// Input without any frame line yields no frames and the whole (trimmed) text as message.
#[must_use]
pub fn parse(raw: &str) -> Backtrace {
    let mut scanner = FrameScanner::new();
    for line in raw.split('\n') {
        scanner.feed_line(line);
    }
    scanner.finish(raw)
}
