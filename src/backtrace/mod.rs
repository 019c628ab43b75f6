//! Structured backtraces recovered from engine-formatted stack dumps.
//!
//! Embedded script engines such as QuickJS only expose a call stack as the `stack` string
//! of an error object:
//!
//! ```text
//! TypeError: x is undefined
//!     at foo (bundle.js:10:5)
//!     at <anonymous> (bundle.js:42:1)
//!     at main (native)
//! ```
//!
//! This module splits such text into an error message and [`Frame`]s ([`parser`]), attaches
//! original-source positions from a source map ([`mapper`]), and renders the result back
//! into a fixed human-readable layout ([`format`]).
//!
//! # Examples
//!
//! ```rust
//! use jsbacktrace::Backtrace;
//!
//! let bt = Backtrace::parse("TypeError: x is undefined\n    at foo (bar.js:10:5)\n");
//! assert_eq!(bt.error_message, "TypeError: x is undefined");
//! assert_eq!(bt.frames[0].function_name.as_deref(), Some("foo"));
//! assert_eq!(bt.to_string(), "TypeError: x is undefined:\n  at foo (bar.js:10:5)");
//! ```

pub mod format;
pub mod mapper;
pub mod parser;

use serde::{Deserialize, Serialize};

use crate::{sourcemap::SourceMap, Result};

/// Placeholder `source` for frames whose line carried no parenthesized location.
pub const UNKNOWN_LOCATION: &str = "unknown location";

/// Original-source position attached to a frame by the source map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    /// Original source file, absent if the segment's source index was out of range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// 1-based original line.
    pub line: u32,
    /// 1-based original column.
    pub column: u32,
    /// Original identifier name, if the segment carried one.
    #[serde(
        default,
        rename = "functionName",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,
}

/// One call-stack entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Function name as printed by the engine.
    pub function_name: Option<String>,
    /// Generated source file or URL, [`UNKNOWN_LOCATION`] when the engine gave none.
    pub source: String,
    /// 1-based generated line.
    pub line: Option<u32>,
    /// 1-based generated column.
    pub column: Option<u32>,
    /// Original position, set by [`mapper::map`] when the source map covers this frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped: Option<ResolvedLocation>,
}

impl Frame {
    /// Generated `(line, column)` if the engine reported both.
    #[must_use]
    pub fn position(&self) -> Option<(u32, u32)> {
        Some((self.line?, self.column?))
    }
}

/// A backtrace split into its error message and frames.
///
/// Deserializing accepts the JSON report written by [`Backtrace::to_json`]; its `pretty`
/// field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backtrace {
    /// Text preceding the first frame line, trimmed.
    pub error_message: String,
    /// Frames in the order they appear in the input.
    #[serde(rename = "trace")]
    pub frames: Vec<Frame>,
    /// The whole input, trimmed.
    pub raw: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BacktraceReport<'a> {
    error_message: &'a str,
    trace: &'a [Frame],
    raw: &'a str,
    pretty: String,
}

impl Backtrace {
    /// Split `raw` into an error message and frames. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Backtrace {
        parser::parse(raw)
    }

    /// Attach original positions from `map` to every frame it covers.
    ///
    /// Frames that cannot be resolved keep `mapped` unset.
    pub fn resolve_with(&mut self, map: &SourceMap) {
        let frames = std::mem::take(&mut self.frames);
        self.frames = mapper::map(map.table(), frames);
    }

    /// Render the fixed human-readable layout, see [`format::format`].
    #[must_use]
    pub fn pretty(&self) -> String {
        format::format(self)
    }

    /// Serialize as the JSON report `{ errorMessage, trace, raw, pretty }`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        let report = BacktraceReport {
            error_message: &self.error_message,
            trace: &self.frames,
            raw: &self.raw,
            pretty: self.pretty(),
        };
        Ok(serde_json::to_string(&report)?)
    }
}

impl std::fmt::Display for Backtrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pretty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let bt = Backtrace::parse("Error: boom\n    at foo (bar.js:10:5)\n    at main\n");
        let json: serde_json::Value = serde_json::from_str(&bt.to_json().unwrap()).unwrap();

        assert_eq!(json["errorMessage"], "Error: boom");
        assert_eq!(json["raw"], "Error: boom\n    at foo (bar.js:10:5)\n    at main");
        assert_eq!(json["pretty"], bt.pretty());

        let trace = json["trace"].as_array().unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace[0]["functionName"], "foo");
        assert_eq!(trace[0]["source"], "bar.js");
        assert_eq!(trace[0]["line"], 10);
        assert_eq!(trace[0]["column"], 5);
        assert!(trace[0].get("mapped").is_none());

        assert_eq!(trace[1]["source"], UNKNOWN_LOCATION);
        assert!(trace[1]["line"].is_null());
        assert!(trace[1]["column"].is_null());
    }

    #[test]
    fn mapped_json_shape() {
        let mut frame = Frame {
            function_name: Some("f".to_string()),
            source: "bundle.js".to_string(),
            line: Some(1),
            column: Some(1),
            mapped: Some(ResolvedLocation {
                source: Some("app.ts".to_string()),
                line: 4,
                column: 2,
                name: Some("handler".to_string()),
            }),
        };

        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["mapped"]["source"], "app.ts");
        assert_eq!(json["mapped"]["line"], 4);
        assert_eq!(json["mapped"]["column"], 2);
        assert_eq!(json["mapped"]["functionName"], "handler");

        frame.mapped.as_mut().unwrap().name = None;
        let json = serde_json::to_value(&frame).unwrap();
        assert!(json["mapped"].get("functionName").is_none());
    }

    #[test]
    fn frame_position() {
        let bt = Backtrace::parse("    at a (x.js:3:4)\n");
        assert_eq!(bt.frames[0].position(), Some((3, 4)));

        let bt = Backtrace::parse("    at a (x.js:3)\n");
        assert_eq!(bt.frames[0].position(), None);
    }

    #[test]
    fn json_report_reads_back() {
        let mut bt = Backtrace::parse("Error: boom\n    at foo (bar.js:10:5)\n    at main\n");
        bt.frames[0].mapped = Some(ResolvedLocation {
            source: Some("app.ts".to_string()),
            line: 4,
            column: 2,
            name: None,
        });

        let report = bt.to_json().unwrap();
        let read_back: Backtrace = serde_json::from_str(&report).unwrap();
        assert_eq!(read_back, bt);
        assert_eq!(read_back.pretty(), bt.pretty());
    }
}
