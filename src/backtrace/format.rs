//! Human-readable rendering of a [`Backtrace`].
//!
//! ```text
//! TypeError: x is undefined:
//!   at foo (bundle.js:10:5) -> handler (src/app.ts:4:2)
//!   at bar (bundle.js:12:1) -> src/app.ts:9:1
//!   at <anonymous> (unknown location)
//! ```
//!
//! The mapped part names the original function only when the source map recorded one.

use std::fmt::Write;

use super::{Backtrace, Frame, ResolvedLocation};

const UNKNOWN: &str = "<unknown>";

/// Render `backtrace` in the fixed layout shown in the module docs.
///
/// The output is right-trimmed, and a trailing `:` is removed, so a backtrace without frames
/// renders as its bare error message.
#[must_use]
pub fn format(backtrace: &Backtrace) -> String {
    let mut out = String::with_capacity(backtrace.raw.len() + 64);
    out.push_str(&backtrace.error_message);
    out.push(':');

    for frame in &backtrace.frames {
        out.push('\n');
        write_frame(&mut out, frame);
    }

    out.truncate(out.trim_end().len());
    if out.ends_with(':') {
        out.pop();
    }
    out
}

fn write_frame(out: &mut String, frame: &Frame) {
    let _ = write!(
        out,
        "  at {} ({}",
        frame.function_name.as_deref().unwrap_or(UNKNOWN),
        frame.source
    );
    if let Some(line) = frame.line {
        let _ = write!(out, ":{}", line);
    }
    if let Some(column) = frame.column {
        let _ = write!(out, ":{}", column);
    }
    out.push(')');

    if let Some(mapped) = &frame.mapped {
        write_mapped(out, mapped);
    }
}

fn write_mapped(out: &mut String, mapped: &ResolvedLocation) {
    let name = mapped.name.as_deref().filter(|name| !name.is_empty());

    out.push_str(" -> ");
    if let Some(name) = name {
        let _ = write!(out, "{} (", name);
    }
    let _ = write!(
        out,
        "{}:{}:{}",
        mapped.source.as_deref().unwrap_or(UNKNOWN),
        mapped.line,
        mapped.column
    );
    if name.is_some() {
        out.push(')');
    }
}
