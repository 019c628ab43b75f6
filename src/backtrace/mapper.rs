//! Attaching original-source positions to frames.

use crate::sourcemap::{MappingSegment, MappingTable};

use super::{Frame, ResolvedLocation};

impl From<&MappingSegment> for ResolvedLocation {
    fn from(segment: &MappingSegment) -> Self {
        ResolvedLocation {
            source: segment.source.as_deref().map(str::to_string),
            line: segment.original_line,
            column: segment.original_column,
            name: segment.name.as_deref().map(str::to_string),
        }
    }
}

/// Resolve every frame against `table`.
///
/// Frames lacking a line or column, or whose position the table does not cover, come back
/// with `mapped` unset. A `mapped` value already present on the input is replaced.
#[must_use]
pub fn map(table: &MappingTable, frames: Vec<Frame>) -> Vec<Frame> {
    frames
        .into_iter()
        .map(|mut frame| {
            frame.mapped = frame
                .position()
                .and_then(|(line, column)| table.resolve(line, column))
                .map(ResolvedLocation::from);
            frame
        })
        .collect()
}
