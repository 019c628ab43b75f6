//! Decoding of the `mappings` field into a per-line lookup table.
//!
//! # Format
//!
//! The `mappings` string holds one group per generated line, separated by `;`. Each group
//! holds comma-separated segments, and each segment is a [VLQ](super::vlq) run of 1, 4 or 5
//! signed deltas:
//!
//! | Field | Meaning                    | Relative to                          |
//! |-------|----------------------------|--------------------------------------|
//! | 0     | generated column           | previous segment on the same line    |
//! | 1     | index into `sources`       | previous segment anywhere in the map |
//! | 2     | original line (0-based)    | previous segment anywhere in the map |
//! | 3     | original column (0-based)  | previous segment anywhere in the map |
//! | 4     | index into `names`         | previous named segment anywhere      |
//!
//! The generated column restarts at zero on every line; the other four totals carry across
//! line boundaries. A segment with only field 0 marks generated code without an original
//! position and does not enter the table.
//!
//! # Ordering
//!
//! Segments are kept in encounter order. Producers emit them by ascending generated column,
//! and [`MappingTable::resolve`] relies on that to stop scanning early. Whether an
//! out-of-order line is tolerated is governed by
//! [`ResolverConfig::validate_segment_order`](crate::ResolverConfig).

use std::sync::Arc;

use crate::{sourcemap::vlq::VlqDecoder, Result, ResolverConfig};

/// One decoded mapping from a generated column to an original position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingSegment {
    /// 0-based column in the generated line.
    pub generated_column: u32,
    /// Entry of `sources` this segment points into, `None` if the index fell outside it.
    pub source: Option<Arc<str>>,
    /// 1-based line in the original source.
    pub original_line: u32,
    /// 1-based column in the original source.
    pub original_column: u32,
    /// Entry of `names` attached to this segment, if any.
    pub name: Option<Arc<str>>,
}

/// Running totals carried across the whole `mappings` string.
///
/// Only the generated column is per-line; it lives in [`MappingDecoder::decode_line`] so it
/// cannot leak from one line into the next.
#[derive(Debug, Default)]
struct CumulativeState {
    source_index: i64,
    original_line: i64,
    original_column: i64,
    name_index: i64,
}

/// Incremental decoder turning `mappings` groups into [`MappingSegment`]s.
pub struct MappingDecoder<'a> {
    sources: Vec<Arc<str>>,
    names: Option<Vec<Arc<str>>>,
    config: &'a ResolverConfig,
    state: CumulativeState,
    dropped: usize,
}

impl<'a> MappingDecoder<'a> {
    /// Create a decoder resolving indices against `sources` and `names`.
    pub fn new(sources: &[String], names: Option<&[String]>, config: &'a ResolverConfig) -> Self {
        MappingDecoder {
            sources: sources.iter().map(|s| Arc::from(s.as_str())).collect(),
            names: names.map(|names| names.iter().map(|n| Arc::from(n.as_str())).collect()),
            config,
            state: CumulativeState::default(),
            dropped: 0,
        }
    }

    /// Number of segments skipped so far because they could not be represented.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Decode the segments of one generated line.
    ///
    /// # Arguments
    /// * `line_index` - 0-based generated line, used in error messages
    /// * `group` - The text between two `;` separators
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidSourceMap`] only when strict validation is enabled
    /// and the line violates it.
    pub fn decode_line(&mut self, line_index: usize, group: &str) -> Result<Vec<MappingSegment>> {
        let mut segments = Vec::new();
        let mut generated_column = 0i64;
        let mut previous_column: Option<u32> = None;

        for raw in group.split(',').filter(|raw| !raw.is_empty()) {
            let mut fields = VlqDecoder::new(raw);

            generated_column = generated_column.saturating_add(fields.next().unwrap_or(0));

            let Some(source_delta) = fields.next() else {
                continue;
            };
            let line_delta = fields.next().unwrap_or(0);
            let column_delta = fields.next().unwrap_or(0);
            self.state.source_index = self.state.source_index.saturating_add(source_delta);
            self.state.original_line = self.state.original_line.saturating_add(line_delta);
            self.state.original_column = self.state.original_column.saturating_add(column_delta);

            let name_delta = fields.next();
            if let Some(delta) = name_delta {
                self.state.name_index = self.state.name_index.saturating_add(delta);
            }

            let Some(segment) = self.segment(line_index, generated_column, name_delta.is_some())?
            else {
                continue;
            };

            if let Some(previous) = previous_column {
                if segment.generated_column < previous && self.config.validate_segment_order {
                    return Err(invalid_source_map!(
                        "segments on generated line {} are not in ascending column order ({} after {})",
                        line_index + 1,
                        segment.generated_column,
                        previous
                    ));
                }
            }
            previous_column = Some(segment.generated_column);
            segments.push(segment);
        }

        Ok(segments)
    }

    fn segment(
        &mut self,
        line_index: usize,
        generated_column: i64,
        named: bool,
    ) -> Result<Option<MappingSegment>> {
        let positions = (
            u32::try_from(generated_column).ok(),
            one_based(self.state.original_line),
            one_based(self.state.original_column),
        );
        let (Some(generated_column), Some(original_line), Some(original_column)) = positions
        else {
            if self.config.validate_positions {
                return Err(invalid_source_map!(
                    "segment on generated line {} decodes to an unrepresentable position",
                    line_index + 1
                ));
            }
            self.dropped += 1;
            return Ok(None);
        };

        let source = lookup(&self.sources, self.state.source_index);
        if source.is_none() && self.config.validate_indices {
            return Err(invalid_source_map!(
                "source index {} on generated line {} is outside 'sources' ({} entries)",
                self.state.source_index,
                line_index + 1,
                self.sources.len()
            ));
        }

        let name = match (&self.names, named) {
            (Some(names), true) => {
                let name = lookup(names, self.state.name_index);
                if name.is_none() && self.config.validate_indices {
                    return Err(invalid_source_map!(
                        "name index {} on generated line {} is outside 'names' ({} entries)",
                        self.state.name_index,
                        line_index + 1,
                        names.len()
                    ));
                }
                name
            }
            _ => None,
        };

        Ok(Some(MappingSegment {
            generated_column,
            source,
            original_line,
            original_column,
            name,
        }))
    }
}

fn one_based(total: i64) -> Option<u32> {
    total.checked_add(1).and_then(|value| u32::try_from(value).ok())
}

fn lookup(entries: &[Arc<str>], index: i64) -> Option<Arc<str>> {
    usize::try_from(index)
        .ok()
        .and_then(|index| entries.get(index))
        .cloned()
}

/// Decoded `mappings`: one ordered segment list per generated line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingTable {
    lines: Vec<Vec<MappingSegment>>,
}

impl MappingTable {
    /// Build a table from the three source map fields it needs.
    ///
    /// `mappings` and `sources` are mandatory; `names` is optional and, when absent, no
    /// segment carries a name.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidSourceMap`] if `mappings` is absent or empty, if
    /// `sources` is absent, or if a strict check in `config` fails.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use jsbacktrace::{sourcemap::MappingTable, ResolverConfig};
    ///
    /// let sources = vec!["a.js".to_string()];
    /// let config = ResolverConfig::default();
    /// let table = MappingTable::build(Some("AAAA"), Some(sources.as_slice()), None, &config)?;
    /// let segment = table.resolve(1, 0).unwrap();
    /// assert_eq!(segment.generated_column, 0);
    /// assert_eq!(segment.source.as_deref(), Some("a.js"));
    /// assert_eq!((segment.original_line, segment.original_column), (1, 1));
    /// # Ok::<(), jsbacktrace::Error>(())
    /// ```
    pub fn build(
        mappings: Option<&str>,
        sources: Option<&[String]>,
        names: Option<&[String]>,
        config: &ResolverConfig,
    ) -> Result<MappingTable> {
        let mappings = match mappings {
            Some(mappings) if !mappings.is_empty() => mappings,
            _ => return Err(invalid_source_map!("missing 'mappings'")),
        };
        let Some(sources) = sources else {
            return Err(invalid_source_map!("missing 'sources'"));
        };

        let mut decoder = MappingDecoder::new(sources, names, config);
        let mut lines = Vec::new();
        for (line_index, group) in mappings.split(';').enumerate() {
            lines.push(decoder.decode_line(line_index, group)?);
        }

        let table = MappingTable { lines };
        if decoder.dropped() > 0 {
            log::warn!(
                "Dropped {} source map segments with unrepresentable positions",
                decoder.dropped()
            );
        }
        if !config.validate_segment_order {
            let unordered = table.unordered_lines();
            if unordered > 0 {
                log::warn!(
                    "{} generated lines have out-of-order segments, lookups on them may be inexact",
                    unordered
                );
            }
        }
        log::debug!(
            "Built mapping table: {} lines, {} segments",
            table.line_count(),
            table.segment_count()
        );

        Ok(table)
    }

    /// Number of generated lines, including lines without segments.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total number of segments across all lines.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    /// Segments of a 1-based generated line.
    #[must_use]
    pub fn line(&self, line: u32) -> Option<&[MappingSegment]> {
        let index = usize::try_from(line.checked_sub(1)?).ok()?;
        self.lines.get(index).map(Vec::as_slice)
    }

    /// Iterate over all lines in generated order.
    pub fn iter(&self) -> impl Iterator<Item = &[MappingSegment]> {
        self.lines.iter().map(Vec::as_slice)
    }

    fn unordered_lines(&self) -> usize {
        self.lines
            .iter()
            .filter(|segments| {
                segments
                    .windows(2)
                    .any(|pair| pair[1].generated_column < pair[0].generated_column)
            })
            .count()
    }

    /// Find the segment covering a generated position.
    ///
    /// Returns the rightmost segment whose generated column is at or before `column`. When
    /// `column` precedes every segment on the line, the first segment is returned. Lines
    /// outside the table, line `0`, and lines without segments yield `None`.
    ///
    /// # Arguments
    /// * `line` - 1-based generated line
    /// * `column` - Generated column, compared directly against the segments' columns
    #[must_use]
    pub fn resolve(&self, line: u32, column: u32) -> Option<&MappingSegment> {
        let segments = self.line(line)?;
        let (first, rest) = segments.split_first()?;

        let mut best = first;
        for segment in rest {
            if segment.generated_column > column {
                break;
            }
            best = segment;
        }
        Some(best)
    }
}
