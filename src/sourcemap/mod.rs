//! Source Map v3 documents and their decoded lookup tables.
//!
//! A [`SourceMap`] is built once from a JSON document and afterwards answers position
//! queries through its [`MappingTable`]. Only the fields needed to map positions are
//! interpreted: `mappings`, `sources` and `names`. `version`, `file` and `sourceRoot` are
//! carried along for callers that want them; `sourceRoot` is not applied to source names,
//! and indexed maps (`sections`) are not supported.
//!
//! # Loading
//!
//! - [`SourceMap::parse`] / [`str::parse`] - from JSON text
//! - [`SourceMap::from_slice`] - from raw bytes
//! - [`SourceMap::from_file`] - from a file on disk, memory-mapped for the duration of the
//!   parse
//!
//! # Examples
//!
//! ```rust
//! use jsbacktrace::SourceMap;
//!
//! let text = r#"{"version":3,"sources":["app.ts"],"names":[],"mappings":"AAAA"}"#;
//! let map: SourceMap = text.parse()?;
//! let segment = map.table().resolve(1, 0).unwrap();
//! assert_eq!(segment.source.as_deref(), Some("app.ts"));
//! # Ok::<(), jsbacktrace::Error>(())
//! ```

pub mod mappings;
pub mod vlq;

pub use mappings::{MappingDecoder, MappingSegment, MappingTable};

use std::{fs, path::Path, str::FromStr};

use memmap2::Mmap;
use serde::Deserialize;

use crate::{
    Error::{Error, FileError},
    ResolverConfig, Result,
};

/// The raw JSON shape of a Source Map v3 document.
///
/// Every field is optional at this level so that a missing `mappings` or `sources` surfaces
/// as [`crate::Error::InvalidSourceMap`] from the table builder instead of a generic JSON
/// error. Unknown fields, including `sourcesContent`, are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapDocument {
    /// Format version, `3` for every map this crate understands.
    pub version: Option<u32>,
    /// Name of the generated file the map belongs to.
    pub file: Option<String>,
    /// Prefix for entries of `sources`; recorded but not applied.
    pub source_root: Option<String>,
    /// Original source names, referenced by index from `mappings`.
    pub sources: Option<Vec<String>>,
    /// Identifier names, referenced by index from `mappings`.
    pub names: Option<Vec<String>>,
    /// The VLQ-encoded segment data.
    pub mappings: Option<String>,
}

/// A parsed source map, ready for position lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMap {
    file: Option<String>,
    source_root: Option<String>,
    table: MappingTable,
}

impl SourceMap {
    /// Build from an already-deserialized document.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidSourceMap`] if `mappings` or `sources` is missing, or if
    /// a check enabled in `config` fails.
    pub fn from_document(document: SourceMapDocument, config: &ResolverConfig) -> Result<Self> {
        if let Some(version) = document.version.filter(|version| *version != 3) {
            log::warn!("Source map declares version {}, decoding as version 3", version);
        }

        let table = MappingTable::build(
            document.mappings.as_deref(),
            document.sources.as_deref(),
            document.names.as_deref(),
            config,
        )?;

        Ok(SourceMap {
            file: document.file,
            source_root: document.source_root,
            table,
        })
    }

    /// Parse a source map from JSON text.
    ///
    /// # Errors
    /// Returns [`crate::Error::Json`] for malformed JSON and
    /// [`crate::Error::InvalidSourceMap`] for a document that cannot be used for mapping.
    pub fn parse(text: &str, config: &ResolverConfig) -> Result<Self> {
        let document: SourceMapDocument = serde_json::from_str(text)?;
        Self::from_document(document, config)
    }

    /// Parse a source map from raw JSON bytes.
    ///
    /// # Errors
    /// Same as [`SourceMap::parse`].
    pub fn from_slice(data: &[u8], config: &ResolverConfig) -> Result<Self> {
        let document: SourceMapDocument = serde_json::from_slice(data)?;
        Self::from_document(document, config)
    }

    /// Load a source map from disk.
    ///
    /// The file is memory-mapped read-only while it is decoded; the returned map owns all of
    /// its data and does not keep the file open.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if the file cannot be opened,
    /// [`crate::Error::Error`] if it cannot be mapped, and otherwise the errors of
    /// [`SourceMap::parse`].
    pub fn from_file(path: impl AsRef<Path>, config: &ResolverConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = match fs::File::open(path) {
            Ok(file) => file,
            Err(error) => return Err(FileError(error)),
        };

        if file.metadata()?.len() == 0 {
            return Self::from_slice(&[], config);
        }

        let mmap = match unsafe { Mmap::map(&file) } {
            Ok(mmap) => mmap,
            Err(error) => return Err(Error(error.to_string())),
        };

        log::debug!("Loading source map {} ({} bytes)", path.display(), mmap.len());
        Self::from_slice(&mmap, config)
    }

    /// The decoded lookup table.
    #[must_use]
    pub fn table(&self) -> &MappingTable {
        &self.table
    }

    /// The `file` entry of the document, if present.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// The `sourceRoot` entry of the document, if present.
    #[must_use]
    pub fn source_root(&self) -> Option<&str> {
        self.source_root.as_deref()
    }
}

impl FromStr for SourceMap {
    type Err = crate::Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text, &ResolverConfig::default())
    }
}
