// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
//#![deny(unsafe_code)]
// - 'sourcemap/mod.rs' uses mmap to map a source map file into memory

//! # jsbacktrace
//!
//! Resolve the textual backtraces of embedded script engines through Source Map v3
//! documents.
//!
//! Minimal JavaScript engines such as QuickJS expose a call stack only as the formatted
//! `stack` string of an error object. `jsbacktrace` recovers the structure of that string,
//! decodes the source map produced by the bundler, and maps every frame back to its
//! original file, line, column and function name.
//!
//! ## Features
//!
//! - **Lenient parsing** - Any text is accepted; non-frame lines before the first frame
//!   form the error message
//! - **Source Map v3 decoding** - Base64 VLQ `mappings` with cumulative deltas, `sources`
//!   and `names`
//! - **Nearest-segment lookup** - Rightmost mapping at or before the generated column
//! - **JSON and pretty output** - `{ errorMessage, trace, raw, pretty }` or a fixed
//!   human-readable layout
//! - **Compute-once caching** - Parsed maps shared across calls and threads, with a bounded
//!   number of entries
//!
//! ## Quick Start
//!
//! ```rust
//! let backtrace = "TypeError: x is undefined\n    at foo (bar.js:10:5)\n";
//!
//! let pretty = jsbacktrace::format(None, backtrace)?;
//! assert_eq!(pretty, "TypeError: x is undefined:\n  at foo (bar.js:10:5)");
//!
//! let json = jsbacktrace::parse(None, backtrace)?;
//! assert!(json.starts_with(r#"{"errorMessage":"TypeError: x is undefined","trace":[{"#));
//! # Ok::<(), jsbacktrace::Error>(())
//! ```
//!
//! ### With a source map
//!
//! ```rust
//! use jsbacktrace::{BacktraceResolver, ResolverConfig};
//!
//! let resolver = BacktraceResolver::new(ResolverConfig::default());
//! let map = r#"{"version":3,"sources":["app.ts"],"names":["main"],"mappings":";AAAAA"}"#;
//!
//! let bt = resolver.resolve(Some(map), "Error: boom\n    at f (bundle.js:2:1)")?;
//! let mapped = bt.frames[0].mapped.as_ref().unwrap();
//! assert_eq!(mapped.source.as_deref(), Some("app.ts"));
//! assert_eq!(mapped.name.as_deref(), Some("main"));
//! # Ok::<(), jsbacktrace::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`backtrace`] - Frame line scanning, frame mapping and pretty rendering
//! - [`sourcemap`] - Source map documents, VLQ coding and the mapping table
//! - [`cache`] - Compute-once cache of parsed source maps
//! - [`BacktraceResolver`] - The pipeline tying the pieces together
//! - [`Error`] and [`Result`] - Error handling
//!
//! ## Error Handling
//!
//! Parsing a backtrace never fails. Errors only arise from the source map:
//!
//! ```rust
//! use jsbacktrace::Error;
//!
//! match jsbacktrace::parse(Some(r#"{"sources":["a.js"]}"#), "Error: x") {
//!     Err(Error::InvalidSourceMap { message }) => println!("unusable map: {}", message),
//!     Err(e) => println!("other error: {}", e),
//!     Ok(json) => println!("{}", json),
//! }
//! ```
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade: table statistics and cache traffic at
//! `debug`, tolerated malformations at `warn`, and failures swallowed by
//! [`BacktraceResolver::render_lossy`] at `error`. Install any `log` backend to see them.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
pub mod prelude;

pub mod backtrace;
pub mod cache;
pub mod sourcemap;

mod config;
mod resolver;

/// `jsbacktrace` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

pub use backtrace::{Backtrace, Frame, ResolvedLocation};
pub use cache::SourceMapCache;
pub use config::{ResolverConfig, DEFAULT_SOURCE_MAP_CACHE_CAPACITY};
pub use error::Error;
pub use resolver::{BacktraceFormat, BacktraceResolver};
pub use sourcemap::{MappingSegment, MappingTable, SourceMap};

/// Parse `backtrace`, resolve it against `sourcemap` if given, and serialize the result as
/// `{ errorMessage, trace, raw, pretty }`.
///
/// The source map is decoded on every call; hosts resolving many backtraces should keep a
/// [`BacktraceResolver`] instead. Empty or whitespace-only map text is treated like `None`.
///
/// # Errors
/// Returns [`Error::InvalidSourceMap`] or [`Error::Json`] if `sourcemap` cannot be used.
pub fn parse(sourcemap: Option<&str>, backtrace: &str) -> Result<String> {
    BacktraceResolver::new(ResolverConfig::default().uncached()).parse(sourcemap, backtrace)
}

/// Parse `backtrace`, resolve it against `sourcemap` if given, and render the
/// human-readable layout.
///
/// Empty or whitespace-only map text is treated like `None`.
///
/// # Errors
/// Returns [`Error::InvalidSourceMap`] or [`Error::Json`] if `sourcemap` cannot be used.
pub fn format(sourcemap: Option<&str>, backtrace: &str) -> Result<String> {
    BacktraceResolver::new(ResolverConfig::default().uncached()).format(sourcemap, backtrace)
}
