//! # jsbacktrace Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! jsbacktrace library.
//!
//! ```rust
//! use jsbacktrace::prelude::*;
//!
//! let resolver = BacktraceResolver::new(ResolverConfig::strict());
//! let bt: Backtrace = resolver.resolve(None, "Error: boom")?;
//! assert!(bt.frames.is_empty());
//! # Ok::<(), jsbacktrace::Error>(())
//! ```

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all jsbacktrace operations
pub use crate::Error;

/// The result type used throughout jsbacktrace
pub use crate::Result;

/// Strictness of source map decoding
pub use crate::ResolverConfig;

/// Default number of parsed source maps a resolver keeps
pub use crate::DEFAULT_SOURCE_MAP_CACHE_CAPACITY;

// ================================================================================================
// Pipeline
// ================================================================================================

/// Resolution pipeline, output selection and map cache
pub use crate::{BacktraceFormat, BacktraceResolver, SourceMapCache};

// ================================================================================================
// Backtraces
// ================================================================================================

/// Parsed backtrace and its frames
pub use crate::backtrace::{Backtrace, Frame, ResolvedLocation, UNKNOWN_LOCATION};

// ================================================================================================
// Source Maps
// ================================================================================================

/// Parsed source maps and their lookup tables
pub use crate::sourcemap::{MappingSegment, MappingTable, SourceMap, SourceMapDocument};
