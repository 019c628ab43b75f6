use thiserror::Error;

macro_rules! invalid_source_map {
    // Single string version
    ($msg:expr) => {
        crate::Error::InvalidSourceMap {
            message: $msg.to_string(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::InvalidSourceMap {
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Backtrace parsing and position resolution never fail; every error originates from the
/// source map side of the pipeline: reading the document, decoding its JSON, or validating
/// the fields the mapping table needs.
///
/// # Error Categories
///
/// ## Source Map Errors
/// - [`Error::InvalidSourceMap`] - The document lacks `mappings` / `sources`, or failed a
///   strict-mode check
/// - [`Error::Json`] - The document is not valid JSON for the Source Map v3 shape
///
/// ## I/O Errors
/// - [`Error::FileError`] - Filesystem I/O errors while loading a map from disk
/// - [`Error::Error`] - Miscellaneous failures, such as a memory mapping that could not be
///   established
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::{Error, SourceMap};
///
/// match r#"{"version":3,"sources":["a.js"]}"#.parse::<SourceMap>() {
///     Ok(_) => println!("loaded"),
///     Err(Error::InvalidSourceMap { message }) => eprintln!("bad map: {}", message),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The source map document cannot be used for mapping.
    ///
    /// Raised when `mappings` or `sources` is missing (an empty `mappings` string counts as
    /// missing), and, under [`crate::ResolverConfig::strict`], when segments are out of
    /// order, reference indices outside `sources`/`names`, or encode positions that do not
    /// fit a 1-based `u32`.
    #[error("Invalid source map - {message}")]
    InvalidSourceMap {
        /// Description of the offending field or segment
        message: String,
    },

    /// The source map text could not be decoded as JSON.
    #[error("Source map is not valid JSON - {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while opening a source map on disk.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}
