//! End-to-end pipeline from raw backtrace text to JSON or pretty output.
//!
//! [`BacktraceResolver`] owns a [`ResolverConfig`] and a [`SourceMapCache`], so a host can
//! create one per process (or per worker) and pass the source map text on every call
//! without re-decoding it. The free functions [`crate::parse`] and [`crate::format`] run the
//! same pipeline with a throwaway resolver.

use std::sync::Arc;

use strum::{Display, EnumIter, EnumString};

use crate::{
    backtrace::Backtrace, cache::SourceMapCache, sourcemap::SourceMap, ResolverConfig, Result,
};

/// Output flavour of a rendered backtrace.
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::BacktraceFormat;
///
/// let format: BacktraceFormat = "pretty".parse().unwrap();
/// assert_eq!(format, BacktraceFormat::Pretty);
/// assert_eq!(BacktraceFormat::Json.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum BacktraceFormat {
    /// `{ errorMessage, trace, raw, pretty }` as a JSON string
    Json,
    /// The multi-line human-readable rendering
    Pretty,
}

/// Backtrace resolution pipeline with an owned source map cache.
///
/// # Examples
///
/// ```rust
/// use jsbacktrace::{BacktraceResolver, ResolverConfig};
///
/// let resolver = BacktraceResolver::new(ResolverConfig::default());
/// let map = r#"{"version":3,"sources":["app.ts"],"names":["main"],"mappings":"AAAAA"}"#;
///
/// let pretty = resolver.format(Some(map), "Error: boom\n    at f (bundle.js:1:1)")?;
/// assert_eq!(pretty, "Error: boom:\n  at f (bundle.js:1:1) -> main (app.ts:1:1)");
/// # Ok::<(), jsbacktrace::Error>(())
/// ```
#[derive(Debug)]
pub struct BacktraceResolver {
    config: ResolverConfig,
    cache: SourceMapCache,
}

impl Default for BacktraceResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl BacktraceResolver {
    /// Create a resolver with an empty cache sized by
    /// [`ResolverConfig::source_map_cache_capacity`].
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        BacktraceResolver {
            config,
            cache: SourceMapCache::with_capacity(config.source_map_cache_capacity),
        }
    }

    /// The configuration this resolver decodes source maps with.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// The source map cache.
    #[must_use]
    pub fn cache(&self) -> &SourceMapCache {
        &self.cache
    }

    /// Decode `text`, through the cache unless caching is disabled.
    ///
    /// # Errors
    /// Returns the errors of [`SourceMap::parse`].
    pub fn source_map(&self, text: &str) -> Result<Arc<SourceMap>> {
        if self.config.cache_source_maps {
            self.cache.get_or_parse(text, &self.config)
        } else {
            Ok(Arc::new(SourceMap::parse(text, &self.config)?))
        }
    }

    /// Parse `backtrace` and, if `sourcemap` is given, resolve its frames.
    ///
    /// Without a source map every frame is returned with `mapped` unset. Map text that is
    /// empty or whitespace only counts as no source map.
    ///
    /// # Errors
    /// Returns [`crate::Error::InvalidSourceMap`] or [`crate::Error::Json`] if `sourcemap`
    /// cannot be used. Backtrace parsing itself never fails.
    pub fn resolve(&self, sourcemap: Option<&str>, backtrace: &str) -> Result<Backtrace> {
        let mut parsed = Backtrace::parse(backtrace);
        if let Some(text) = sourcemap.filter(|text| !text.trim().is_empty()) {
            let map = self.source_map(text)?;
            parsed.resolve_with(&map);
        }
        Ok(parsed)
    }

    /// Resolve and serialize as `{ errorMessage, trace, raw, pretty }`.
    ///
    /// # Errors
    /// See [`BacktraceResolver::resolve`].
    pub fn parse(&self, sourcemap: Option<&str>, backtrace: &str) -> Result<String> {
        self.resolve(sourcemap, backtrace)?.to_json()
    }

    /// Resolve and render the human-readable layout.
    ///
    /// # Errors
    /// See [`BacktraceResolver::resolve`].
    pub fn format(&self, sourcemap: Option<&str>, backtrace: &str) -> Result<String> {
        Ok(self.resolve(sourcemap, backtrace)?.pretty())
    }

    /// Resolve and render in the requested `format`.
    ///
    /// # Errors
    /// See [`BacktraceResolver::resolve`].
    pub fn render(
        &self,
        format: BacktraceFormat,
        sourcemap: Option<&str>,
        backtrace: &str,
    ) -> Result<String> {
        match format {
            BacktraceFormat::Json => self.parse(sourcemap, backtrace),
            BacktraceFormat::Pretty => self.format(sourcemap, backtrace),
        }
    }

    /// Like [`BacktraceResolver::render`], but never fails.
    ///
    /// For hosts that must report *something* for an exception: the failure is logged
    /// together with the offending backtrace, and the result degrades to `{}` for
    /// [`BacktraceFormat::Json`] or to the trimmed raw text for [`BacktraceFormat::Pretty`].
    #[must_use]
    pub fn render_lossy(
        &self,
        format: BacktraceFormat,
        sourcemap: Option<&str>,
        backtrace: &str,
    ) -> String {
        match self.render(format, sourcemap, backtrace) {
            Ok(rendered) => rendered,
            Err(error) => {
                log::error!("Error resolving backtrace: {}", error);
                log::error!("The backtrace that could not be resolved:\n{}", backtrace);
                match format {
                    BacktraceFormat::Json => "{}".to_string(),
                    BacktraceFormat::Pretty => backtrace.trim().to_string(),
                }
            }
        }
    }
}
