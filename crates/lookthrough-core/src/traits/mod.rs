//! Collaborator traits.
//!
//! The look-through engine consumes its inputs through these seams:
//!
//! - [`PositionSource`]: Produces the investor's positions
//! - [`HoldingsStore`]: Locates the latest stored holdings file for a fund
//! - [`HoldingsParser`]: Turns one issuer's raw file into a contract table
//! - [`ParserRegistry`]: Maps issuer keys to parsers
//!
//! File-backed implementations live in `lookthrough-ext-file`; tests supply
//! in-memory doubles.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::LookthroughResult;
use crate::table::Table;
use crate::types::Position;

/// Source of portfolio positions.
pub trait PositionSource {
    /// Reads all positions.
    ///
    /// Fails with a format error if any required field is absent.
    fn positions(&self) -> LookthroughResult<Vec<Position>>;
}

/// Lookup of stored holdings files.
///
/// A store never fetches; it only reports what has been saved.
pub trait HoldingsStore: Send + Sync {
    /// Path of the most recently stored file for `ticker`, if any.
    fn latest(&self, ticker: &str) -> LookthroughResult<Option<PathBuf>>;
}

/// Parser for one issuer's holdings file format.
pub trait HoldingsParser: Send + Sync {
    /// Parses a raw holdings file into a table conforming to the holdings
    /// contract (see [`crate::contract`]).
    fn parse(&self, path: &Path) -> LookthroughResult<Table>;
}

impl<F> HoldingsParser for F
where
    F: Fn(&Path) -> LookthroughResult<Table> + Send + Sync,
{
    fn parse(&self, path: &Path) -> LookthroughResult<Table> {
        self(path)
    }
}

/// Registry of issuer parsers, keyed by issuer name.
///
/// Constructed once at startup and passed to the aggregator.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: BTreeMap<String, Arc<dyn HoldingsParser>>,
}

impl ParserRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parser under an issuer key, replacing any previous one.
    pub fn register(&mut self, issuer: impl Into<String>, parser: impl HoldingsParser + 'static) {
        self.parsers.insert(issuer.into(), Arc::new(parser));
    }

    /// Builder-style registration.
    #[must_use]
    pub fn with(mut self, issuer: impl Into<String>, parser: impl HoldingsParser + 'static) -> Self {
        self.register(issuer, parser);
        self
    }

    /// Looks up the parser for an issuer.
    #[must_use]
    pub fn get(&self, issuer: &str) -> Option<&dyn HoldingsParser> {
        self.parsers.get(issuer).map(|p| p.as_ref())
    }

    /// Registered issuer keys, sorted.
    pub fn issuers(&self) -> impl Iterator<Item = &str> {
        self.parsers.keys().map(String::as_str)
    }

    /// Number of registered parsers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    /// Returns true if no parser is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }
}

impl fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("issuers", &self.parsers.keys().collect::<Vec<_>>())
            .finish()
    }
}
