//! Security identifier bundle.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of identifier linking holding rows together.
///
/// The four code kinds are compared exactly as published. `NameKey` is the
/// normalized name scoped by asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IdentifierKind {
    /// Exchange ticker symbol.
    Ticker,
    /// CUSIP code.
    Cusip,
    /// ISIN code.
    Isin,
    /// SEDOL code.
    Sedol,
    /// Normalized security name, keyed by asset type.
    NameKey,
}

impl IdentifierKind {
    /// The code kinds matched verbatim, in linking order.
    pub const CODES: [IdentifierKind; 4] = [
        IdentifierKind::Ticker,
        IdentifierKind::Cusip,
        IdentifierKind::Isin,
        IdentifierKind::Sedol,
    ];

    /// Returns the column name for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierKind::Ticker => "ticker",
            IdentifierKind::Cusip => "cusip",
            IdentifierKind::Isin => "isin",
            IdentifierKind::Sedol => "sedol",
            IdentifierKind::NameKey => "name_key",
        }
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifiers an issuer published for one holding.
///
/// Every field defaults to the empty string when the issuer does not report it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifiers {
    /// Free-text security name.
    pub name: String,
    /// Exchange ticker symbol.
    pub ticker: String,
    /// SEDOL code.
    pub sedol: String,
    /// ISIN code.
    pub isin: String,
    /// CUSIP code.
    pub cusip: String,
}

impl Identifiers {
    /// Creates an empty identifier bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the ticker.
    #[must_use]
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = ticker.into();
        self
    }

    /// Sets the SEDOL.
    #[must_use]
    pub fn with_sedol(mut self, sedol: impl Into<String>) -> Self {
        self.sedol = sedol.into();
        self
    }

    /// Sets the ISIN.
    #[must_use]
    pub fn with_isin(mut self, isin: impl Into<String>) -> Self {
        self.isin = isin.into();
        self
    }

    /// Sets the CUSIP.
    #[must_use]
    pub fn with_cusip(mut self, cusip: impl Into<String>) -> Self {
        self.cusip = cusip.into();
        self
    }

    /// Returns the raw code for one of the four code kinds.
    ///
    /// `NameKey` has no raw value; the name is returned instead.
    #[must_use]
    pub fn get(&self, kind: IdentifierKind) -> &str {
        match kind {
            IdentifierKind::Ticker => &self.ticker,
            IdentifierKind::Cusip => &self.cusip,
            IdentifierKind::Isin => &self.isin,
            IdentifierKind::Sedol => &self.sedol,
            IdentifierKind::NameKey => &self.name,
        }
    }

    /// Sets a field by its column name. Returns false for unknown columns.
    pub fn set_column(&mut self, column: &str, value: String) -> bool {
        match column {
            "name" => self.name = value,
            "ticker" => self.ticker = value,
            "sedol" => self.sedol = value,
            "isin" => self.isin = value,
            "cusip" => self.cusip = value,
            _ => return false,
        }
        true
    }

    /// Returns true if no identifier is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.ticker.is_empty()
            && self.sedol.is_empty()
            && self.isin.is_empty()
            && self.cusip.is_empty()
    }
}
