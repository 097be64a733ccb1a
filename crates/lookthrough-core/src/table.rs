//! A minimal in-memory string table.
//!
//! Issuer parsers produce a [`Table`] whose cells are still text; the
//! holdings contract check in [`crate::contract`] converts and validates it.
//! Only the relational primitives the parsers need are provided.

use serde::{Deserialize, Serialize};

use crate::error::{LookthroughError, LookthroughResult};

/// Column names plus rows of string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates an empty table with the given columns.
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a table from columns and rows, checking row arity.
    pub fn with_rows<I, S>(columns: I, rows: Vec<Vec<String>>) -> LookthroughResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row. Fails if its length differs from the column count.
    pub fn push_row(&mut self, row: Vec<String>) -> LookthroughResult<()> {
        if row.len() != self.columns.len() {
            return Err(LookthroughError::format(
                "table",
                format!(
                    "row {} has {} cells, expected {}",
                    self.rows.len() + 1,
                    row.len(),
                    self.columns.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Returns true if the column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Fails with a format error naming every missing column.
    pub fn require(&self, names: &[&str]) -> LookthroughResult<()> {
        let missing: Vec<&str> = names
            .iter()
            .copied()
            .filter(|n| !self.has_column(n))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(LookthroughError::format(
                "table",
                format!("missing column(s): {}", missing.join(", ")),
            ))
        }
    }

    /// Iterates over the values of a column.
    pub fn values<'a>(&'a self, name: &str) -> LookthroughResult<impl Iterator<Item = &'a str>> {
        let idx = self.index_or_err(name)?;
        Ok(self.rows.iter().map(move |r| r[idx].as_str()))
    }

    /// Renames a column in place.
    pub fn rename(mut self, from: &str, to: &str) -> LookthroughResult<Self> {
        let idx = self.index_or_err(from)?;
        self.columns[idx] = to.to_string();
        Ok(self)
    }

    /// Replaces every value of a column through a fallible function.
    pub fn map<F>(mut self, name: &str, mut f: F) -> LookthroughResult<Self>
    where
        F: FnMut(&str) -> LookthroughResult<String>,
    {
        let idx = self.index_or_err(name)?;
        for row in &mut self.rows {
            row[idx] = f(&row[idx])?;
        }
        Ok(self)
    }

    /// Adds a column computed from each row.
    #[must_use]
    pub fn create<F>(mut self, name: &str, mut f: F) -> Self
    where
        F: FnMut(&[String]) -> String,
    {
        for row in &mut self.rows {
            let value = f(row);
            row.push(value);
        }
        self.columns.push(name.to_string());
        self
    }

    /// Keeps rows matching a predicate.
    #[must_use]
    pub fn filter<F>(mut self, mut predicate: F) -> Self
    where
        F: FnMut(&[String]) -> bool,
    {
        self.rows.retain(|r| predicate(r));
        self
    }

    /// Projects onto the named columns, in the given order.
    pub fn select(&self, names: &[&str]) -> LookthroughResult<Self> {
        let indexes = names
            .iter()
            .map(|n| self.index_or_err(n))
            .collect::<LookthroughResult<Vec<_>>>()?;
        Ok(Self {
            columns: names.iter().map(|n| (*n).to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| indexes.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        })
    }

    fn index_or_err(&self, name: &str) -> LookthroughResult<usize> {
        self.column_index(name)
            .ok_or_else(|| LookthroughError::format("table", format!("no column named '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| (*s).to_string()).collect()
    }

    fn sample() -> Table {
        Table::with_rows(
            ["Ticker", "Weight"],
            vec![row(&["AAPL", "7"]), row(&["MSFT", "6"]), row(&["", "87"])],
        )
        .unwrap()
    }

    #[test]
    fn test_push_row_checks_arity() {
        let mut table = Table::new(["a", "b"]);
        assert!(table.push_row(row(&["1"])).is_err());
        assert!(table.push_row(row(&["1", "2"])).is_ok());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_rename_map_select() {
        let table = sample()
            .rename("Ticker", "ticker")
            .unwrap()
            .map("Weight", |w| Ok(format!("{w}%")))
            .unwrap()
            .select(&["Weight", "ticker"])
            .unwrap();
        assert_eq!(table.columns(), &["Weight".to_string(), "ticker".to_string()]);
        assert_eq!(table.rows()[0], row(&["7%", "AAPL"]));
    }

    #[test]
    fn test_create_and_filter() {
        let table = sample()
            .filter(|r| !r[0].is_empty())
            .create("asstype", |_| "Equity".to_string());
        assert_eq!(table.len(), 2);
        let types: Vec<_> = table.values("asstype").unwrap().collect();
        assert_eq!(types, vec!["Equity", "Equity"]);
    }

    #[test]
    fn test_require_lists_missing() {
        let err = sample().require(&["Ticker", "name", "sedol"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("name"));
        assert!(msg.contains("sedol"));
        assert!(!msg.contains("Ticker"));
    }
}
