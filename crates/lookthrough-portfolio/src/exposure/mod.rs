//! Aggregation and canonicalization of resolved groups.
//!
//! Groups are ordered by total dollar exposure, largest first; a group's
//! position in that order is its canonical id. For each group the summary
//! carries the merged tickers, asset types, the longest name and the summed
//! amount. The detail table tags every flat row with its group id.

use std::collections::BTreeSet;

use lookthrough_core::AssetType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{PortfolioError, PortfolioResult};
use crate::resolution::Group;
use crate::types::ResolvedHoldingRow;

/// One resolved security in the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow {
    /// Sorted, comma-joined distinct tickers.
    pub symbol: String,
    /// Sorted, comma-joined distinct asset types.
    pub asstype: String,
    /// Canonical display name.
    pub name: String,
    /// Summed dollar exposure.
    pub amount: Decimal,
}

impl AggregateRow {
    /// Returns true if the group mixes asset types.
    #[must_use]
    pub fn is_mixed(&self) -> bool {
        self.asstype.contains(',')
    }
}

/// A flat row tagged with its group id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedRow {
    /// Canonical group id (0 is the largest exposure).
    pub group: usize,
    /// Owning fund ticker.
    pub etf: String,
    /// Account of the owning position.
    pub account: String,
    /// Asset class.
    pub asstype: AssetType,
    /// Name as published.
    pub name: String,
    /// Ticker as published.
    pub ticker: String,
    /// SEDOL as published.
    pub sedol: String,
    /// ISIN as published.
    pub isin: String,
    /// CUSIP as published.
    pub cusip: String,
    /// Dollar exposure.
    pub amount: Decimal,
}

impl AnnotatedRow {
    fn new(group: usize, row: &ResolvedHoldingRow) -> Self {
        let ids = &row.identifiers;
        Self {
            group,
            etf: row.etf.clone(),
            account: row.account.clone(),
            asstype: row.asstype,
            name: ids.name.clone(),
            ticker: ids.ticker.clone(),
            sedol: ids.sedol.clone(),
            isin: ids.isin.clone(),
            cusip: ids.cusip.clone(),
            amount: row.amount,
        }
    }
}

/// Output of the aggregation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exposure {
    /// Groups in canonical order; index is the group id.
    pub groups: Vec<Group>,
    /// One row per group, same order as `groups`.
    pub summary: Vec<AggregateRow>,
    /// Every flat row, ordered by group id then amount descending.
    pub detail: Vec<AnnotatedRow>,
}

/// Aggregates resolved groups into the summary and detail tables.
///
/// `groups` must partition `rows` by index.
///
/// # Errors
///
/// Returns an error if the detail table does not hold every input row
/// exactly once or if the summary, detail and input totals differ.
pub fn aggregate_exposure(
    rows: &[ResolvedHoldingRow],
    groups: Vec<Group>,
) -> PortfolioResult<Exposure> {
    for group in &groups {
        if let Some(&bad) = group.rows.iter().find(|&&r| r >= rows.len()) {
            return Err(PortfolioError::row_count("aggregation", rows.len(), bad + 1));
        }
    }

    let mut ranked: Vec<(Decimal, Group)> = groups
        .into_iter()
        .map(|g| (group_total(rows, &g), g))
        .collect();
    // Stable: equal totals keep resolver order.
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    let mut exposure = Exposure::default();
    for (id, (total, group)) in ranked.into_iter().enumerate() {
        let summary = summarize(rows, &group, total);
        if summary.is_mixed() {
            warn!(
                group = id,
                symbol = %summary.symbol,
                asstype = %summary.asstype,
                name = %summary.name,
                "Group spans several asset types"
            );
        }

        let mut members: Vec<&ResolvedHoldingRow> =
            group.rows.iter().map(|&i| &rows[i]).collect();
        members.sort_by(|a, b| b.amount.cmp(&a.amount));
        exposure
            .detail
            .extend(members.into_iter().map(|r| AnnotatedRow::new(id, r)));

        exposure.summary.push(summary);
        exposure.groups.push(group);
    }

    check_conservation(rows, &exposure)?;
    Ok(exposure)
}

fn group_total(rows: &[ResolvedHoldingRow], group: &Group) -> Decimal {
    group.rows.iter().map(|&i| rows[i].amount).sum()
}

fn summarize(rows: &[ResolvedHoldingRow], group: &Group, amount: Decimal) -> AggregateRow {
    let members = || group.rows.iter().map(|&i| &rows[i]);

    let tickers: BTreeSet<&str> = members()
        .map(|r| r.identifiers.ticker.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    let types: BTreeSet<&str> = members().map(|r| r.asstype.as_str()).collect();

    AggregateRow {
        symbol: tickers.into_iter().collect::<Vec<_>>().join(","),
        asstype: types.into_iter().collect::<Vec<_>>().join(","),
        name: canonical_name(members().map(|r| r.identifiers.name.as_str())),
        amount,
    }
}

/// Picks the longest name, counting characters. Ties go to the first seen.
#[must_use]
pub fn canonical_name<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut best = "";
    let mut best_len = 0;
    for name in names {
        let len = name.chars().count();
        if len > best_len {
            best = name;
            best_len = len;
        }
    }
    best.to_string()
}

fn check_conservation(rows: &[ResolvedHoldingRow], exposure: &Exposure) -> PortfolioResult<()> {
    if exposure.detail.len() != rows.len() {
        return Err(PortfolioError::row_count(
            "aggregation",
            rows.len(),
            exposure.detail.len(),
        ));
    }

    let input: Decimal = rows.iter().map(|r| r.amount).sum();
    let summary: Decimal = exposure.summary.iter().map(|r| r.amount).sum();
    let detail: Decimal = exposure.detail.iter().map(|r| r.amount).sum();
    if summary != input {
        return Err(PortfolioError::amount("summary", input, summary));
    }
    if detail != input {
        return Err(PortfolioError::amount("detail", input, detail));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookthrough_core::Identifiers;
    use rust_decimal_macros::dec;

    fn row(id: usize, asstype: AssetType, ids: Identifiers, amount: Decimal) -> ResolvedHoldingRow {
        ResolvedHoldingRow {
            id,
            etf: "FUND".into(),
            account: "A".into(),
            asstype,
            identifiers: ids,
            amount,
        }
    }

    fn group(rows: &[usize]) -> Group {
        Group {
            rows: rows.to_vec(),
            identifiers: vec![],
        }
    }

    #[test]
    fn test_canonical_name_longest_first_tie() {
        assert_eq!(
            canonical_name(["IBM", "International Business Machines Corp", "IBM Corp"]),
            "International Business Machines Corp"
        );
        assert_eq!(canonical_name(["ABCD", "WXYZ"]), "ABCD");
        assert_eq!(canonical_name(["", ""]), "");
    }

    #[test]
    fn test_groups_ranked_by_total() {
        let rows = vec![
            row(0, AssetType::Equity, Identifiers::new().with_ticker("MSFT"), dec!(270)),
            row(1, AssetType::Equity, Identifiers::new().with_ticker("AAPL"), dec!(315)),
            row(2, AssetType::Equity, Identifiers::new().with_ticker("MSFT"), dec!(100)),
        ];
        let exposure = aggregate_exposure(&rows, vec![group(&[0, 2]), group(&[1])]).unwrap();

        assert_eq!(exposure.summary[0].symbol, "MSFT");
        assert_eq!(exposure.summary[0].amount, dec!(370));
        assert_eq!(exposure.summary[1].symbol, "AAPL");
        assert_eq!(exposure.groups[0].rows, vec![0, 2]);

        let detail: Vec<_> = exposure.detail.iter().map(|d| (d.group, d.amount)).collect();
        assert_eq!(detail, vec![(0, dec!(270)), (0, dec!(100)), (1, dec!(315))]);
    }

    #[test]
    fn test_symbols_and_types_merged_sorted() {
        let rows = vec![
            row(
                0,
                AssetType::FixedIncome,
                Identifiers::new().with_ticker("T").with_cusip("00206R102"),
                dec!(5),
            ),
            row(1, AssetType::Equity, Identifiers::new().with_cusip("00206R102"), dec!(10)),
            row(2, AssetType::Equity, Identifiers::new().with_ticker("ATT"), dec!(1)),
        ];
        let exposure = aggregate_exposure(&rows, vec![group(&[0, 1, 2])]).unwrap();
        let summary = &exposure.summary[0];

        assert_eq!(summary.symbol, "ATT,T");
        assert_eq!(summary.asstype, "Equity,FixedIncome");
        assert!(summary.is_mixed());
    }

    #[test]
    fn test_ties_keep_resolver_order() {
        let rows = vec![
            row(0, AssetType::Equity, Identifiers::new().with_ticker("A"), dec!(5)),
            row(1, AssetType::Equity, Identifiers::new().with_ticker("B"), dec!(5)),
        ];
        let exposure = aggregate_exposure(&rows, vec![group(&[0]), group(&[1])]).unwrap();
        assert_eq!(exposure.summary[0].symbol, "A");
        assert_eq!(exposure.summary[1].symbol, "B");
    }

    #[test]
    fn test_dropped_row_is_invariant_error() {
        let rows = vec![
            row(0, AssetType::Equity, Identifiers::new(), dec!(1)),
            row(1, AssetType::Equity, Identifiers::new(), dec!(2)),
        ];
        let err = aggregate_exposure(&rows, vec![group(&[0])]).unwrap_err();
        assert!(err.is_invariant());
    }
}
