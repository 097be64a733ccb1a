//! Integration tests for lookthrough-portfolio.
//!
//! These tests run the whole pipeline over in-memory holdings files and
//! issuer parsers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use lookthrough_portfolio::prelude::*;
use rust_decimal_macros::dec;

// =============================================================================
// TEST FIXTURES
// =============================================================================

/// Holdings files keyed by fund ticker. The store hands out the ticker as the
/// path and the parser looks the table up again.
#[derive(Clone, Default)]
struct Funds {
    files: Arc<HashMap<String, Vec<Vec<String>>>>,
}

const COLUMNS: [&str; 7] = ["fraction", "asstype", "name", "ticker", "sedol", "isin", "cusip"];

impl Funds {
    fn new(funds: Vec<(&str, Vec<[&str; 7]>)>) -> Self {
        let files = funds
            .into_iter()
            .map(|(ticker, rows)| {
                let rows = rows
                    .iter()
                    .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                    .collect();
                (ticker.to_string(), rows)
            })
            .collect();
        Self {
            files: Arc::new(files),
        }
    }

    fn registry(&self, issuers: &[&str]) -> ParserRegistry {
        let mut registry = ParserRegistry::new();
        for issuer in issuers {
            let files = Arc::clone(&self.files);
            registry.register(*issuer, move |path: &Path| -> LookthroughResult<Table> {
                let ticker = path.to_string_lossy().to_string();
                let rows = files.get(&ticker).cloned().unwrap_or_default();
                Table::with_rows(COLUMNS, rows)
            });
        }
        registry
    }
}

impl HoldingsStore for Funds {
    fn latest(&self, ticker: &str) -> LookthroughResult<Option<PathBuf>> {
        Ok(self
            .files
            .contains_key(ticker)
            .then(|| PathBuf::from(ticker)))
    }
}

fn run(funds: &Funds, issuers: &[&str], positions: &[Position]) -> Lookthrough {
    Lookthrough::run(
        positions,
        funds,
        &funds.registry(issuers),
        &AggregationConfig::sequential(),
    )
    .unwrap()
}

fn equity(fraction: &'static str, name: &'static str, ticker: &'static str) -> [&'static str; 7] {
    [fraction, "Equity", name, ticker, "", "", ""]
}

// =============================================================================
// SCENARIOS
// =============================================================================

#[test]
fn test_single_fund_scenario() {
    let funds = Funds::new(vec![(
        "SPY",
        vec![
            equity("0.07", "Apple Inc", "AAPL"),
            equity("0.06", "Microsoft Corp", "MSFT"),
        ],
    )]);
    let positions = vec![Position::new("SPY", "SPDR", "Brokerage", dec!(450), dec!(10))];

    let result = run(&funds, &["SPDR"], &positions);

    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.rows[0].amount, dec!(315));
    assert_eq!(result.rows[1].amount, dec!(270));

    assert_eq!(result.summary.len(), 2);
    assert_eq!(result.summary[0].symbol, "AAPL");
    assert_eq!(result.summary[0].amount, dec!(315));
    assert_eq!(result.summary[1].symbol, "MSFT");
    assert_eq!(result.summary[1].amount, dec!(270));

    assert_eq!(result.report.counts().processed, 1);
}

#[test]
fn test_transitive_closure_across_funds() {
    let funds = Funds::new(vec![
        ("AAA", vec![["0.5", "Equity", "IBM", "IBM", "", "", ""]]),
        (
            "BBB",
            vec![["0.5", "Equity", "IBM Corp", "IBM", "", "", "459200101"]],
        ),
        (
            "CCC",
            vec![[
                "0.5",
                "Equity",
                "International Business Machines Corp",
                "",
                "",
                "",
                "459200101",
            ]],
        ),
    ]);
    let positions = vec![
        Position::new("AAA", "X", "A", dec!(100), dec!(1)),
        Position::new("BBB", "X", "A", dec!(100), dec!(1)),
        Position::new("CCC", "X", "A", dec!(100), dec!(1)),
    ];

    let result = run(&funds, &["X"], &positions);

    assert_eq!(result.summary.len(), 1);
    let ibm = &result.summary[0];
    assert_eq!(ibm.amount, dec!(150));
    assert_eq!(ibm.symbol, "IBM");
    assert_eq!(ibm.name, "International Business Machines Corp");
    assert!(result.detail.iter().all(|d| d.group == 0));
}

#[test]
fn test_row_without_identifiers_is_singleton() {
    let funds = Funds::new(vec![(
        "MIX",
        vec![
            equity("0.5", "Apple Inc", "AAPL"),
            ["0.25", "ShortTerm", "", "", "", "", ""],
            ["0.25", "ShortTerm", "", "", "", "", ""],
        ],
    )]);
    let positions = vec![Position::new("MIX", "X", "A", dec!(1), dec!(1000))];

    let result = run(&funds, &["X"], &positions);

    assert_eq!(result.summary.len(), 3);
    assert_eq!(result.stats.groups, 3);
    assert_eq!(result.stats.matched_groups, 0);
    assert_eq!(result.groups[1].rows.len(), 1);
    assert_eq!(result.groups[2].rows.len(), 1);
}

#[test]
fn test_name_keys_scoped_by_asset_type() {
    let funds = Funds::new(vec![
        ("EQ", vec![equity("1", "Apple Inc", "")]),
        ("BD", vec![["1", "FixedIncome", "Apple Inc", "", "", "", ""]]),
    ]);
    let positions = vec![
        Position::new("EQ", "X", "A", dec!(10), dec!(1)),
        Position::new("BD", "X", "A", dec!(20), dec!(1)),
    ];

    let result = run(&funds, &["X"], &positions);

    assert_eq!(result.summary.len(), 2);
    assert_eq!(result.summary[0].asstype, "FixedIncome");
    assert_eq!(result.summary[1].asstype, "Equity");
}

#[test]
fn test_shared_code_merges_across_types() {
    let funds = Funds::new(vec![
        ("EQ", vec![["1", "Equity", "AT&T Inc", "T", "", "", "00206R102"]]),
        ("BD", vec![["1", "FixedIncome", "AT&T 4.3% 2030", "", "", "", "00206R102"]]),
    ]);
    let positions = vec![
        Position::new("EQ", "X", "A", dec!(10), dec!(1)),
        Position::new("BD", "X", "A", dec!(20), dec!(1)),
    ];

    let result = run(&funds, &["X"], &positions);

    assert_eq!(result.summary.len(), 1);
    assert_eq!(result.summary[0].asstype, "Equity,FixedIncome");
    assert_eq!(result.summary[0].amount, dec!(30));
}

#[test]
fn test_placeholder_sedol_does_not_link() {
    let funds = Funds::new(vec![(
        "VBTLX",
        vec![
            ["0.5", "FixedIncome", "US Treasury 1.5% 2027", "", "-", "", ""],
            ["0.5", "FixedIncome", "FNMA 3% 2051", "", "-", "", ""],
        ],
    )]);
    let positions = vec![Position::new("VBTLX", "Vanguard", "IRA", dec!(10), dec!(100))];

    let result = run(&funds, &["Vanguard"], &positions);

    assert_eq!(result.summary.len(), 2);
    assert_eq!(result.summary[0].amount, dec!(500));
}

#[test]
fn test_apple_merges_by_name_key() {
    let funds = Funds::new(vec![
        ("SPY", vec![equity("0.07", "Apple Inc.", "AAPL")]),
        ("VTI", vec![["0.06", "Equity", "APPLE INC", "", "", "", "037833100"]]),
    ]);
    let positions = vec![
        Position::new("SPY", "SPDR", "Brokerage", dec!(450), dec!(10)),
        Position::new("VTI", "Vanguard", "IRA", dec!(200), dec!(10)),
    ];

    let result = run(&funds, &["SPDR", "Vanguard"], &positions);

    assert_eq!(result.summary.len(), 1);
    assert_eq!(result.summary[0].amount, dec!(315) + dec!(120));
    assert_eq!(result.summary[0].symbol, "AAPL");
    assert_eq!(result.summary[0].name, "Apple Inc.");
    assert_eq!(result.stats.matched_groups, 1);
}

#[test]
fn test_detail_ordered_by_group_then_amount() {
    let funds = Funds::new(vec![
        ("F1", vec![equity("0.1", "Apple Inc", "AAPL"), equity("0.9", "Exxon", "XOM")]),
        ("F2", vec![equity("0.5", "Apple Inc", "AAPL"), equity("0.5", "Chevron", "CVX")]),
    ]);
    let positions = vec![
        Position::new("F1", "X", "A", dec!(1), dec!(100)),
        Position::new("F2", "X", "A", dec!(1), dec!(100)),
    ];

    let result = run(&funds, &["X"], &positions);

    let summary: Vec<_> = result
        .summary
        .iter()
        .map(|r| (r.symbol.as_str(), r.amount))
        .collect();
    assert_eq!(summary[0], ("XOM", dec!(90)));
    assert_eq!(summary[1], ("AAPL", dec!(60)));
    assert_eq!(summary[2], ("CVX", dec!(50)));

    let detail: Vec<_> = result
        .detail
        .iter()
        .map(|d| (d.group, d.etf.as_str(), d.amount))
        .collect();
    assert_eq!(
        detail,
        vec![
            (0, "F1", dec!(90)),
            (1, "F2", dec!(50)),
            (1, "F1", dec!(10)),
            (2, "F2", dec!(50)),
        ]
    );
}

#[test]
fn test_skipped_positions_do_not_block_the_run() {
    let funds = Funds::new(vec![("SPY", vec![equity("1", "Apple Inc", "AAPL")])]);
    let positions = vec![
        Position::new("SPY", "SPDR", "A", dec!(1), dec!(100)),
        Position::new("ARKK", "ARK", "A", dec!(1), dec!(100)),
        Position::new("IVV", "SPDR", "A", dec!(1), dec!(100)),
        Position::new("MSFT", "", "A", dec!(300), dec!(2)),
    ];

    let result = run(&funds, &["SPDR"], &positions);

    let counts = result.report.counts();
    assert_eq!(counts.processed, 2);
    assert_eq!(counts.missing_issuer, 1);
    assert_eq!(counts.missing_file, 1);
    assert_eq!(result.total, dec!(700));
    assert_eq!(result.summary[0].symbol, "MSFT");
    assert_eq!(result.summary[0].name, "MSFT");
}

#[test]
fn test_short_position_reduces_exposure() {
    let funds = Funds::new(vec![("QQQ", vec![equity("0.5", "Apple Inc", "AAPL")])]);
    let positions = vec![
        Position::new("AAPL", "", "A", dec!(100), dec!(10)),
        Position::new("QQQ", "X", "Margin", dec!(100), dec!(-4)),
    ];

    let result = run(&funds, &["X"], &positions);
    assert_eq!(result.summary.len(), 1);
    assert_eq!(result.summary[0].amount, dec!(800));

    let ignoring = Lookthrough::run(
        &positions,
        &funds,
        &funds.registry(&["X"]),
        &AggregationConfig::sequential().with_ignore_shorts(true),
    )
    .unwrap();
    assert_eq!(ignoring.summary[0].amount, dec!(1000));
    assert_eq!(ignoring.report.counts().short_ignored, 1);
}

#[test]
fn test_incomplete_fund_is_not_rescaled() {
    let funds = Funds::new(vec![("HALF", vec![equity("0.5", "Apple Inc", "AAPL")])]);
    let positions = vec![Position::new("HALF", "X", "A", dec!(1), dec!(100))];

    let result = run(&funds, &["X"], &positions);
    assert_eq!(result.total, dec!(50));
}

#[test]
fn test_rejected_table_skips_position() {
    let funds = Funds::new(vec![
        ("GOOD", vec![equity("1", "Apple Inc", "AAPL")]),
        ("BAD", vec![["1", "Stock", "Apple Inc", "AAPL", "", "", ""]]),
    ]);
    let positions = vec![
        Position::new("GOOD", "X", "A", dec!(1), dec!(10)),
        Position::new("BAD", "X", "A", dec!(1), dec!(10)),
    ];

    let result = run(&funds, &["X"], &positions);

    let counts = result.report.counts();
    assert_eq!(counts.rejected, 1);
    assert_eq!(result.total, dec!(10));
    let (outcome, reason) = result.report.skipped().next().unwrap();
    assert_eq!(outcome.ticker, "BAD");
    assert!(matches!(reason, SkipReason::Rejected(LookthroughError::Schema { .. })));
}

#[test]
fn test_parallel_matches_sequential() {
    let tickers: Vec<String> = (0..20).map(|i| format!("F{i:02}")).collect();
    let holdings: Vec<[&str; 7]> = vec![
        equity("0.4", "Apple Inc", "AAPL"),
        equity("0.3", "Microsoft Corp", "MSFT"),
        ["0.3", "FixedIncome", "US Treasury", "", "", "US912828ZQ64", ""],
    ];
    let funds = Funds::new(
        tickers
            .iter()
            .map(|t| (t.as_str(), holdings.clone()))
            .collect(),
    );
    let positions: Vec<Position> = tickers
        .iter()
        .enumerate()
        .map(|(i, t)| Position::new(t.clone(), "X", "A", dec!(10), Decimal::from(i + 1)))
        .collect();
    let registry = funds.registry(&["X"]);

    let sequential = Lookthrough::run(
        &positions,
        &funds,
        &registry,
        &AggregationConfig::sequential(),
    )
    .unwrap();
    let parallel = Lookthrough::run(
        &positions,
        &funds,
        &registry,
        &AggregationConfig::new().with_threshold(2),
    )
    .unwrap();

    assert_eq!(sequential.summary, parallel.summary);
    assert_eq!(sequential.detail, parallel.detail);
    assert_eq!(sequential.summary.len(), 3);
}
