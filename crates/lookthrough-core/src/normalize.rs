//! Normalization utilities for raw issuer strings.
//!
//! Pure functions turning dollar amounts, percentages and free-text names
//! into canonical forms.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{LookthroughError, LookthroughResult};

/// Placeholder some issuers emit for "not applicable".
pub const PLACEHOLDER: &str = "-";

/// Token substituted for embedded dates in names.
const DATE_TOKEN: &str = "expdate";

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}/\d{1,2}/\d{1,4}").expect("valid date pattern"));

/// Corporate suffix and share-class words removed from names.
const SUFFIX_WORDS: &[&str] = &[
    "ltd", "inc", "co", "corp", "plc", "llc", "sa", "ag", "nv", "adr", "ads", "preferred",
];

static NON_ALNUM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid separator pattern"));

/// Parses a dollar amount.
///
/// Strips `$`, `,` and surrounding whitespace. Parenthesized values are
/// negative (accounting convention). Empty input is zero.
///
/// # Example
///
/// ```rust
/// use lookthrough_core::normalize::parse_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_money("(1,234.50)").unwrap(), dec!(-1234.50));
/// assert_eq!(parse_money(" $12 ").unwrap(), dec!(12));
/// assert_eq!(parse_money("").unwrap(), dec!(0));
/// ```
pub fn parse_money(text: &str) -> LookthroughResult<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let (body, negate) = match trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        Some(inner) => (inner, true),
        None => (trimmed, false),
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();

    let value = parse_decimal(&cleaned).ok_or_else(|| {
        LookthroughError::parse(text, "not a numeric dollar amount")
    })?;

    Ok(if negate { -value } else { value })
}

/// Parses a percentage into a fraction.
///
/// Strips `%` and divides by 100. "Less-than" values such as `<0.01%` are
/// treated as zero.
pub fn parse_percent(text: &str) -> LookthroughResult<Decimal> {
    let trimmed = text.trim();
    if trimmed.starts_with('<') {
        return Ok(Decimal::ZERO);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !matches!(c, '%' | ',') && !c.is_whitespace())
        .collect();

    parse_decimal(&cleaned)
        .map(|v| v / Decimal::ONE_HUNDRED)
        .ok_or_else(|| LookthroughError::parse(text, "not a numeric percentage"))
}

/// Parses a plain decimal number, accepting scientific notation.
fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

/// Normalizes a security name into a matching key.
///
/// Lower-cases, replaces embedded dates with a fixed token, removes
/// corporate suffix and share-class words, turns every other character
/// into a separator and collapses whitespace. An empty result means the
/// name yields no key.
///
/// # Example
///
/// ```rust
/// use lookthrough_core::normalize::normalize_name;
///
/// assert_eq!(normalize_name("Apple Inc."), "apple");
/// assert_eq!(normalize_name("APPLE INC"), "apple");
/// assert_eq!(normalize_name("AAPL 1/17/2025 C200"), "aapl expdate c200");
/// ```
#[must_use]
pub fn normalize_name(text: &str) -> String {
    let lower = text.to_lowercase();
    let dated = DATE_RE.replace_all(&lower, DATE_TOKEN);
    let spaced = NON_ALNUM_RE.replace_all(&dated, " ");

    let mut words: Vec<&str> = spaced.split_whitespace().collect();
    // Dropping a word can make "class" adjacent to its letter; repeat to a fixpoint.
    loop {
        let stripped = strip_suffix_words(&words);
        if stripped.len() == words.len() {
            break;
        }
        words = stripped;
    }
    words.join(" ")
}

fn strip_suffix_words<'a>(words: &[&'a str]) -> Vec<&'a str> {
    let mut out = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        let next = words.get(i + 1).copied();
        if word == "class" && next.is_some_and(is_share_class_letter) {
            i += 2;
        } else if word == "non" && next == Some("voting") {
            i += 2;
        } else if SUFFIX_WORDS.contains(&word) {
            i += 1;
        } else {
            out.push(word);
            i += 1;
        }
    }
    out
}

fn is_share_class_letter(word: &str) -> bool {
    matches!(word, "a" | "b" | "c" | "d" | "e" | "f")
}

/// Trims a cell and maps a lone `-` placeholder to the empty string.
#[must_use]
pub fn empty_dashes(value: &str) -> &str {
    let value = value.trim();
    if value == PLACEHOLDER {
        ""
    } else {
        value
    }
}

/// Returns true if the value carries a usable identifier.
#[must_use]
pub fn is_present(value: &str) -> bool {
    !empty_dashes(value).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("$1,234.50").unwrap(), dec!(1234.50));
        assert_eq!(parse_money("(1,234.50)").unwrap(), dec!(-1234.50));
        assert_eq!(parse_money("($ 99)").unwrap(), dec!(-99));
        assert_eq!(parse_money("-42.1").unwrap(), dec!(-42.1));
        assert_eq!(parse_money("   ").unwrap(), Decimal::ZERO);
        assert_eq!(parse_money("1.5E3").unwrap(), dec!(1500));
    }

    #[test]
    fn test_parse_money_rejects_text() {
        let err = parse_money("N/A").unwrap_err();
        assert!(matches!(err, LookthroughError::Parse { .. }));
        assert!(parse_money("12.3.4").is_err());
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("7.00%").unwrap(), dec!(0.07));
        assert_eq!(parse_percent("12.5").unwrap(), dec!(0.125));
        assert_eq!(parse_percent("<0.01%").unwrap(), Decimal::ZERO);
        assert!(parse_percent("").is_err());
        assert!(parse_percent("abc%").is_err());
    }

    #[test]
    fn test_normalize_name_suffixes() {
        assert_eq!(normalize_name("International Business Machines Corp"), "international business machines");
        assert_eq!(normalize_name("Alphabet Inc Class A"), "alphabet");
        assert_eq!(normalize_name("Alphabet Inc. Class C"), "alphabet");
        assert_eq!(normalize_name("Samsung Electronics Co Ltd Preferred"), "samsung electronics");
        assert_eq!(normalize_name("BHP Group PLC ADR"), "bhp group");
    }

    #[test]
    fn test_normalize_name_share_classes() {
        assert_eq!(normalize_name("Berkshire Hathaway Inc Non-Voting"), "berkshire hathaway");
        assert_eq!(normalize_name("Fox Corp Class-B"), "fox");
        assert_eq!(normalize_name("Class Inc A Holdings"), "holdings");
        // Only single letters A-F are share classes.
        assert_eq!(normalize_name("First Class Z"), "first class z");
    }

    #[test]
    fn test_normalize_name_whole_words_only() {
        // "co" inside "coca" and "inc" inside "income" must survive.
        assert_eq!(normalize_name("Coca-Cola Co"), "coca cola");
        assert_eq!(normalize_name("Realty Income Corp"), "realty income");
    }

    #[test]
    fn test_normalize_name_dates() {
        assert_eq!(
            normalize_name("SPX PUT 12/20/24"),
            normalize_name("SPX PUT 3/21/2025")
        );
    }

    #[test]
    fn test_normalize_name_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("Inc."), "");
        assert_eq!(normalize_name(" -- "), "");
    }

    #[test]
    fn test_empty_dashes() {
        assert_eq!(empty_dashes("-"), "");
        assert_eq!(empty_dashes("--"), "--");
        assert_eq!(empty_dashes("B0YBKJ7"), "B0YBKJ7");
        assert!(!is_present("-"));
        assert!(!is_present(""));
        assert!(is_present("AAPL"));
    }

    #[test]
    fn test_blank_identifiers_are_absent() {
        assert_eq!(empty_dashes("  AAPL "), "AAPL");
        assert_eq!(empty_dashes(" - "), "");
        assert!(!is_present(" "));
        assert!(!is_present("\t\n"));
    }

    proptest! {
        #[test]
        fn prop_normalize_name_is_idempotent(s in "[ -~]{0,40}") {
            let once = normalize_name(&s);
            prop_assert_eq!(normalize_name(&once), once.clone());
            prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
            prop_assert!(!once.contains("  "));
        }

        #[test]
        fn prop_parse_money_parens_negate(cents in 0i64..10_000_000) {
            let value = Decimal::new(cents, 2);
            let text = format!("({})", value);
            prop_assert_eq!(parse_money(&text).unwrap(), -value);
        }
    }
}
