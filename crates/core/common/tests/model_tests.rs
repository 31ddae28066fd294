//! Data model tests

use assert_matches::assert_matches;
use chrono::NaiveDate;
use common::{AnalyticsError, OptionChain, OptionQuote, OptionType, TimeSeries};
use rstest::*;

fn date(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn quote(expiry: NaiveDate, option_type: OptionType) -> OptionQuote {
    OptionQuote {
        strike: 100.0,
        expiration_date: expiry,
        last_price: 1.0,
        implied_volatility: 0.2,
        option_type,
    }
}

#[rstest]
fn test_series_deserializes_through_validation() {
    let ok = r#"[
        {"date":"2024-01-02","open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":10.0},
        {"date":"2024-01-03","open":1.0,"high":1.2,"low":1.0,"close":1.1,"volume":12.0}
    ]"#;
    let series: TimeSeries = serde_json::from_str(ok).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series.closes(), vec![1.0, 1.1]);

    let unordered = r#"[
        {"date":"2024-01-03","open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":10.0},
        {"date":"2024-01-02","open":1.0,"high":1.0,"low":1.0,"close":1.0,"volume":10.0}
    ]"#;
    assert!(serde_json::from_str::<TimeSeries>(unordered).is_err());
}

#[rstest]
fn test_chain_groups_by_expiration() {
    let chain = OptionChain::from_quotes(vec![
        quote(date(3, 15), OptionType::Put),
        quote(date(1, 19), OptionType::Call),
        quote(date(3, 15), OptionType::Call),
    ]);

    assert_eq!(chain.expirations.len(), 2);
    assert_eq!(chain.expirations[0].expiration_date, date(1, 19));
    assert_eq!(chain.expirations[1].calls().count(), 1);
    assert_eq!(chain.expirations[1].puts().count(), 1);
}

#[rstest]
#[case(date(1, 1), 2, vec![date(1, 19), date(2, 16)])]
#[case(date(2, 1), 8, vec![date(2, 16), date(3, 15)])]
#[case(date(4, 1), 8, vec![])]
fn test_nearest_expirations(
    #[case] as_of: NaiveDate,
    #[case] count: usize,
    #[case] expected: Vec<NaiveDate>,
) {
    let chain = OptionChain::from_quotes(
        [date(3, 15), date(1, 19), date(2, 16)]
            .into_iter()
            .map(|d| quote(d, OptionType::Call)),
    )
    .nearest(as_of, count);

    let dates: Vec<_> = chain.expirations.iter().map(|e| e.expiration_date).collect();
    assert_eq!(dates, expected);
}

#[rstest]
fn test_error_messages() {
    assert_eq!(
        AnalyticsError::insufficient(50, 30).to_string(),
        "Insufficient data: 50 bars required, 30 available"
    );
    assert_matches!(
        "x".parse::<OptionType>(),
        Err(AnalyticsError::MalformedQuote(msg)) if msg.contains("'x'")
    );
}
