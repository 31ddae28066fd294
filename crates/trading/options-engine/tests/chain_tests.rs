//! Option chain analysis tests

use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use chrono::NaiveDate;
use common::{AnalyticsError, ExpirationSlice, OptionChain, OptionQuote, OptionType};
use options_engine::{OptionsAnalytics, OptionsConfig, Outcome};
use rstest::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn quote(expiry: NaiveDate, option_type: OptionType, strike: f64, iv: f64) -> OptionQuote {
    OptionQuote {
        strike,
        expiration_date: expiry,
        last_price: 2.5,
        implied_volatility: iv,
        option_type,
    }
}

#[fixture]
fn valuation_date() -> NaiveDate {
    date(2024, 6, 3)
}

#[fixture]
fn chain() -> OptionChain {
    let near = date(2024, 6, 21);
    let far = date(2024, 9, 20);
    OptionChain::from_quotes(vec![
        quote(near, OptionType::Call, 95.0, 0.20),
        quote(near, OptionType::Call, 100.0, 0.25),
        quote(near, OptionType::Put, 100.0, 0.30),
        quote(far, OptionType::Call, 100.0, 0.22),
        quote(far, OptionType::Put, 105.0, 0.24),
    ])
}

#[rstest]
#[case(true)]
#[case(false)]
fn test_average_iv_over_calls_and_puts(
    chain: OptionChain,
    valuation_date: NaiveDate,
    #[case] parallel: bool,
) {
    let analytics = OptionsAnalytics::new(OptionsConfig {
        parallel,
        ..OptionsConfig::default()
    });
    let analysis = analytics.analyze_chain(&chain, 100.0, valuation_date).unwrap();
    let summaries = analysis.summaries();

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].expiration_date, date(2024, 6, 21));
    assert_eq!(summaries[0].days_to_expiry, 18);
    assert_abs_diff_eq!(summaries[0].average_implied_volatility, 0.25, epsilon = 1e-12);
    assert_abs_diff_eq!(summaries[1].average_implied_volatility, 0.23, epsilon = 1e-12);
    assert_eq!(analysis.failures().count(), 0);
}

#[rstest]
fn test_report_splits_calls_and_puts(chain: OptionChain, valuation_date: NaiveDate) {
    let analysis = OptionsAnalytics::default()
        .analyze_chain(&chain, 100.0, valuation_date)
        .unwrap();
    let report = analysis.expirations[0].report().unwrap();

    assert_eq!(report.calls.len(), 2);
    assert_eq!(report.puts.len(), 1);
    assert_abs_diff_eq!(report.calls[0].moneyness, 100.0 / 95.0, epsilon = 1e-12);
    assert!(report.calls[0].theoretical_price.unwrap() > 5.0);
    assert!(report.puts[0].greeks.defined().unwrap().delta < 0.0);
}

#[rstest]
fn test_malformed_expiration_is_collected(valuation_date: NaiveDate) {
    let good = date(2024, 7, 19);
    let bad = date(2024, 8, 16);
    let chain = OptionChain::from_quotes(vec![
        quote(good, OptionType::Call, 100.0, 0.3),
        quote(bad, OptionType::Put, 100.0, f64::NAN),
    ]);

    let analysis = OptionsAnalytics::default()
        .analyze_chain(&chain, 100.0, valuation_date)
        .unwrap();
    let failures: Vec<_> = analysis.failures().collect();

    assert_eq!(analysis.summaries().len(), 1);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, bad);
    assert!(failures[0].1.starts_with("Malformed quote"));
}

#[rstest]
fn test_empty_expiration_fails(valuation_date: NaiveDate) {
    let slice = ExpirationSlice {
        expiration_date: date(2024, 7, 19),
        quotes: Vec::new(),
    };
    let err = OptionsAnalytics::default()
        .analyze_expiration(&slice, 100.0, valuation_date)
        .unwrap_err();
    assert_matches!(err, AnalyticsError::MalformedQuote(_));
}

#[rstest]
fn test_expired_and_zero_vol_quotes_are_undefined(valuation_date: NaiveDate) {
    let chain = OptionChain::from_quotes(vec![
        quote(valuation_date, OptionType::Call, 100.0, 0.3),
        quote(date(2024, 7, 19), OptionType::Call, 100.0, 0.0),
    ]);
    let analysis = OptionsAnalytics::default()
        .analyze_chain(&chain, 100.0, valuation_date)
        .unwrap();

    for outcome in &analysis.expirations {
        let report = outcome.report().unwrap();
        assert!(report.calls[0].greeks.is_undefined());
        assert_eq!(report.calls[0].theoretical_price, None);
    }
}

#[rstest]
fn test_negative_vol_quote_is_undefined_not_a_failure(valuation_date: NaiveDate) {
    let expiry = date(2024, 7, 19);
    let chain = OptionChain::from_quotes(vec![
        quote(expiry, OptionType::Call, 100.0, 0.3),
        quote(expiry, OptionType::Put, 100.0, -0.1),
    ]);
    let analysis = OptionsAnalytics::default()
        .analyze_chain(&chain, 100.0, valuation_date)
        .unwrap();

    assert_eq!(analysis.failures().count(), 0);
    let report = assert_matches!(&analysis.expirations[0].outcome, Outcome::Success(r) => r);
    assert!(report.calls[0].greeks.defined().is_some());
    assert!(report.puts[0].greeks.is_undefined());
    assert_eq!(report.puts[0].theoretical_price, None);
    assert_abs_diff_eq!(report.summary.average_implied_volatility, 0.1, epsilon = 1e-12);
}

#[rstest]
fn test_empty_chain_is_no_options_data(valuation_date: NaiveDate) {
    let err = OptionsAnalytics::default()
        .analyze_chain(&OptionChain::default(), 100.0, valuation_date)
        .unwrap_err();
    assert_matches!(err, AnalyticsError::NoOptionsData(_));
}

#[rstest]
fn test_external_rate_overrides_default(chain: OptionChain, valuation_date: NaiveDate) {
    let analysis = OptionsAnalytics::default()
        .with_risk_free_rate(Some(0.05))
        .analyze_chain(&chain, 100.0, valuation_date)
        .unwrap();
    assert_eq!(analysis.risk_free_rate, 0.05);
    assert_matches!(analysis.expirations[1].outcome, Outcome::Success(_));
}
