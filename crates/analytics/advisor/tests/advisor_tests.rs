//! Suggestion rule table and trend classification tests

use advisor::{AdvisorConfig, MacdBias, MaRegime, RsiZone, Suggestion, SuggestionEngine};
use assert_matches::assert_matches;
use chrono::NaiveDate;
use indicators::IndicatorSnapshot;
use options_engine::ExpirationSummary;
use rstest::*;

fn summary(day: u32, average_implied_volatility: f64) -> ExpirationSummary {
    ExpirationSummary {
        expiration_date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
        average_implied_volatility,
        days_to_expiry: i64::from(day),
    }
}

fn snapshot(readings: &[(&str, Option<f64>)]) -> IndicatorSnapshot {
    IndicatorSnapshot {
        values: readings
            .iter()
            .map(|(name, value)| ((*name).to_string(), *value))
            .collect(),
    }
}

#[fixture]
fn engine() -> SuggestionEngine {
    SuggestionEngine::default()
}

#[rstest]
#[case(0.31, Some("high IV: favor premium-selling strategies"))]
#[case(0.30, None)]
#[case(0.25, None)]
#[case(0.20, None)]
#[case(0.19, Some("low IV: favor premium-buying strategies"))]
fn test_iv_bands(engine: SuggestionEngine, #[case] iv: f64, #[case] expected: Option<&str>) {
    let got = engine.classify_expiration(&summary(19, iv));
    assert_eq!(got.as_ref().map(Suggestion::message), expected);
}

#[rstest]
#[case(Some(70.5), Some("overbought: RSI signals a stretched advance"))]
#[case(Some(70.0), None)]
#[case(Some(50.0), None)]
#[case(Some(30.0), None)]
#[case(Some(12.0), Some("oversold: RSI signals a stretched decline"))]
#[case(None, None)]
fn test_rsi_notes(
    engine: SuggestionEngine,
    #[case] rsi: Option<f64>,
    #[case] expected: Option<&str>,
) {
    let got = engine.classify_rsi(rsi);
    assert_eq!(got.as_ref().map(Suggestion::message), expected);
}

#[rstest]
fn test_expirations_in_order_then_rsi_note(engine: SuggestionEngine) {
    let summaries = [summary(5, 0.45), summary(12, 0.25), summary(19, 0.15)];
    let out = engine.suggest(&summaries, &snapshot(&[("RSI", Some(81.0))]));

    assert_eq!(out.len(), 3);
    assert_matches!(out[0], Suggestion::HighIv { average_iv, .. } if average_iv == 0.45);
    assert_eq!(out[0].expiration_date(), NaiveDate::from_ymd_opt(2024, 7, 5));
    assert_matches!(out[1], Suggestion::LowIv { .. });
    assert_matches!(out[2], Suggestion::Overbought { rsi } if rsi == 81.0);
    assert_eq!(out[2].to_string(), out[2].message());
}

#[rstest]
fn test_nothing_fires_is_empty(engine: SuggestionEngine) {
    assert!(engine.suggest(&[], &IndicatorSnapshot::default()).is_empty());
    assert!(engine
        .suggest(&[summary(1, 0.22)], &snapshot(&[("RSI", Some(55.0))]))
        .is_empty());
}

#[rstest]
fn test_candidate_strategies_follow_regime(engine: SuggestionEngine) {
    let high = engine.classify_expiration(&summary(2, 0.5)).unwrap();
    let low = engine.classify_expiration(&summary(2, 0.1)).unwrap();

    assert!(high.candidate_strategies().contains(&"iron condor"));
    assert!(low.candidate_strategies().contains(&"long straddle"));
    assert!(Suggestion::Oversold { rsi: 10.0 }.candidate_strategies().is_empty());
}

#[rstest]
fn test_custom_thresholds() {
    let engine = SuggestionEngine::new(AdvisorConfig {
        high_iv_threshold: 0.5,
        ..AdvisorConfig::default()
    });
    assert_eq!(engine.classify_expiration(&summary(3, 0.45)), None);
}

#[rstest]
fn test_trend_reading(engine: SuggestionEngine) {
    let reading = engine.trend(&snapshot(&[
        ("MA10", Some(105.0)),
        ("MA50", Some(100.0)),
        ("MACD", Some(-0.4)),
        ("SignalLine", Some(-0.1)),
        ("RSI", Some(25.0)),
    ]));

    assert_eq!(reading.ma_regime, Some(MaRegime::GoldenCross));
    assert_eq!(reading.macd_bias, Some(MacdBias::Bearish));
    assert_eq!(reading.rsi_zone, Some(RsiZone::Oversold));
}

#[rstest]
fn test_trend_absent_inputs_stay_absent(engine: SuggestionEngine) {
    let reading = engine.trend(&snapshot(&[("MA10", Some(105.0)), ("MA50", None)]));
    assert_eq!(reading, advisor::TrendReading::default());
}
