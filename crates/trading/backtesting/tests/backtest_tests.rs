//! Crossover backtest tests

use approx::assert_abs_diff_eq;
use assert_matches::assert_matches;
use backtesting::{BacktestConfig, BacktestSimulator};
use chrono::{Duration, NaiveDate};
use common::{AnalyticsError, Bar, TimeSeries};
use indicators::{Indicator, IndicatorConfig, IndicatorEngine, IndicatorSeries};
use rstest::*;

fn series_from(closes: &[f64]) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| Bar::flat(start + Duration::days(i as i64), c, 5_000.0))
        .collect();
    TimeSeries::new(bars).unwrap()
}

/// `MA2` and `MA3` columns standing in for the short and long averages
fn crossover_columns(short: &[f64], long: f64) -> IndicatorSeries {
    let mut out = IndicatorSeries::new(short.len());
    out.insert("MA2", short.iter().copied().map(Some).collect()).unwrap();
    out.insert("MA3", vec![Some(long); short.len()]).unwrap();
    out
}

#[fixture]
fn simulator() -> BacktestSimulator {
    BacktestSimulator::new(BacktestConfig {
        short_window: 2,
        long_window: 3,
        ..BacktestConfig::default()
    })
}

fn assert_pnl_reconciles(result: &backtesting::BacktestResult) {
    assert_abs_diff_eq!(
        result.realized_profit + result.unrealized_profit,
        result.final_balance - result.initial_balance,
        epsilon = 1e-9
    );
}

#[rstest]
fn test_round_trip_realizes_net_of_both_costs(simulator: BacktestSimulator) {
    let mut closes: Vec<f64> = (0..12).map(|i| 40.0 + i as f64).collect();
    closes[5] = 50.0;
    closes[10] = 60.0;
    let mut short = vec![99.0; 12];
    short[5..10].fill(101.0);

    let result = simulator
        .run(&series_from(&closes), &crossover_columns(&short, 100.0))
        .unwrap();

    assert_eq!(result.trade_log.len(), 1);
    assert_eq!(result.closed_trades, 1);
    assert_eq!(result.open_trades, 0);

    let trade = &result.trade_log[0];
    assert_eq!(trade.entry_index, 5);
    assert_eq!(trade.exit_index, Some(10));
    assert_eq!(trade.exit_price, Some(60.0));
    assert_abs_diff_eq!(trade.position_size, 200.0, epsilon = 1e-12);
    // 200 * 60 - 10 - (10_000 + 10)
    assert_abs_diff_eq!(trade.realized_pnl.unwrap(), 1_980.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.final_balance, 11_980.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.total_profit, 1_980.0, epsilon = 1e-9);
    assert_pnl_reconciles(&result);
}

#[rstest]
fn test_flat_round_trip_costs_both_fees(simulator: BacktestSimulator) {
    // Entry at index 1 and exit at index 3, both on a close of 50
    let closes = [49.0, 50.0, 51.0, 50.0, 52.0, 48.0];
    let short = [99.0, 101.0, 101.0, 99.0, 99.0, 99.0];

    let result = simulator
        .run(&series_from(&closes), &crossover_columns(&short, 100.0))
        .unwrap();

    assert_eq!(result.closed_trades, 1);
    assert_abs_diff_eq!(result.final_balance, 10_000.0 - 2.0 * 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(result.trade_log[0].realized_pnl.unwrap(), -20.0, epsilon = 1e-9);
}

#[rstest]
fn test_single_up_cross_stays_long(simulator: BacktestSimulator) {
    let closes: Vec<f64> = (0..10).map(|i| 20.0 + 2.0 * i as f64).collect();
    let short = [99.0, 99.0, 99.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0, 107.0];

    let result = simulator
        .run(&series_from(&closes), &crossover_columns(&short, 100.0))
        .unwrap();

    assert_eq!(result.trade_log.len(), 1);
    assert_eq!(result.closed_trades, 0);
    assert_eq!(result.open_trades, 1);
    let open = result.open_position().unwrap();
    assert_eq!(open.entry_index, 3);
    assert_eq!(open.realized_pnl, None);
    // 10_000 / 26 units marked at 38, less the entry fee
    assert_abs_diff_eq!(result.final_balance, 10_000.0 / 26.0 * 38.0 - 10.0, epsilon = 1e-9);
    assert_eq!(result.realized_profit, 0.0);
    assert_pnl_reconciles(&result);
}

#[rstest]
fn test_equal_averages_defer_the_cross(simulator: BacktestSimulator) {
    let closes = [10.0, 11.0, 12.0, 13.0];
    let short = [99.0, 100.0, 100.0, 101.0];

    let result = simulator
        .run(&series_from(&closes), &crossover_columns(&short, 100.0))
        .unwrap();

    assert_eq!(result.trade_log[0].entry_index, 3);
}

#[rstest]
fn test_touching_from_below_is_not_a_cross(simulator: BacktestSimulator) {
    let closes = [10.0, 11.0, 12.0, 11.0];
    let short = [99.0, 100.0, 99.0, 98.0];

    let result = simulator
        .run(&series_from(&closes), &crossover_columns(&short, 100.0))
        .unwrap();

    assert!(result.trade_log.is_empty());
    assert_eq!(result.final_balance, 10_000.0);
    assert_eq!(result.equity_curve, vec![10_000.0; 4]);
}

#[rstest]
fn test_missing_or_empty_averages_fail(simulator: BacktestSimulator) {
    let series = series_from(&[10.0, 11.0, 12.0]);

    let mut only_short = IndicatorSeries::new(3);
    only_short.insert("MA2", vec![None, Some(10.5), Some(11.5)]).unwrap();
    assert_matches!(
        simulator.run(&series, &only_short),
        Err(AnalyticsError::MissingIndicator(name)) if name == "MA3"
    );

    let mut absent = only_short.clone();
    absent.insert("MA3", vec![None; 3]).unwrap();
    assert_matches!(simulator.run(&series, &absent), Err(AnalyticsError::MissingIndicator(_)));
}

#[rstest]
fn test_misaligned_indicators_are_rejected(simulator: BacktestSimulator) {
    let series = series_from(&[10.0, 11.0, 12.0]);

    let short_columns = r#"{"len":3,"columns":{"MA2":[1.0],"MA3":[2.0]}}"#;
    assert!(serde_json::from_str::<IndicatorSeries>(short_columns).is_err());

    let two_bars = crossover_columns(&[9.0, 11.0], 10.0);
    assert_matches!(
        simulator.run(&series, &two_bars),
        Err(AnalyticsError::MalformedSeries(_))
    );
}

#[rstest]
fn test_v_shaped_series_through_indicator_engine() {
    let closes: Vec<f64> = (0..40)
        .map(|i| if i < 15 { 100.0 - 2.0 * i as f64 } else { 72.0 + 3.0 * (i - 14) as f64 })
        .collect();
    let series = series_from(&closes);
    let engine = IndicatorEngine::new(IndicatorConfig {
        ma_windows: vec![3, 8],
        ..IndicatorConfig::default()
    });
    let indicators = engine.compute(&series, &[Indicator::MovingAverages]).unwrap();
    let simulator = BacktestSimulator::new(BacktestConfig {
        short_window: 3,
        long_window: 8,
        ..BacktestConfig::default()
    });

    let result = simulator.run(&series, &indicators).unwrap();

    assert_eq!(result.trade_log.len(), 1);
    assert!(result.trade_log[0].entry_index > 14);
    assert!(result.total_profit > 0.0);
    assert_eq!(result.equity_curve.len(), 40);
    assert_pnl_reconciles(&result);
}

#[rstest]
fn test_sharpe_uses_bar_returns(simulator: BacktestSimulator) {
    let closes = [10.0, 11.0, 10.5, 12.0];
    let series = series_from(&closes);
    let result = simulator
        .run(&series, &crossover_columns(&[99.0, 99.0, 99.0, 99.0], 100.0))
        .unwrap();
    let expected = risk::RiskCalculator::default().sharpe_ratio(&series).unwrap();

    assert_abs_diff_eq!(result.sharpe_ratio, expected, epsilon = 1e-12);
}
