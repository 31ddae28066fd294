//! Indicator kernels over plain price slices
//!
//! Windowed kernels return `None` until the window has filled. EMA-based
//! kernels are seeded with the first value and are defined from index 0
//! (pandas `ewm(span, adjust=False)` semantics).

#![allow(clippy::cast_precision_loss)]

/// Simple moving average; defined from index `window - 1`
#[must_use]
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, mean)
}

/// Rolling population standard deviation; defined from index `window - 1`
#[must_use]
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        let m = mean(w);
        (w.iter().map(|x| (x - m).powi(2)).sum::<f64>() / w.len() as f64).sqrt()
    })
}

/// Exponential moving average with smoothing factor `2 / (span + 1)`
#[must_use]
pub fn exponential_moving_average(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &value in values {
        let next = match prev {
            None => value,
            Some(p) => alpha * value + (1.0 - alpha) * p,
        };
        out.push(next);
        prev = Some(next);
    }

    out
}

/// Relative Strength Index over simple rolling means of gains and losses
///
/// The first bar has no predecessor and contributes a zero delta, so the
/// first value appears at index `period - 1`. A window with losses but no
/// gains reads 0, gains but no losses reads 100, and a window with no price
/// movement at all is `None`.
#[must_use]
pub fn relative_strength_index(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let deltas: Vec<f64> = closes
        .iter()
        .enumerate()
        .map(|(i, c)| if i == 0 { 0.0 } else { c - closes[i - 1] })
        .collect();
    let gains: Vec<f64> = deltas.iter().map(|d| d.max(0.0)).collect();
    let losses: Vec<f64> = deltas.iter().map(|d| (-d).max(0.0)).collect();

    let avg_gain = simple_moving_average(&gains, period);
    let avg_loss = simple_moving_average(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain?, loss?) {
            (g, l) if l == 0.0 && g > 0.0 => Some(100.0),
            (_, l) if l == 0.0 => None,
            (g, l) => Some(100.0 - 100.0 / (1.0 + g / l)),
        })
        .collect()
}

/// MACD line and its signal line
#[must_use]
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> (Vec<f64>, Vec<f64>) {
    let fast_ema = exponential_moving_average(closes, fast);
    let slow_ema = exponential_moving_average(closes, slow);
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = exponential_moving_average(&line, signal);
    (line, signal_line)
}

/// Bollinger middle, upper and lower bands
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Rolling mean +/- `k` rolling population standard deviations
#[must_use]
pub fn bollinger_bands(closes: &[f64], window: usize, k: f64) -> Bands {
    let middle = simple_moving_average(closes, window);
    let std = rolling_std(closes, window);

    let (upper, lower): (Vec<Option<f64>>, Vec<Option<f64>>) = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + k * s), Some(m - k * s)),
            _ => (None, None),
        })
        .unzip();

    Bands {
        middle,
        upper,
        lower,
    }
}

fn rolling(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<Option<f64>> {
    if window == 0 || values.len() < window {
        return vec![None; values.len()];
    }

    let mut out = vec![None; window - 1];
    out.extend(values.windows(window).map(|w| Some(f(w))));
    out
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
