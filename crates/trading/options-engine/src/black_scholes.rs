//! Black-Scholes mathematics (European options, no dividends)

use common::OptionType;
use serde::{Deserialize, Serialize};

const SQRT_2PI: f64 = 2.506_628_274_631_000_7;

/// First-order Greeks of one option
///
/// Theta is per year and vega per unit of volatility (not per 1% move);
/// callers scale them for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    /// Rate of change of option price with respect to underlying price
    pub delta: f64,
    /// Rate of change of delta with respect to underlying price
    pub gamma: f64,
    /// Time decay - rate of change of option price with respect to time
    pub theta: f64,
    /// Sensitivity to volatility changes
    pub vega: f64,
}

/// Greeks of one quote, or an explicit marker that they cannot be computed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GreeksResult {
    Defined(Greeks),
    /// Expired contract, non-positive volatility or unusable prices
    Undefined,
}

impl GreeksResult {
    #[must_use]
    pub const fn defined(&self) -> Option<&Greeks> {
        match self {
            Self::Defined(greeks) => Some(greeks),
            Self::Undefined => None,
        }
    }

    #[must_use]
    pub const fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }
}

/// Black-Scholes option pricing model implementation
#[derive(Debug)]
pub struct BlackScholes;

impl BlackScholes {
    /// Standard normal cumulative distribution function
    #[must_use]
    pub fn norm_cdf(x: f64) -> f64 {
        0.5 * (1.0 + libm::erf(x / std::f64::consts::SQRT_2))
    }

    /// Standard normal probability density function
    #[must_use]
    pub fn norm_pdf(x: f64) -> f64 {
        (-0.5 * x * x).exp() / SQRT_2PI
    }

    /// Calculate d1 parameter
    #[must_use]
    pub fn d1(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
        ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
    }

    /// Calculate d2 parameter
    #[must_use]
    pub fn d2(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> f64 {
        Self::d1(s, k, r, sigma, t) - sigma * t.sqrt()
    }

    /// Inputs the closed form is defined for
    fn is_priceable(spot: f64, strike: f64, rate: f64, volatility: f64, time: f64) -> bool {
        [spot, strike, rate, volatility, time].iter().all(|v| v.is_finite())
            && spot > 0.0
            && strike > 0.0
            && volatility > 0.0
            && time > 0.0
    }

    /// Black-Scholes theoretical price; `None` where Greeks are undefined
    #[must_use]
    pub fn price(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        time: f64,
    ) -> Option<f64> {
        if !Self::is_priceable(spot, strike, rate, volatility, time) {
            return None;
        }

        let d1 = Self::d1(spot, strike, rate, volatility, time);
        let d2 = Self::d2(spot, strike, rate, volatility, time);
        let discount = (-rate * time).exp();

        let price = match option_type {
            OptionType::Call => spot * Self::norm_cdf(d1) - strike * discount * Self::norm_cdf(d2),
            OptionType::Put => strike * discount * Self::norm_cdf(-d2) - spot * Self::norm_cdf(-d1),
        };
        price.is_finite().then_some(price)
    }

    /// Delta, gamma, theta and vega
    ///
    /// `time` is in years. An expired contract (`time <= 0`) or a
    /// non-positive volatility yields [`GreeksResult::Undefined`].
    #[must_use]
    pub fn calculate_greeks(
        option_type: OptionType,
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        time: f64,
    ) -> GreeksResult {
        if !Self::is_priceable(spot, strike, rate, volatility, time) {
            return GreeksResult::Undefined;
        }

        let sqrt_t = time.sqrt();
        let d1 = Self::d1(spot, strike, rate, volatility, time);
        let d2 = Self::d2(spot, strike, rate, volatility, time);
        let npd1 = Self::norm_pdf(d1);
        let discount = (-rate * time).exp();
        let decay = -spot * npd1 * volatility / (2.0 * sqrt_t);

        let greeks = Greeks {
            delta: match option_type {
                OptionType::Call => Self::norm_cdf(d1),
                OptionType::Put => Self::norm_cdf(d1) - 1.0,
            },
            gamma: npd1 / (spot * volatility * sqrt_t),
            theta: match option_type {
                OptionType::Call => decay - rate * strike * discount * Self::norm_cdf(d2),
                OptionType::Put => decay + rate * strike * discount * Self::norm_cdf(-d2),
            },
            vega: spot * npd1 * sqrt_t,
        };

        let finite = [greeks.delta, greeks.gamma, greeks.theta, greeks.vega]
            .iter()
            .all(|v| v.is_finite());
        if finite {
            GreeksResult::Defined(greeks)
        } else {
            GreeksResult::Undefined
        }
    }
}
