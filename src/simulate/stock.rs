use super::{check_range, SimulationError};
use chrono::{NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub const MAX_POINTS: usize = 10_000;
const MAX_TICKER_LEN: usize = 10;

// Relative slope per step below which a series counts as flat
const FLAT_THRESHOLD: f64 = 0.0002;
// Standard deviation of step returns above which a series counts as volatile
const VOLATILE_THRESHOLD: f64 = 0.01;

/// Parameters of a synthetic price walk, all derived from the ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockParams {
    pub ticker: String,
    pub base_price: f64,
    pub volatility: f64,
    pub drift: f64,
    pub seed: u64,
}

impl StockParams {
    /// Derive walk parameters from a ticker symbol.
    ///
    /// The ticker is trimmed and upper-cased first, so "aapl " and "AAPL"
    /// produce the same series.
    pub fn from_ticker(ticker: &str) -> Result<Self, SimulationError> {
        let ticker = ticker.trim().to_ascii_uppercase();
        let valid = !ticker.is_empty()
            && ticker.len() <= MAX_TICKER_LEN
            && ticker
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !valid {
            return Err(SimulationError::InvalidTicker(ticker));
        }

        let bytes = ticker.as_bytes();
        let byte_sum: u64 = bytes.iter().map(|b| *b as u64).sum();
        let base_price = (byte_sum % 500 + 50) as f64;
        let volatility = 0.02 + (bytes.len() % 5) as f64 * 0.005;
        let drift = ((bytes[0] % 3) as f64 - 1.0) * 0.0005;

        Ok(Self {
            seed: fnv1a(bytes),
            ticker,
            base_price,
            volatility,
            drift,
        })
    }

    /// Replace the ticker-derived seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ *b as u64).wrapping_mul(PRIME))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub at: NaiveDateTime,
    pub time: String, // "HH:MM", or "HH:MM:SS" for sub-minute intervals
    pub price: f64,
}

/// Generate `points` prices ending at `end`, one every `interval`.
pub fn generate_history(
    params: &StockParams,
    points: usize,
    interval: Duration,
    end: NaiveDateTime,
) -> Result<Vec<PricePoint>, SimulationError> {
    check_range("points", points, 1, MAX_POINTS)?;
    let step = TimeDelta::from_std(interval)
        .ok()
        .filter(|d| *d > TimeDelta::zero())
        .ok_or(SimulationError::InvalidInterval(interval))?;
    let time_format = if interval < Duration::from_secs(60) {
        "%H:%M:%S"
    } else {
        "%H:%M"
    };

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut price = params.base_price;
    let mut history = Vec::with_capacity(points);

    for i in 0..points {
        let steps_back = (points - 1 - i) as i32;
        let at = step
            .checked_mul(steps_back)
            .and_then(|back| end.checked_sub_signed(back))
            .ok_or(SimulationError::InvalidInterval(interval))?;

        let shock = (rng.gen::<f64>() - 0.5) * params.volatility;
        price *= 1.0 + params.drift + shock;

        history.push(PricePoint {
            at,
            time: at.format(time_format).to_string(),
            price: round_cents(price),
        });
    }

    tracing::debug!(
        ticker = %params.ticker,
        points,
        seed = params.seed,
        "generated price history"
    );

    Ok(history)
}

fn round_cents(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Upward,
    Downward,
    Flat,
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendDirection::Upward => "upward",
            TrendDirection::Downward => "downward",
            TrendDirection::Flat => "flat",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub current: f64,
    pub predicted: f64,
    pub slope: f64,      // Price change per step, least squares
    pub change_pct: f64, // First to last point
    pub volatility: f64, // Standard deviation of step returns
    pub direction: TrendDirection,
    pub volatile: bool,
    pub summary: String,
}

/// Fit a linear trend to `history` and extrapolate one step ahead.
pub fn analyze(history: &[PricePoint]) -> Result<TrendAnalysis, SimulationError> {
    let first = history.first().ok_or(SimulationError::EmptyHistory)?.price;
    let current = history.last().ok_or(SimulationError::EmptyHistory)?.price;
    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();

    let slope = least_squares_slope(&prices);
    let volatility = return_volatility(&prices);
    let change_pct = if first != 0.0 {
        (current - first) / first * 100.0
    } else {
        0.0
    };

    let relative = if current != 0.0 { slope / current } else { 0.0 };
    let direction = if relative > FLAT_THRESHOLD {
        TrendDirection::Upward
    } else if relative < -FLAT_THRESHOLD {
        TrendDirection::Downward
    } else {
        TrendDirection::Flat
    };
    let volatile = volatility > VOLATILE_THRESHOLD;
    let predicted = round_cents(current + slope);

    let summary = format!(
        "{} trend over {} points ({:+.2}%){}; next price estimated at {:.2}",
        capitalize(&direction.to_string()),
        prices.len(),
        change_pct,
        if volatile { ", volatile" } else { "" },
        predicted
    );

    Ok(TrendAnalysis {
        current,
        predicted,
        slope,
        change_pct,
        volatility,
        direction,
        volatile,
        summary,
    })
}

fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean_x = (n - 1) as f64 / 2.0;
    let mean_y = values.iter().sum::<f64>() / n as f64;

    let (num, den) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(num, den), (i, y)| {
            let dx = i as f64 - mean_x;
            (num + dx * (y - mean_y), den + dx * dx)
        });
    num / den
}

fn return_volatility(values: &[f64]) -> f64 {
    let returns: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0] != 0.0)
        .map(|w| w[1] / w[0] - 1.0)
        .collect();
    if returns.is_empty() {
        return 0.0;
    }
    let mean = returns.iter().sum::<f64>() / returns.len() as f64;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn linear(prices: impl Iterator<Item = f64>) -> Vec<PricePoint> {
        prices
            .map(|price| PricePoint {
                at: end(),
                time: "10:00".to_string(),
                price,
            })
            .collect()
    }

    #[test]
    fn test_params_from_ticker() {
        let params = StockParams::from_ticker("AAPL").unwrap();
        // 65 + 65 + 80 + 76 = 286
        assert_eq!(params.base_price, 336.0);
        assert!((params.volatility - 0.04).abs() < 1e-12);
        assert_eq!(params.drift, 0.0005);
    }

    #[test]
    fn test_ticker_is_normalized() {
        let a = StockParams::from_ticker(" aapl ").unwrap();
        let b = StockParams::from_ticker("AAPL").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_tickers() {
        assert!(StockParams::from_ticker("").is_err());
        assert!(StockParams::from_ticker("   ").is_err());
        assert!(StockParams::from_ticker("TOOLONGTICKER").is_err());
        assert!(StockParams::from_ticker("AA PL").is_err());
        assert!(StockParams::from_ticker("BRK.B").is_ok());
    }

    #[test]
    fn test_different_tickers_differ() {
        let a = StockParams::from_ticker("AAPL").unwrap();
        let b = StockParams::from_ticker("MSFT").unwrap();
        assert_ne!(a.base_price, b.base_price);
        assert_ne!(a.seed, b.seed);
    }

    #[test]
    fn test_history_is_repeatable() {
        let params = StockParams::from_ticker("GOOGL").unwrap();
        let first = generate_history(&params, 60, Duration::from_secs(60), end()).unwrap();
        let second = generate_history(&params, 60, Duration::from_secs(60), end()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 60);
    }

    #[test]
    fn test_seed_override_changes_series() {
        let params = StockParams::from_ticker("GOOGL").unwrap();
        let a = generate_history(&params, 10, Duration::from_secs(60), end()).unwrap();
        let reseeded = params.clone().with_seed(7);
        let b = generate_history(&reseeded, 10, Duration::from_secs(60), end()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_history_timestamps() {
        let params = StockParams::from_ticker("AAPL").unwrap();
        let history = generate_history(&params, 3, Duration::from_secs(60), end()).unwrap();
        let times: Vec<&str> = history.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(times, vec!["09:58", "09:59", "10:00"]);
        assert_eq!(history[2].at, end());

        let history = generate_history(&params, 2, Duration::from_secs(30), end()).unwrap();
        assert_eq!(history[0].time, "09:59:30");
    }

    #[test]
    fn test_prices_rounded_and_near_base() {
        let params = StockParams::from_ticker("AAPL").unwrap();
        let history = generate_history(&params, 60, Duration::from_secs(60), end()).unwrap();
        for point in &history {
            assert_eq!(point.price, round_cents(point.price));
            assert!(point.price > 0.0);
        }
        // Each step moves at most drift + volatility / 2
        let first = history[0].price;
        assert!((first - params.base_price).abs() <= params.base_price * 0.021 + 0.01);
    }

    #[test]
    fn test_history_rejects_bad_arguments() {
        let params = StockParams::from_ticker("AAPL").unwrap();
        assert!(matches!(
            generate_history(&params, 0, Duration::from_secs(60), end()),
            Err(SimulationError::TooSmall { .. })
        ));
        assert!(matches!(
            generate_history(&params, 10, Duration::ZERO, end()),
            Err(SimulationError::InvalidInterval(_))
        ));
    }

    #[test]
    fn test_analyze_upward_series() {
        let history = linear((0..20).map(|i| 100.0 + i as f64));
        let analysis = analyze(&history).unwrap();
        assert_eq!(analysis.direction, TrendDirection::Upward);
        assert!((analysis.slope - 1.0).abs() < 1e-9);
        assert_eq!(analysis.current, 119.0);
        assert_eq!(analysis.predicted, 120.0);
        assert!(analysis.summary.starts_with("Upward trend over 20 points"));
    }

    #[test]
    fn test_analyze_downward_and_flat() {
        let down = analyze(&linear((0..20).map(|i| 200.0 - 2.0 * i as f64))).unwrap();
        assert_eq!(down.direction, TrendDirection::Downward);
        assert!(down.change_pct < 0.0);

        let flat = analyze(&linear(std::iter::repeat(50.0).take(10))).unwrap();
        assert_eq!(flat.direction, TrendDirection::Flat);
        assert_eq!(flat.volatility, 0.0);
        assert!(!flat.volatile);
    }

    #[test]
    fn test_analyze_flags_volatility() {
        let zigzag = linear((0..20).map(|i| if i % 2 == 0 { 100.0 } else { 110.0 }));
        let analysis = analyze(&zigzag).unwrap();
        assert!(analysis.volatile);
        assert!(analysis.summary.contains("volatile"));
    }

    #[test]
    fn test_analyze_single_point() {
        let analysis = analyze(&linear(std::iter::once(42.0))).unwrap();
        assert_eq!(analysis.slope, 0.0);
        assert_eq!(analysis.predicted, 42.0);
    }

    #[test]
    fn test_analyze_empty() {
        assert_eq!(analyze(&[]), Err(SimulationError::EmptyHistory));
    }
}
