use serde::{Deserialize, Serialize};

use crate::analysis::technicals::{calculate_sma, change_over, rate_of_change_pct};
use crate::core::timeseries::{clean_values, round_to};
use crate::error::UpstreamError;
use crate::fetcher::DataSource;

/// Momentum / change lookback, in trading days.
pub const MOMENTUM_PERIOD: usize = 20;
pub const DOLLAR_TREND_PERIOD: usize = 50;
pub const VIX_AVERAGE_PERIOD: usize = 20;

pub const DXY_SYMBOL: &str = "^DXY";
pub const VIX_SYMBOL: &str = "^VIX";
pub const SPY_SYMBOL: &str = "SPY";
pub const QQQ_SYMBOL: &str = "QQQ";
pub const GOLD_SYMBOL: &str = "GC=F";
pub const TEN_YEAR_SERIES: &str = "DGS10";
pub const TWO_YEAR_SERIES: &str = "DGS2";

/// Linear map from a driver reading onto a bounded sub-score:
/// `score = clamp(intercept + slope * reading, floor, ceiling)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriverSpec {
    pub name: &'static str,
    pub slope: f64,
    pub intercept: f64,
    pub floor: f64,
    pub ceiling: f64,
    pub weight: f64,
}

impl DriverSpec {
    /// A missing reading counts as 0.
    pub fn score(&self, reading: Option<f64>) -> f64 {
        let raw = self.intercept + self.slope * reading.unwrap_or(0.0);
        if raw.is_nan() {
            return self.floor;
        }
        raw.clamp(self.floor, self.ceiling)
    }
}

/// Weaker dollar momentum raises the score.
pub const DXY_DRIVER: DriverSpec = DriverSpec {
    name: "dxy",
    slope: -2.0,
    intercept: 50.0,
    floor: 0.0,
    ceiling: 100.0,
    weight: 0.25,
};
/// Falling 10Y yield (absolute change, in points) raises the score.
pub const TEN_DRIVER: DriverSpec = DriverSpec {
    name: "ten",
    slope: -5.0,
    intercept: 50.0,
    floor: 0.0,
    ceiling: 100.0,
    weight: 0.25,
};
/// VIX level; 50 at VIX 20, lower as fear rises.
pub const VIX_DRIVER: DriverSpec = DriverSpec {
    name: "vix",
    slope: -2.0,
    intercept: 90.0,
    floor: 0.0,
    ceiling: 100.0,
    weight: 0.20,
};
/// Positive S&P momentum raises the score.
pub const SPY_DRIVER: DriverSpec = DriverSpec {
    name: "spy",
    slope: 2.0,
    intercept: 50.0,
    floor: 0.0,
    ceiling: 100.0,
    weight: 0.20,
};
/// Positive gold momentum raises the score.
pub const GOLD_DRIVER: DriverSpec = DriverSpec {
    name: "gold",
    slope: 1.5,
    intercept: 50.0,
    floor: 0.0,
    ceiling: 100.0,
    weight: 0.10,
};

pub const DRIVERS: [DriverSpec; 5] = [DXY_DRIVER, TEN_DRIVER, VIX_DRIVER, SPY_DRIVER, GOLD_DRIVER];

// ============================================================================
// LABELS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DollarTrend {
    Strong,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DollarImpact {
    Headwind,
    Tailwind,
}

impl From<DollarTrend> for DollarImpact {
    fn from(trend: DollarTrend) -> Self {
        match trend {
            DollarTrend::Strong => DollarImpact::Headwind,
            DollarTrend::Weak => DollarImpact::Tailwind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YieldStatus {
    #[serde(rename = "INVERTED")]
    Inverted,
    #[serde(rename = "FLAT")]
    Flat,
    #[serde(rename = "STEEP")]
    Steep,
    #[serde(rename = "—")]
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VixStatus {
    #[serde(rename = "HIGH FEAR")]
    HighFear,
    #[serde(rename = "LOW FEAR")]
    LowFear,
    #[serde(rename = "NORMAL")]
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskAppetite {
    #[serde(rename = "RISK ON")]
    RiskOn,
    #[serde(rename = "RISK OFF")]
    RiskOff,
}

/// `STRONG` only when the latest value sits strictly above its 50-period average.
pub fn dollar_trend(dxy: &[f64]) -> DollarTrend {
    match (dxy.last(), calculate_sma(dxy, DOLLAR_TREND_PERIOD)) {
        (Some(&last), Some(sma)) if last > sma => DollarTrend::Strong,
        _ => DollarTrend::Weak,
    }
}

/// Latest VIX against its 20-period average, with 1.3x / 0.7x bands.
pub fn vix_status(last: Option<f64>, average: Option<f64>) -> VixStatus {
    match (last, average) {
        (Some(last), Some(avg)) if last != 0.0 && avg != 0.0 => {
            if last > avg * 1.3 {
                VixStatus::HighFear
            } else if last < avg * 0.7 {
                VixStatus::LowFear
            } else {
                VixStatus::Normal
            }
        }
        _ => VixStatus::Normal,
    }
}

pub fn yield_status(spread: Option<f64>) -> YieldStatus {
    match spread {
        None => YieldStatus::Unavailable,
        Some(s) if s < 0.0 => YieldStatus::Inverted,
        Some(s) if s < 0.5 => YieldStatus::Flat,
        Some(_) => YieldStatus::Steep,
    }
}

/// Equity momentum (SPY/QQQ mean) must beat gold momentum strictly; ties are risk-off.
pub fn risk_appetite(
    spy_mom: Option<f64>,
    qqq_mom: Option<f64>,
    gold_mom: Option<f64>,
) -> RiskAppetite {
    let risk_on = (spy_mom.unwrap_or(0.0) + qqq_mom.unwrap_or(0.0)) / 2.0;
    let risk_off = gold_mom.unwrap_or(0.0);
    if risk_on > risk_off {
        RiskAppetite::RiskOn
    } else {
        RiskAppetite::RiskOff
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Cleaned closes / yields feeding the composite, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MacroInputs {
    pub dxy: Vec<f64>,
    pub vix: Vec<f64>,
    pub spy: Vec<f64>,
    pub qqq: Vec<f64>,
    pub gold: Vec<f64>,
    pub dgs10: Vec<f64>,
    pub dgs2: Vec<f64>,
}

/// Fetches the seven series concurrently. The first failure aborts the whole group.
pub async fn load_inputs(
    fred: &dyn DataSource,
    yahoo: &dyn DataSource,
) -> Result<MacroInputs, UpstreamError> {
    let (dxy, vix, spy, qqq, gold, dgs10, dgs2) = tokio::try_join!(
        yahoo.fetch_data(DXY_SYMBOL),
        yahoo.fetch_data(VIX_SYMBOL),
        yahoo.fetch_data(SPY_SYMBOL),
        yahoo.fetch_data(QQQ_SYMBOL),
        yahoo.fetch_data(GOLD_SYMBOL),
        fred.fetch_data(TEN_YEAR_SERIES),
        fred.fetch_data(TWO_YEAR_SERIES),
    )?;

    Ok(MacroInputs {
        dxy: clean_values(&dxy),
        vix: clean_values(&vix),
        spy: clean_values(&spy),
        qqq: clean_values(&qqq),
        gold: clean_values(&gold),
        dgs10: clean_values(&dgs10),
        dgs2: clean_values(&dgs2),
    })
}

/// Driver readings derived from [`MacroInputs`]; `None` where history is too short.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriverReadings {
    pub dxy_momentum: Option<f64>,
    pub ten_change: Option<f64>,
    pub vix_last: Option<f64>,
    pub vix_average: Option<f64>,
    pub spy_momentum: Option<f64>,
    pub qqq_momentum: Option<f64>,
    pub gold_momentum: Option<f64>,
}

impl DriverReadings {
    pub fn from_inputs(inputs: &MacroInputs) -> Self {
        Self {
            dxy_momentum: rate_of_change_pct(&inputs.dxy, MOMENTUM_PERIOD),
            ten_change: change_over(&inputs.dgs10, MOMENTUM_PERIOD),
            vix_last: inputs.vix.last().copied(),
            vix_average: calculate_sma(&inputs.vix, VIX_AVERAGE_PERIOD),
            spy_momentum: rate_of_change_pct(&inputs.spy, MOMENTUM_PERIOD),
            qqq_momentum: rate_of_change_pct(&inputs.qqq, MOMENTUM_PERIOD),
            gold_momentum: rate_of_change_pct(&inputs.gold, MOMENTUM_PERIOD),
        }
    }
}

/// Unrounded sub-scores and their weighted combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositeScore {
    pub dxy: f64,
    pub ten: f64,
    pub vix: f64,
    pub spy: f64,
    pub gold: f64,
    pub macro_score: f64,
}

impl CompositeScore {
    pub fn from_readings(r: &DriverReadings) -> Self {
        let dxy = DXY_DRIVER.score(r.dxy_momentum);
        let ten = TEN_DRIVER.score(r.ten_change);
        let vix = VIX_DRIVER.score(r.vix_last);
        let spy = SPY_DRIVER.score(r.spy_momentum);
        let gold = GOLD_DRIVER.score(r.gold_momentum);

        let macro_score = [dxy, ten, vix, spy, gold]
            .iter()
            .zip(DRIVERS.iter())
            .map(|(score, spec)| score * spec.weight)
            .sum();

        Self { dxy, ten, vix, spy, gold, macro_score }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroMetrics {
    #[serde(rename = "macro")]
    pub macro_score: f64,
    pub dxy_score: u32,
    pub ten_score: u32,
    pub vix_score: u32,
    pub spy_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroStatus {
    pub dxy_trend: DollarTrend,
    pub dollar_impact: DollarImpact,
    pub yield_status: YieldStatus,
    pub vix_status: VixStatus,
    pub risk_appetite: RiskAppetite,
    pub ten_year: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroReport {
    pub metrics: MacroMetrics,
    pub status: MacroStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MacroReport {
    pub fn compute(inputs: &MacroInputs) -> Self {
        let readings = DriverReadings::from_inputs(inputs);
        let composite = CompositeScore::from_readings(&readings);

        let dxy_trend = dollar_trend(&inputs.dxy);
        let ten = inputs.dgs10.last().copied();
        let two = inputs.dgs2.last().copied();
        let spread = ten.zip(two).map(|(t, s)| t - s);

        MacroReport {
            metrics: MacroMetrics {
                macro_score: round_to(composite.macro_score, 1),
                dxy_score: composite.dxy.round() as u32,
                ten_score: composite.ten.round() as u32,
                vix_score: composite.vix.round() as u32,
                spy_score: composite.spy.round() as u32,
            },
            status: MacroStatus {
                dxy_trend,
                dollar_impact: dxy_trend.into(),
                yield_status: yield_status(spread),
                vix_status: vix_status(readings.vix_last, readings.vix_average),
                risk_appetite: risk_appetite(
                    readings.spy_momentum,
                    readings.qqq_momentum,
                    readings.gold_momentum,
                ),
                ten_year: ten.map(|t| format!("{:.2}", t)),
            },
            error: None,
        }
    }

    /// Neutral report served when the feed cannot be computed.
    pub fn fallback(error: impl Into<String>) -> Self {
        MacroReport {
            metrics: MacroMetrics {
                macro_score: 50.0,
                dxy_score: 50,
                ten_score: 50,
                vix_score: 50,
                spy_score: 50,
            },
            status: MacroStatus {
                dxy_trend: DollarTrend::Weak,
                dollar_impact: DollarImpact::Tailwind,
                yield_status: YieldStatus::Unavailable,
                vix_status: VixStatus::Normal,
                risk_appetite: RiskAppetite::RiskOn,
                ten_year: None,
            },
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: f64, len: usize) -> Vec<f64> {
        vec![value; len]
    }

    /// `len` points ending at `last`, with `base` exactly 20 periods back.
    fn momentum_series(base: f64, last: f64, len: usize) -> Vec<f64> {
        let mut series = vec![base; len];
        if let Some(l) = series.last_mut() {
            *l = last;
        }
        series
    }

    fn neutral_inputs() -> MacroInputs {
        MacroInputs {
            dxy: flat(104.0, 60),
            vix: flat(20.0, 60),
            spy: flat(500.0, 60),
            qqq: flat(430.0, 60),
            gold: flat(2000.0, 60),
            dgs10: flat(4.0, 60),
            dgs2: flat(3.5, 60),
        }
    }

    #[test]
    fn test_driver_weights_sum_to_one() {
        let total: f64 = DRIVERS.iter().map(|d| d.weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scores_clamped_for_extreme_inputs() {
        for spec in DRIVERS {
            let readings = [
                -1e12,
                -500.0,
                -1.0,
                0.0,
                1.0,
                500.0,
                1e12,
                f64::INFINITY,
                f64::NEG_INFINITY,
            ];
            for reading in readings {
                let score = spec.score(Some(reading));
                assert!((0.0..=100.0).contains(&score), "{} {} -> {}", spec.name, reading, score);
            }
            let score = spec.score(None);
            assert!((0.0..=100.0).contains(&score));
        }
    }

    #[test]
    fn test_driver_directions() {
        assert_eq!(DXY_DRIVER.score(Some(5.0)), 40.0);
        assert_eq!(TEN_DRIVER.score(Some(-1.0)), 55.0);
        assert_eq!(VIX_DRIVER.score(Some(20.0)), 50.0);
        assert_eq!(VIX_DRIVER.score(Some(45.0)), 0.0);
        assert_eq!(SPY_DRIVER.score(Some(10.0)), 70.0);
        assert_eq!(GOLD_DRIVER.score(Some(-10.0)), 35.0);
    }

    #[test]
    fn test_missing_reading_coalesces_to_zero() {
        assert_eq!(SPY_DRIVER.score(None), 50.0);
        // VIX of 0 is far below 20, so a missing VIX reads as calm
        assert_eq!(VIX_DRIVER.score(None), 90.0);
    }

    #[test]
    fn test_neutral_inputs_give_fifty() {
        let report = MacroReport::compute(&neutral_inputs());
        assert_eq!(report.metrics.macro_score, 50.0);
        assert_eq!(report.metrics.dxy_score, 50);
        assert_eq!(report.metrics.ten_score, 50);
        assert_eq!(report.metrics.vix_score, 50);
        assert_eq!(report.metrics.spy_score, 50);
        assert_eq!(report.status.vix_status, VixStatus::Normal);
        assert_eq!(report.status.yield_status, YieldStatus::Steep);
        assert_eq!(report.status.risk_appetite, RiskAppetite::RiskOff);
        assert_eq!(report.status.ten_year.as_deref(), Some("4.00"));
        assert!(report.error.is_none());
    }

    #[test]
    fn test_risk_on_report() {
        let inputs = MacroInputs {
            dxy: momentum_series(100.0, 95.0, 60),
            spy: momentum_series(100.0, 110.0, 60),
            qqq: momentum_series(100.0, 120.0, 60),
            gold: momentum_series(100.0, 102.0, 60),
            ..neutral_inputs()
        };
        let report = MacroReport::compute(&inputs);

        assert_eq!(report.metrics.dxy_score, 60);
        assert_eq!(report.metrics.spy_score, 70);
        assert_eq!(report.status.risk_appetite, RiskAppetite::RiskOn);
        assert_eq!(report.status.dxy_trend, DollarTrend::Weak);
        assert_eq!(report.status.dollar_impact, DollarImpact::Tailwind);
        // 60*.25 + 50*.25 + 50*.2 + 70*.2 + 53*.1
        assert_eq!(report.metrics.macro_score, 56.8);
    }

    #[test]
    fn test_sparse_inputs_degrade_silently() {
        let report = MacroReport::compute(&MacroInputs::default());
        assert_eq!(report.metrics.dxy_score, 50);
        assert_eq!(report.metrics.vix_score, 90);
        assert_eq!(report.status.yield_status, YieldStatus::Unavailable);
        assert_eq!(report.status.vix_status, VixStatus::Normal);
        assert_eq!(report.status.ten_year, None);
        assert_eq!(report.metrics.macro_score, 58.0);
    }

    #[test]
    fn test_dollar_trend() {
        let mut rising = flat(100.0, 50);
        rising.push(105.0);
        assert_eq!(dollar_trend(&rising), DollarTrend::Strong);
        assert_eq!(dollar_trend(&flat(100.0, 60)), DollarTrend::Weak);
        assert_eq!(dollar_trend(&[120.0]), DollarTrend::Weak);
    }

    #[test]
    fn test_vix_status_bands() {
        assert_eq!(vix_status(Some(27.0), Some(20.0)), VixStatus::HighFear);
        assert_eq!(vix_status(Some(13.0), Some(20.0)), VixStatus::LowFear);
        assert_eq!(vix_status(Some(26.0), Some(20.0)), VixStatus::Normal);
        assert_eq!(vix_status(Some(14.5), Some(20.0)), VixStatus::Normal);
        assert_eq!(vix_status(Some(30.0), None), VixStatus::Normal);
        assert_eq!(vix_status(None, Some(20.0)), VixStatus::Normal);
    }

    #[test]
    fn test_yield_status() {
        assert_eq!(yield_status(Some(-0.1)), YieldStatus::Inverted);
        assert_eq!(yield_status(Some(0.3)), YieldStatus::Flat);
        assert_eq!(yield_status(Some(0.8)), YieldStatus::Steep);
        assert_eq!(yield_status(Some(0.0)), YieldStatus::Flat);
        assert_eq!(yield_status(None), YieldStatus::Unavailable);
    }

    #[test]
    fn test_risk_appetite_tie_is_risk_off() {
        assert_eq!(risk_appetite(Some(2.0), Some(2.0), Some(2.0)), RiskAppetite::RiskOff);
        assert_eq!(risk_appetite(None, None, None), RiskAppetite::RiskOff);
        assert_eq!(risk_appetite(Some(3.0), Some(1.0), Some(1.9)), RiskAppetite::RiskOn);
    }

    #[test]
    fn test_fallback_json_shape() {
        let value = serde_json::to_value(MacroReport::fallback("FRED DGS10 500")).unwrap();
        assert_eq!(
            value,
            json!({
                "metrics": {
                    "macro": 50.0,
                    "dxyScore": 50,
                    "tenScore": 50,
                    "vixScore": 50,
                    "spyScore": 50
                },
                "status": {
                    "dxyTrend": "WEAK",
                    "dollarImpact": "TAILWIND",
                    "yieldStatus": "—",
                    "vixStatus": "NORMAL",
                    "riskAppetite": "RISK ON",
                    "tenYear": null
                },
                "error": "FRED DGS10 500"
            })
        );
    }

    #[test]
    fn test_computed_report_omits_error() {
        let value = serde_json::to_value(MacroReport::compute(&neutral_inputs())).unwrap();
        assert!(value.get("error").is_none());
        assert_eq!(value["status"]["yieldStatus"], "STEEP");
    }
}
