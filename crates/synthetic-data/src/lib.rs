//! Deterministic synthetic financials.
//!
//! Every figure is derived from a seed built out of the ticker's characters, so
//! the same ticker always produces the same sequence and different tickers
//! produce different but internally consistent ones. Each field reads the
//! pseudo-random function at its own offset so fields do not move together.

use analysis_core::growth::round_to;
use analysis_core::FinancialRecord;

/// Per-field offsets into the pseudo-random sequence.
mod offset {
    pub const GROWTH_RATE: i64 = 1;
    pub const OPERATING_PROFIT: i64 = 10;
    pub const PBT: i64 = 20;
    pub const PAT: i64 = 30;
    /// The prior year's EPS is reconstructed from the previous year's offset.
    pub const PREV_EPS: i64 = 39;
    pub const EPS: i64 = 40;
    pub const PEG: i64 = 50;
    pub const ROE: i64 = 60;
    pub const ROCE: i64 = 70;
    pub const NET_WORTH: i64 = 80;
    pub const TOTAL_ASSETS: i64 = 90;
}

pub const DEFAULT_FIRST_YEAR: i32 = 2021;
pub const DEFAULT_YEAR_COUNT: usize = 5;

/// Sum of the ticker's UTF-16 code units.
pub fn ticker_seed(ticker: &str) -> i64 {
    ticker.encode_utf16().map(i64::from).sum()
}

/// `frac(sin(seed) * 10000)`, always in `[0, 1)`.
pub fn seeded_random(seed: i64) -> f64 {
    let x = (seed as f64).sin() * 10000.0;
    x - x.floor()
}

/// Per-ticker constants shared by every year of the sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerBase {
    pub seed: i64,
    pub revenue: i64,
    /// Annual revenue growth as a fraction, 0.05 to 0.25
    pub growth_rate: f64,
}

impl TickerBase {
    pub fn from_ticker(ticker: &str) -> Self {
        let seed = ticker_seed(ticker);
        Self {
            seed,
            revenue: (seeded_random(seed) * 50000.0).floor() as i64 + 10000,
            growth_rate: seeded_random(seed + offset::GROWTH_RATE) * 0.2 + 0.05,
        }
    }
}

/// Generates year-by-year records starting from a configurable fiscal year.
#[derive(Debug, Clone)]
pub struct SyntheticDataGenerator {
    first_year: i32,
    year_count: usize,
}

impl SyntheticDataGenerator {
    pub fn new(first_year: i32, year_count: usize) -> Self {
        Self {
            first_year,
            year_count,
        }
    }

    /// Record for year `index` (0 = oldest). Pure function of its inputs.
    pub fn record(&self, ticker: &str, index: usize) -> FinancialRecord {
        let base = TickerBase::from_ticker(ticker);
        self.record_from_base(&base, index)
    }

    /// The full sequence, oldest year first.
    pub fn series(&self, ticker: &str) -> Vec<FinancialRecord> {
        let base = TickerBase::from_ticker(ticker);
        tracing::debug!(
            "Generating {} synthetic years for {} (seed {}, base revenue {})",
            self.year_count,
            ticker,
            base.seed,
            base.revenue
        );
        (0..self.year_count)
            .map(|index| self.record_from_base(&base, index))
            .collect()
    }

    fn record_from_base(&self, base: &TickerBase, index: usize) -> FinancialRecord {
        let r = |field: i64| seeded_random(base.seed + index as i64 + field);
        let i = index as f64;

        let revenue_f = (base.revenue as f64 * (1.0 + base.growth_rate).powf(i)).floor();
        let revenue = revenue_f as i64;
        let share_of_revenue = |low: f64, spread: f64, field: i64| {
            (revenue_f * (low + r(field) * spread)).floor() as i64
        };

        let operating_profit = share_of_revenue(0.15, 0.15, offset::OPERATING_PROFIT);
        let opm = if revenue > 0 {
            ((operating_profit as f64 / revenue_f) * 100.0).floor() as i64
        } else {
            0
        };

        let eps = (50.0 + i * 15.0 + r(offset::EPS) * 30.0).floor();
        let eps_growth = if index > 0 {
            let prev_eps = 50.0 + (i - 1.0) * 15.0 + r(offset::PREV_EPS) * 30.0;
            round_to(((eps - prev_eps) / prev_eps) * 100.0, 2)
        } else {
            0.0
        };

        FinancialRecord {
            year: (self.first_year + index as i32).to_string(),
            revenue,
            operating_profit,
            opm,
            pbt: share_of_revenue(0.12, 0.08, offset::PBT),
            pat: share_of_revenue(0.08, 0.07, offset::PAT),
            eps: eps as i64,
            eps_growth,
            peg_ratio: format!("{:.1}", r(offset::PEG) * 2.0 + 0.5),
            roe: (r(offset::ROE) * 25.0).floor() as i64 + 10,
            roce: (r(offset::ROCE) * 20.0).floor() as i64 + 8,
            net_worth: share_of_revenue(0.4, 0.3, offset::NET_WORTH),
            total_assets: share_of_revenue(0.8, 0.4, offset::TOTAL_ASSETS),
        }
    }
}

impl Default for SyntheticDataGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_FIRST_YEAR, DEFAULT_YEAR_COUNT)
    }
}

/// Record for one year index using the default 2021-2025 window.
pub fn generate_record(ticker: &str, index: usize) -> FinancialRecord {
    SyntheticDataGenerator::default().record(ticker, index)
}

/// Five years of records, 2021 first.
pub fn generate_series(ticker: &str) -> Vec<FinancialRecord> {
    SyntheticDataGenerator::default().series(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_seed() {
        assert_eq!(ticker_seed("TCS"), 84 + 67 + 83);
        assert_eq!(ticker_seed("TCS"), 234);
        assert_eq!(ticker_seed(""), 0);
    }

    #[test]
    fn test_seeded_random_range() {
        for seed in -500..500 {
            let v = seeded_random(seed);
            assert!((0.0..1.0).contains(&v), "seed {} gave {}", seed, v);
        }
    }

    #[test]
    fn test_series_is_deterministic() {
        for ticker in ["TCS", "RELIANCE", "INFY", "HDFC", "ASIANPAINT"] {
            let a = generate_series(ticker);
            let b = generate_series(ticker);
            assert_eq!(a, b);
            let a_json = serde_json::to_string(&a).unwrap();
            let b_json = serde_json::to_string(&b).unwrap();
            assert_eq!(a_json, b_json);
        }
    }

    #[test]
    fn test_tcs_revenue_sequence() {
        let revenues: Vec<i64> = generate_series("TCS").iter().map(|r| r.revenue).collect();
        assert_eq!(revenues, vec![18345, 22441, 27451, 33581, 41079]);
    }

    #[test]
    fn test_tcs_derived_fields() {
        let series = generate_series("TCS");
        let eps: Vec<i64> = series.iter().map(|r| r.eps).collect();
        assert_eq!(eps, vec![76, 69, 84, 96, 116]);
        let opm: Vec<i64> = series.iter().map(|r| r.opm).collect();
        assert_eq!(opm, vec![24, 28, 23, 16, 22]);
        let peg: Vec<&str> = series.iter().map(|r| r.peg_ratio.as_str()).collect();
        assert_eq!(peg, vec!["1.8", "1.9", "2.2", "1.7", "2.4"]);
    }

    #[test]
    fn test_changing_one_character_changes_sequence() {
        let tcs = generate_series("TCS");
        let tcx = generate_series("TCX");
        assert_ne!(ticker_seed("TCS"), ticker_seed("TCX"));
        assert_ne!(tcs[0].revenue, tcx[0].revenue);
        assert_eq!(tcx[0].revenue, 55340);
    }

    #[test]
    fn test_distinct_seeds_give_distinct_base_revenue() {
        let tickers = ["TCS", "INFY", "RELIANCE", "WIPRO", "ITC", "SBI", "MARUTI", "CDSL"];
        let mut bases: Vec<i64> = tickers
            .iter()
            .map(|t| TickerBase::from_ticker(t).revenue)
            .collect();
        bases.sort_unstable();
        bases.dedup();
        assert_eq!(bases.len(), tickers.len());
    }

    #[test]
    fn test_first_year_eps_growth_is_zero() {
        for ticker in ["TCS", "INFY", "X"] {
            assert_eq!(generate_series(ticker)[0].eps_growth, 0.0);
        }
    }

    #[test]
    fn test_eps_growth_uses_reconstructed_previous_eps() {
        let series = generate_series("TCS");
        let growth: Vec<f64> = series.iter().map(|r| r.eps_growth).collect();
        assert_eq!(growth, vec![0.0, -9.9, 21.03, 13.88, 20.46]);

        // Not the same as diffing the stored (floored) values
        let naive = ((series[2].eps - series[1].eps) as f64 / series[1].eps as f64) * 100.0;
        assert!((round_to(naive, 2) - series[2].eps_growth).abs() > 0.01);
    }

    #[test]
    fn test_record_matches_series_entry() {
        let series = generate_series("WIPRO");
        for (index, record) in series.iter().enumerate() {
            assert_eq!(&generate_record("WIPRO", index), record);
        }
    }

    #[test]
    fn test_field_ranges() {
        for ticker in ["TCS", "RELIANCE", "INFY", "HDFC", "CDSL", "ITC", "SBI"] {
            let base = TickerBase::from_ticker(ticker);
            assert!((10000..60000).contains(&base.revenue));
            assert!((0.05..0.25).contains(&base.growth_rate));
            for (i, record) in generate_series(ticker).iter().enumerate() {
                assert!(record.operating_profit >= record.revenue * 15 / 100 - 1);
                assert!(record.operating_profit <= record.revenue * 30 / 100);
                assert!((14..=30).contains(&record.opm));
                assert!((10..=34).contains(&record.roe));
                assert!((8..=27).contains(&record.roce));
                let low = 50 + 15 * i as i64;
                assert!(record.eps >= low && record.eps < low + 30);
                let peg = record.peg_value();
                assert!((0.5..=2.5).contains(&peg));
            }
        }
    }

    #[test]
    fn test_revenue_compounds_upward() {
        let series = generate_series("MARUTI");
        for pair in series.windows(2) {
            assert!(pair[1].revenue > pair[0].revenue);
        }
    }

    #[test]
    fn test_custom_window() {
        let generator = SyntheticDataGenerator::new(2019, 3);
        let series = generator.series("TCS");
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].year, "2019");
        assert_eq!(series[2].year, "2021");
        // Values depend only on the index, not on the label
        assert_eq!(series[1].revenue, generate_series("TCS")[1].revenue);
    }
}
