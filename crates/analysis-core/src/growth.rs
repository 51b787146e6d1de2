//! Growth and averaging helpers shared by the generator and the insight engines.

/// Compute the mean of a data slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Compound annual growth rate in percent over `periods` years.
///
/// Returns 0.0 when there is no period to compound over or the start value is
/// not positive, since the ratio is undefined there.
pub fn cagr(start: f64, end: f64, periods: usize) -> f64 {
    if periods == 0 || start <= 0.0 || end < 0.0 {
        return 0.0;
    }
    ((end / start).powf(1.0 / periods as f64) - 1.0) * 100.0
}

/// Number of consecutive pairs where the value went up.
pub fn count_increases<T: PartialOrd>(values: &[T]) -> usize {
    values.windows(2).filter(|w| w[1] > w[0]).count()
}

/// Round half toward positive infinity, the way browsers round.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round to `decimals` places using [`round_half_up`].
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round_half_up(value * factor) / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[10.0, 20.0, 30.0]) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_cagr_doubling() {
        // 100 -> 200 over one period is 100%
        assert!((cagr(100.0, 200.0, 1) - 100.0).abs() < 1e-9);
        // 100 -> 121 over two periods is 10%
        assert!((cagr(100.0, 121.0, 2) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cagr_degenerate_inputs() {
        assert_eq!(cagr(100.0, 200.0, 0), 0.0);
        assert_eq!(cagr(0.0, 200.0, 4), 0.0);
        assert_eq!(cagr(-5.0, 200.0, 4), 0.0);
    }

    #[test]
    fn test_count_increases() {
        assert_eq!(count_increases(&[1, 2, 2, 3, 1]), 2);
        assert_eq!(count_increases::<i64>(&[]), 0);
        assert_eq!(count_increases(&[5]), 0);
    }

    #[test]
    fn test_round_half_up_negative_ties() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn test_round_to_two_places() {
        assert!((round_to(12.3456, 2) - 12.35).abs() < 1e-9);
        assert!((round_to(-4.444, 2) + 4.44).abs() < 1e-9);
    }
}
