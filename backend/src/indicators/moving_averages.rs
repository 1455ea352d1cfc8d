/// Simple Moving Average (SMA)
/// Arithmetic mean of the last `period` closes, counted in bars
pub struct SMA {
    period: usize,
}

impl SMA {
    pub fn new(period: usize) -> Self {
        Self { period }
    }

    /// Calculate SMA for a price series
    /// Returns a vector of the same length as input
    /// First (period - 1) values are None (warmup period)
    pub fn calculate(&self, prices: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; prices.len()];

        if self.period == 0 || prices.len() < self.period {
            return result;
        }

        // Each window is summed from scratch so a value never depends on
        // earlier positions
        for i in (self.period - 1)..prices.len() {
            let window_start = i + 1 - self.period;
            let window = &prices[window_start..=i];
            let sum: f64 = window.iter().sum();
            result[i] = Some(sum / self.period as f64);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let value = actual.expect("value should be defined");
        assert!((value - expected).abs() < 1e-9, "expected {expected}, got {value}");
    }

    #[test]
    fn test_sma_basic() {
        let prices = vec![10.0, 20.0, 15.0, 30.0, 25.0];
        let result = SMA::new(3).calculate(&prices);

        assert_eq!(result.len(), 5);
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_close(result[2], 15.0);
        assert_close(result[3], 65.0 / 3.0);
        assert_close(result[4], 70.0 / 3.0);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let prices = vec![100.0, 102.0];
        let result = SMA::new(3).calculate(&prices);

        assert_eq!(result, vec![None, None]);
    }

    #[test]
    fn test_sma_window_equals_length() {
        let prices = vec![1.0, 2.0, 3.0, 4.0];
        let result = SMA::new(4).calculate(&prices);

        assert_eq!(&result[..3], &[None, None, None]);
        assert_close(result[3], 2.5);
    }

    #[test]
    fn test_sma_period_one_is_identity() {
        let prices = vec![3.0, 1.5, 8.25];
        let result = SMA::new(1).calculate(&prices);

        assert_eq!(result, vec![Some(3.0), Some(1.5), Some(8.25)]);
    }

    #[test]
    fn test_sma_period_50() {
        let prices: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let result = SMA::new(50).calculate(&prices);

        for value in &result[..49] {
            assert!(value.is_none());
        }

        // (100 + 101 + ... + 149) / 50 = 124.5
        assert_close(result[49], 124.5);
        // last window is 110..=159
        assert_close(result[59], 134.5);
    }

    #[test]
    fn test_sma_zero_period_is_undefined() {
        let result = SMA::new(0).calculate(&[1.0, 2.0]);
        assert_eq!(result, vec![None, None]);
    }
}
