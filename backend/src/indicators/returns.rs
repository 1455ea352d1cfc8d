/// Simple daily return: (close[i] - close[i-1]) / close[i-1]
/// Not a log return.
pub struct DailyReturn;

impl DailyReturn {
    /// Returns a vector of the same length as input.
    /// Index 0 is always None. A zero previous close leaves that position None
    /// instead of producing an infinity.
    pub fn calculate(prices: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; prices.len()];

        for i in 1..prices.len() {
            let prev = prices[i - 1];
            if prev == 0.0 {
                continue;
            }
            let change = (prices[i] - prev) / prev;
            if change.is_finite() {
                result[i] = Some(change);
            }
        }

        result
    }
}
