/// Equal-width bins over `[min, max]` of the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `counts.len() + 1` boundaries, ascending. Empty when there was no input.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Bin `values` into `bins` buckets. The maximum lands in the last bucket.
/// When every value is the same there is a single bucket holding all of them.
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Histogram {
            edges: Vec::new(),
            counts: Vec::new(),
        };
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max - min <= f64::EPSILON * max.abs().max(1.0) {
        return Histogram {
            edges: vec![min - 0.5, min + 0.5],
            counts: vec![finite.len()],
        };
    }

    let bins = bins.max(1);
    let width = (max - min) / bins as f64;
    let edges = (0..=bins).map(|i| min + width * i as f64).collect();
    let mut counts = vec![0usize; bins];
    for v in finite {
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Histogram { edges, counts }
}
