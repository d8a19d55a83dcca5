// Sample statistics: median with a distribution-free confidence interval

use std::hash::{Hash, Hasher};

/// Center and confidence bounds of a sample.
///
/// `lo` is negative infinity (and `hi` positive infinity) when the sample is
/// too small to bound the center at the requested confidence.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub center: f64,
    pub lo: f64,
    pub hi: f64,
    pub confidence: f64,
}

impl Summary {
    /// Whether the interval actually bounds the center.
    pub fn has_range(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }
}

// Summaries take part in point grouping, so equality is bitwise.
impl PartialEq for Summary {
    fn eq(&self, other: &Self) -> bool {
        self.center.to_bits() == other.center.to_bits()
            && self.lo.to_bits() == other.lo.to_bits()
            && self.hi.to_bits() == other.hi.to_bits()
            && self.confidence.to_bits() == other.confidence.to_bits()
    }
}

impl Eq for Summary {}

impl Hash for Summary {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.center.to_bits().hash(state);
        self.lo.to_bits().hash(state);
        self.hi.to_bits().hash(state);
        self.confidence.to_bits().hash(state);
    }
}

/// Summarize `sample` by its median and a confidence interval for the median
/// at level `confidence`, making no assumptions about the distribution.
///
/// The interval is the widest pair of order statistics `(x_k, x_{n+1-k})`
/// that still covers the median with probability at least `confidence`.
pub fn summarize(sample: &[f64], confidence: f64) -> Summary {
    let mut sorted: Vec<f64> = sample.to_vec();
    sorted.sort_by(f64::total_cmp);

    let center = median_sorted(&sorted);
    let (lo, hi) = match median_ci_ranks(sorted.len(), confidence) {
        Some(k) => (sorted[k - 1], sorted[sorted.len() - k]),
        None => (f64::NEG_INFINITY, f64::INFINITY),
    };

    Summary {
        center,
        lo,
        hi,
        confidence,
    }
}

/// Median of `sample`. NaN for an empty sample.
pub fn median(sample: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = sample.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_sorted(&sorted)
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return f64::NAN;
    }
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Largest 1-based rank `k` such that `[x_k, x_{n+1-k}]` covers the median
/// with probability >= `confidence`, or None if no such rank exists.
fn median_ci_ranks(n: usize, confidence: f64) -> Option<usize> {
    if n == 0 {
        return None;
    }

    // Coverage of ranks (k, n+1-k) is 1 - 2*P(X < k) for X ~ Binomial(n, 1/2).
    // P(X < k) grows with k, so walk k up until coverage drops below the
    // requested level.
    let ln_half_n = -(n as f64) * std::f64::consts::LN_2;
    let mut ln_choose = 0.0; // ln C(n, 0)
    let mut cdf_below = 0.0; // P(X < k)
    let mut best = None;
    for k in 1..=(n + 1) / 2 {
        let j = k - 1;
        if j > 0 {
            ln_choose += ((n - j + 1) as f64).ln() - (j as f64).ln();
        }
        cdf_below += (ln_choose + ln_half_n).exp();
        let coverage = 1.0 - 2.0 * cdf_below;
        if coverage < confidence {
            break;
        }
        best = Some(k);
    }
    best
}
