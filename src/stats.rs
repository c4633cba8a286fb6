//! Statistical utility functions shared across modules
//!
//! Contains the median and mid-rank helpers used by the rank-sum test and
//! the per-function summaries.

/// qnorm(0.975) - the 97.5th percentile of the standard normal
pub const QNORM_0975: f64 = 1.959963984540054;

/// Median of a sample; the mean of the two central values for even sizes.
/// Returns NaN for an empty sample.
pub fn median(x: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }

    let mut sorted = x.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        0.5 * (sorted[n / 2 - 1] + sorted[n / 2])
    }
}

/// Mid-ranks of a sample together with the tie term `sum(t^3 - t)` over tie groups.
///
/// Algorithm:
/// 1. Sort indices by value
/// 2. Walk runs of equal values; each member of a run of length t spanning
///    1-based positions i..=j gets rank (i + j) / 2
/// 3. Accumulate t^3 - t per run (zero when there are no ties)
pub fn mid_ranks(x: &[f64]) -> (Vec<f64>, f64) {
    let n = x.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| x[a].total_cmp(&x[b]));

    let mut ranks = vec![0.0; n];
    let mut tie_term = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && x[order[j]] == x[order[i]] {
            j += 1;
        }
        // positions i..j (0-based, exclusive) share the average 1-based rank
        let rank = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        let t = (j - i) as f64;
        tie_term += t * t * t - t;
        i = j;
    }

    (ranks, tie_term)
}
