//! P-value calculation for the rank-sum statistic

use statrs::distribution::{ContinuousCDF, Normal};

/// Upper-tail p-value P(Z >= z) of a standard normal statistic
pub fn upper_tail_pvalue(z: f64) -> f64 {
    if z.is_nan() {
        return f64::NAN;
    }

    let normal = Normal::standard();
    // cdf(-z) keeps precision far in the upper tail
    normal.cdf(-z).clamp(0.0, 1.0)
}

/// Null distribution of the Mann-Whitney U statistic without ties.
///
/// Returns `counts[u]`, the number of rank arrangements with U = u, for
/// samples of sizes `n1` and `n2`. The distribution is the same for (n1, n2)
/// and (n2, n1), so the recursion runs over the smaller size:
/// f(u; m, n) = f(u - n; m - 1, n) + f(u; m, n - 1).
fn u_null_counts(n1: usize, n2: usize) -> Vec<f64> {
    let (k, l) = if n1 <= n2 { (n1, n2) } else { (n2, n1) };

    // f[m] holds f(.; m, n) for the current n, starting from n = 0
    let mut f: Vec<Vec<f64>> = (0..=k).map(|_| vec![1.0]).collect();

    for n in 1..=l {
        let mut next: Vec<Vec<f64>> = Vec::with_capacity(k + 1);
        next.push(vec![1.0]);
        for m in 1..=k {
            let mut counts = vec![0.0; m * n + 1];
            for (u, &c) in f[m].iter().enumerate() {
                counts[u] += c;
            }
            for (u, &c) in next[m - 1].iter().enumerate() {
                counts[u + n] += c;
            }
            next.push(counts);
        }
        f = next;
    }

    f.swap_remove(k)
}

/// Exact upper-tail p-value P(U >= u) for tie-free samples of sizes `n1` and `n2`
pub fn exact_upper_tail_pvalue(u: f64, n1: usize, n2: usize) -> f64 {
    let counts = u_null_counts(n1, n2);
    let total: f64 = counts.iter().sum();
    let start = u.ceil().max(0.0) as usize;
    let tail: f64 = counts.iter().skip(start).sum();
    (tail / total).clamp(0.0, 1.0)
}
