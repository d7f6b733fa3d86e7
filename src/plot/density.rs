use std::f64::consts::PI;
use std::ops::Range;

use crate::data::summary::{quantile_sorted, sample_std};

/// Upper bound on histogram bins for pathological spreads.
const MAX_BINS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Bin edges by the larger bin count of the Sturges and Freedman–Diaconis
/// rules. A constant sample gets one unit-wide bin around its value;
/// non-finite values are ignored.
pub fn bin_edges(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return Vec::new();
    }
    sorted.sort_by(f64::total_cmp);
    let (lo, hi) = (sorted[0], sorted[sorted.len() - 1]);
    if hi <= lo {
        return vec![lo - 0.5, hi + 0.5];
    }

    let n = sorted.len() as f64;
    let range = hi - lo;
    let sturges = range / (n.log2() + 1.0);
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };

    let bins = ((range / width).ceil() as usize).clamp(1, MAX_BINS);
    let step = range / bins as f64;
    (0..=bins).map(|i| lo + step * i as f64).collect()
}

/// Count `values` into the bins described by `edges`; the last bin is
/// closed on the right.
pub fn histogram(values: &[f64], edges: &[f64]) -> Vec<Bin> {
    if edges.len() < 2 {
        return Vec::new();
    }
    let nbins = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[nbins]);
    let mut counts = vec![0usize; nbins];
    for &v in values {
        if v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / (hi - lo)) * nbins as f64).floor() as usize;
        counts[idx.min(nbins - 1)] += 1;
    }
    edges
        .windows(2)
        .zip(counts)
        .map(|(w, count)| Bin {
            start: w[0],
            end: w[1],
            count,
        })
        .collect()
}

/// Box summary of one group: quartiles, Tukey fences at 1.5·IQR and
/// whiskers pulled in to the most extreme values inside the fences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
}

impl BoxStats {
    /// `None` when there is no finite value to summarise.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&sorted, 0.25);
        let median = quantile_sorted(&sorted, 0.5);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= lower_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= upper_fence)
            .unwrap_or(q3);

        Some(Self {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            lower_fence,
            upper_fence,
        })
    }

    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower_fence || value > self.upper_fence
    }
}

/// Gaussian kernel density with Scott's bandwidth, sampled at `points`
/// evenly spaced positions over `span`. Empty when the sample has fewer
/// than two values or no spread.
pub fn kde_curve(values: &[f64], span: Range<f64>, points: usize) -> Vec<(f64, f64)> {
    let n = values.len();
    let bw = sample_std(values) * (n as f64).powf(-0.2);
    if n < 2 || !(bw > 0.0) || points < 2 {
        return Vec::new();
    }
    let norm = 1.0 / (n as f64 * bw * (2.0 * PI).sqrt());
    let step = (span.end - span.start) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            let x = span.start + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|&xi| (-0.5 * ((x - xi) / bw).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Data extent widened by 5% on each side, or a unit window around a
/// single value.
pub fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return 0.0..1.0;
    }
    if hi == lo {
        return (lo - 0.5)..(hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_follow_the_auto_rule() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let edges = bin_edges(&values);
        assert_eq!(edges.len(), 6);
        assert_eq!(edges[0], 1.0);
        assert!((edges[5] - 10.0).abs() < 1e-12);
    }

    #[test]
    fn constant_sample_gets_one_bin() {
        let edges = bin_edges(&[3.0, 3.0, 3.0]);
        assert_eq!(edges, vec![2.5, 3.5]);
        let bins = histogram(&[3.0, 3.0, 3.0], &edges);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].count, 3);
    }

    #[test]
    fn histogram_counts_every_value_once() {
        let values = [0.0, 0.5, 1.0, 1.5, 2.0, 2.0];
        let bins = histogram(&values, &[0.0, 1.0, 2.0]);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![2, 4]);
        assert!(bin_edges(&[]).is_empty());
        assert!(histogram(&values, &[]).is_empty());
    }

    #[test]
    fn infinite_values_do_not_poison_the_edges() {
        let edges = bin_edges(&[1.0, 2.0, f64::INFINITY, 3.0, f64::NEG_INFINITY]);
        assert!(!edges.is_empty());
        assert!(edges.iter().all(|e| e.is_finite()), "edges were {edges:?}");
        assert_eq!(edges[0], 1.0);
        assert!(bin_edges(&[f64::INFINITY]).is_empty());
    }

    #[test]
    fn whiskers_stay_inside_the_data() {
        let ages = [2.0, 22.0, 26.0, 27.0, 35.0, 38.0, 54.0, 14.0, 4.0];
        let stats = BoxStats::from_values(&ages).unwrap();
        assert_eq!(stats.q1, 14.0);
        assert_eq!(stats.median, 26.0);
        assert_eq!(stats.q3, 35.0);
        assert_eq!(stats.lower_fence, -17.5);
        assert_eq!(stats.upper_fence, 66.5);
        assert_eq!(stats.lower_whisker, 2.0);
        assert_eq!(stats.upper_whisker, 54.0);
        assert!(!ages.iter().any(|&a| stats.is_outlier(a)));
    }

    #[test]
    fn values_past_the_fences_are_outliers() {
        let stats = BoxStats::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(stats.upper_whisker, 4.0);
        assert_eq!(stats.lower_whisker, 1.0);
        assert!(stats.is_outlier(100.0));
        assert!(!stats.is_outlier(4.0));
        assert!(BoxStats::from_values(&[]).is_none());
    }

    #[test]
    fn kde_integrates_to_about_one() {
        let values = [1.0, 2.0, 2.5, 3.0, 4.0, 4.5, 6.0];
        let curve = kde_curve(&values, -20.0..30.0, 2001);
        let step = curve[1].0 - curve[0].0;
        let area: f64 = curve.iter().map(|(_, d)| d * step).sum();
        assert!((area - 1.0).abs() < 1e-3, "area was {area}");
    }

    #[test]
    fn kde_needs_spread() {
        assert!(kde_curve(&[1.0], 0.0..2.0, 10).is_empty());
        assert!(kde_curve(&[2.0, 2.0], 0.0..4.0, 10).is_empty());
    }

    #[test]
    fn padded_range_handles_degenerate_input() {
        assert_eq!(padded_range(Vec::<f64>::new()), 0.0..1.0);
        assert_eq!(padded_range(vec![2.0]), 1.5..2.5);
        let r = padded_range(vec![0.0, 10.0]);
        assert_eq!(r, -0.5..10.5);
    }
}
