//! Pairwise user measures
//!
//! Each measure is a unit (or near-unit) struct implementing [`PairMeasure`],
//! mirroring how distance kernels plug into an index: one type per metric,
//! one `eval` entry point.

use super::common::CommonView;

/// Whether a larger value means "further apart" or "closer together"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Smaller is more similar
    Distance,
    /// Larger is more similar
    Similarity,
}

/// A scalar computed over two users' common rating view
pub trait PairMeasure {
    fn eval(&self, view: &CommonView) -> f64;

    fn orientation(&self) -> Orientation;
}

/// Square root of the summed squared rating differences. 0 when nothing is
/// rated in common.
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

impl PairMeasure for Euclidean {
    fn eval(&self, view: &CommonView) -> f64 {
        view.abs_diffs().map(|d| d * d).sum::<f64>().sqrt()
    }

    fn orientation(&self) -> Orientation {
        Orientation::Distance
    }
}

/// Sum of absolute rating differences
#[derive(Debug, Clone, Copy, Default)]
pub struct Manhattan;

impl PairMeasure for Manhattan {
    fn eval(&self, view: &CommonView) -> f64 {
        view.abs_diffs().sum()
    }

    fn orientation(&self) -> Orientation {
        Orientation::Distance
    }
}

/// p-th root of the summed p-th powers of absolute differences
#[derive(Debug, Clone, Copy)]
pub struct Minkowski {
    pub p: f64,
}

impl Default for Minkowski {
    fn default() -> Self {
        Self { p: 3.0 }
    }
}

impl PairMeasure for Minkowski {
    fn eval(&self, view: &CommonView) -> f64 {
        let sum: f64 = view.abs_diffs().map(|d| d.powf(self.p)).sum();
        sum.powf(1.0 / self.p)
    }

    fn orientation(&self) -> Orientation {
        Orientation::Distance
    }
}

/// `1 - cos(a, b)` over the common items.
///
/// Maximal distance (1) when the users share nothing or either restricted
/// vector has zero norm.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cosine;

impl PairMeasure for Cosine {
    fn eval(&self, view: &CommonView) -> f64 {
        if view.is_disjoint() {
            return 1.0;
        }

        let mut dot = 0.0;
        let mut norm_a = 0.0;
        let mut norm_b = 0.0;
        for &(a, b) in &view.pairs {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        if norm_a <= 0.0 || norm_b <= 0.0 {
            return 1.0;
        }

        1.0 - dot / (norm_a.sqrt() * norm_b.sqrt())
    }

    fn orientation(&self) -> Orientation {
        Orientation::Distance
    }
}

/// Jaccard distance where only identical ratings count as shared.
///
/// `1 - exact / (|A| + |B| - exact)`; 1 if either user rated nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Jaccard;

impl PairMeasure for Jaccard {
    fn eval(&self, view: &CommonView) -> f64 {
        if view.len_a == 0 || view.len_b == 0 {
            return 1.0;
        }
        let exact = view.exact_matches();
        let denominator = (view.len_a + view.len_b - exact) as f64;
        1.0 - exact as f64 / denominator
    }

    fn orientation(&self) -> Orientation {
        Orientation::Distance
    }
}

/// Rating-agreement affinity: `Σ (midpoint - |ra - rb|)` over common items.
///
/// Every close agreement adds up to `midpoint`, every strong disagreement
/// subtracts; the total may be negative.
#[derive(Debug, Clone, Copy)]
pub struct Affinity {
    pub midpoint: f64,
}

impl PairMeasure for Affinity {
    fn eval(&self, view: &CommonView) -> f64 {
        view.abs_diffs().map(|d| self.midpoint - d).sum()
    }

    fn orientation(&self) -> Orientation {
        Orientation::Similarity
    }
}

/// Jaccard similarity over the graph neighborhood:
/// `exact / (|A| + |B| - common)`.
///
/// Unlike [`Jaccard`], the denominator subtracts every common item, not
/// only the exact matches, so it is the ratio of identical ratings to the
/// true union of rated items. 0 when the union is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphJaccard;

impl PairMeasure for GraphJaccard {
    fn eval(&self, view: &CommonView) -> f64 {
        let union = view.union_count();
        if union == 0 {
            return 0.0;
        }
        view.exact_matches() as f64 / union as f64
    }

    fn orientation(&self) -> Orientation {
        Orientation::Similarity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_cosine_zero_norm() {
        let view = CommonView::from_pairs(vec![(0.0, 3.0), (0.0, 4.0)], 2, 2);
        assert_eq!(Cosine.eval(&view), 1.0);
    }

    #[test]
    fn test_euclidean() {
        let view = CommonView::from_pairs(vec![(1.0, 4.0), (5.0, 9.0)], 2, 2);
        assert!(approx(Euclidean.eval(&view), 5.0));
    }

    #[test]
    fn test_manhattan_and_minkowski() {
        let view = CommonView::from_pairs(vec![(1.0, 4.0), (5.0, 9.0)], 2, 2);
        assert!(approx(Manhattan.eval(&view), 7.0));
        // (27 + 64)^(1/3)
        assert!(approx(Minkowski::default().eval(&view), 91f64.powf(1.0 / 3.0)));
    }

    #[test]
    fn test_distances_on_disjoint_users() {
        let view = CommonView::from_pairs(Vec::new(), 3, 2);
        assert_eq!(Euclidean.eval(&view), 0.0);
        assert_eq!(Manhattan.eval(&view), 0.0);
        assert_eq!(Cosine.eval(&view), 1.0);
        assert_eq!(Jaccard.eval(&view), 1.0);
        assert_eq!(GraphJaccard.eval(&view), 0.0);
    }

    #[test]
    fn test_cosine_parallel_vectors() {
        let view = CommonView::from_pairs(vec![(2.0, 4.0), (3.0, 6.0)], 2, 2);
        assert!(approx(Cosine.eval(&view), 0.0));
    }

    #[test]
    fn test_jaccard_counts_exact_matches_only() {
        // A = {1:8, 2:5, 3:7}, B = {1:8, 2:6}
        let view = CommonView::from_pairs(vec![(8.0, 8.0), (5.0, 6.0)], 3, 2);
        // 1 - 1 / (3 + 2 - 1)
        assert!(approx(Jaccard.eval(&view), 0.75));
        // 1 / (3 + 2 - 2)
        assert!(approx(GraphJaccard.eval(&view), 1.0 / 3.0));
    }

    #[test]
    fn test_jaccard_empty_user() {
        let view = CommonView::from_pairs(Vec::new(), 0, 4);
        assert_eq!(Jaccard.eval(&view), 1.0);
    }

    #[test]
    fn test_affinity_can_be_negative() {
        let affinity = Affinity { midpoint: 5.5 };
        let agree = CommonView::from_pairs(vec![(9.0, 9.0), (8.0, 7.0)], 2, 2);
        assert!(approx(affinity.eval(&agree), 5.5 + 4.5));

        let disagree = CommonView::from_pairs(vec![(10.0, 1.0)], 1, 1);
        assert!(approx(affinity.eval(&disagree), -3.5));
        assert_eq!(affinity.orientation(), Orientation::Similarity);
    }
}
