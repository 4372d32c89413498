//! Regression trees, the shared base learner of both ensembles.
//!
//! Splits greedily minimize the summed squared error of the two children
//! (equivalently: maximize variance reduction). Candidate thresholds are
//! midpoints between consecutive distinct feature values; scanning is done
//! with prefix sums so a split search is O(n log n) per feature. Everything
//! is deterministic: ties resolve to the first candidate in feature order.

use crate::models::N_FEATURES;

#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_leaf: usize,
}

#[derive(Debug, Clone)]
struct Split {
    feature: usize,
    threshold: f64,
    left: usize,
    right: usize,
}

#[derive(Debug, Clone)]
struct Node {
    /// Mean target of the training rows that reached this node.
    value: f64,
    split: Option<Split>,
}

#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

impl RegressionTree {
    /// Fit on the rows named by `indices`, considering only the features in
    /// `feature_pool` for splits (the forest passes a subset, boosting passes
    /// all of them).
    pub fn fit(
        features: &[[f64; N_FEATURES]],
        target: &[f64],
        indices: &[usize],
        feature_pool: &[usize],
        params: TreeParams,
    ) -> Self {
        let mut tree = RegressionTree { nodes: Vec::new() };
        let mut indices = indices.to_vec();
        tree.build(features, target, &mut indices, feature_pool, params, 0);
        tree
    }

    fn build(
        &mut self,
        features: &[[f64; N_FEATURES]],
        target: &[f64],
        indices: &mut [usize],
        feature_pool: &[usize],
        params: TreeParams,
        depth: usize,
    ) -> usize {
        let value = mean_of(target, indices);
        let node_index = self.nodes.len();
        self.nodes.push(Node { value, split: None });

        if depth >= params.max_depth || indices.len() < 2 * params.min_leaf {
            return node_index;
        }

        let Some((feature, threshold)) =
            best_split(features, target, indices, feature_pool, params.min_leaf)
        else {
            return node_index;
        };

        // Partition in place around the chosen threshold.
        indices.sort_by(|&a, &b| {
            features[a][feature]
                .partial_cmp(&features[b][feature])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let boundary = indices.partition_point(|&i| features[i][feature] <= threshold);
        let (left_indices, right_indices) = indices.split_at_mut(boundary);

        let left = self.build(features, target, left_indices, feature_pool, params, depth + 1);
        let right = self.build(features, target, right_indices, feature_pool, params, depth + 1);
        self.nodes[node_index].split = Some(Split {
            feature,
            threshold,
            left,
            right,
        });
        node_index
    }

    pub fn predict_one(&self, row: &[f64; N_FEATURES]) -> f64 {
        let mut index = 0;
        loop {
            let node = &self.nodes[index];
            let Some(split) = &node.split else {
                return node.value;
            };
            index = if row[split.feature] <= split.threshold {
                split.left
            } else {
                split.right
            };
        }
    }
}

fn mean_of(target: &[f64], indices: &[usize]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    indices.iter().map(|&i| target[i]).sum::<f64>() / indices.len() as f64
}

/// Find the `(feature, threshold)` minimizing child SSE, or `None` when no
/// candidate improves on the parent or satisfies the leaf minimum.
fn best_split(
    features: &[[f64; N_FEATURES]],
    target: &[f64],
    indices: &[usize],
    feature_pool: &[usize],
    min_leaf: usize,
) -> Option<(usize, f64)> {
    let n = indices.len();
    let total_sum: f64 = indices.iter().map(|&i| target[i]).sum();
    let total_sq: f64 = indices.iter().map(|&i| target[i] * target[i]).sum();
    let parent_sse = total_sq - total_sum * total_sum / n as f64;

    let mut best: Option<(usize, f64, f64)> = None;

    for &feature in feature_pool {
        let mut pairs: Vec<(f64, f64)> = indices
            .iter()
            .map(|&i| (features[i][feature], target[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for (k, &(x, y)) in pairs.iter().enumerate().take(n - 1) {
            left_sum += y;
            left_sq += y * y;

            let n_left = k + 1;
            let n_right = n - n_left;
            if n_left < min_leaf || n_right < min_leaf {
                continue;
            }
            // Only split between distinct feature values.
            if pairs[k + 1].0 <= x {
                continue;
            }

            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / n_left as f64)
                + (right_sq - right_sum * right_sum / n_right as f64);

            if best.is_none_or(|(_, _, best_sse)| sse < best_sse) {
                let threshold = (x + pairs[k + 1].0) / 2.0;
                best = Some((feature, threshold, sse));
            }
        }
    }

    // Require a real reduction; a no-op split would recurse forever on
    // constant targets.
    best.filter(|&(_, _, sse)| sse < parent_sse - 1e-12)
        .map(|(feature, threshold, _)| (feature, threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(x: f64) -> [f64; N_FEATURES] {
        [x, 0.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn splits_a_step_function_exactly() {
        let features: Vec<_> = (0..10).map(|i| row(i as f64)).collect();
        let target: Vec<f64> = (0..10).map(|i| if i < 5 { 1.0 } else { 9.0 }).collect();
        let indices: Vec<usize> = (0..10).collect();

        let tree = RegressionTree::fit(
            &features,
            &target,
            &indices,
            &[0],
            TreeParams {
                max_depth: 2,
                min_leaf: 1,
            },
        );

        assert!((tree.predict_one(&row(2.0)) - 1.0).abs() < 1e-12);
        assert!((tree.predict_one(&row(7.0)) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn constant_target_stays_a_single_leaf() {
        let features: Vec<_> = (0..8).map(|i| row(i as f64)).collect();
        let target = vec![5.0; 8];
        let indices: Vec<usize> = (0..8).collect();

        let tree = RegressionTree::fit(
            &features,
            &target,
            &indices,
            &[0],
            TreeParams {
                max_depth: 4,
                min_leaf: 1,
            },
        );
        assert_eq!(tree.nodes.len(), 1);
        assert!((tree.predict_one(&row(100.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn respects_min_leaf() {
        let features: Vec<_> = (0..6).map(|i| row(i as f64)).collect();
        let target = vec![0.0, 0.0, 0.0, 0.0, 0.0, 100.0];
        let indices: Vec<usize> = (0..6).collect();

        let tree = RegressionTree::fit(
            &features,
            &target,
            &indices,
            &[0],
            TreeParams {
                max_depth: 3,
                min_leaf: 3,
            },
        );
        // The only worthwhile split (isolating the outlier) is forbidden, but
        // a 3/3 split still reduces SSE; ensure both leaves hold >= 3 rows by
        // checking the prediction for the smallest x pools at least 3 targets.
        let left_pred = tree.predict_one(&row(0.0));
        assert!(left_pred.abs() < 1e-9);
    }

    #[test]
    fn deeper_trees_fit_finer_structure() {
        let features: Vec<_> = (0..16).map(|i| row(i as f64)).collect();
        let target: Vec<f64> = (0..16).map(|i| (i / 4) as f64 * 10.0).collect();
        let indices: Vec<usize> = (0..16).collect();

        let tree = RegressionTree::fit(
            &features,
            &target,
            &indices,
            &[0],
            TreeParams {
                max_depth: 4,
                min_leaf: 1,
            },
        );
        for i in 0..16 {
            let expected = (i / 4) as f64 * 10.0;
            assert!((tree.predict_one(&row(i as f64)) - expected).abs() < 1e-9);
        }
    }
}
