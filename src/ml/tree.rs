// ============================================================
// Layer 5 — Regression Tree
// ============================================================
// A single CART-style regression tree: greedy variance-reduction
// splits, mean-valued leaves.
//
// Storage is a flat Vec of nodes addressed by index (children
// hold the indices of their subtrees, the root is node 0). A
// flat vector serialises cleanly and keeps traversal a tight
// loop instead of a pointer chase.
//
// Split search per node, per feature:
//   1. sort the node's rows by the feature value
//   2. sweep the sorted order once, maintaining prefix sums of
//      the targets, scoring each boundary between two distinct
//      values by the summed squared error of the two sides
//   3. keep the (feature, threshold) with the lowest score
//
// Children are partitioned with the SAME `value <= threshold`
// predicate that prediction uses, so fit-time routing and
// predict-time routing can never disagree.

use ndarray::{ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::ForestHyperparams;

/// One node of a fitted tree. Interior nodes route on
/// `feature <= threshold`; leaves carry the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub feature: usize,
    pub threshold: f64,
    pub left: usize,
    pub right: usize,
    pub value: f64,
    pub is_leaf: bool,
}

impl TreeNode {
    fn leaf(value: f64) -> Self {
        Self {
            feature: 0,
            threshold: 0.0,
            left: 0,
            right: 0,
            value,
            is_leaf: true,
        }
    }
}

/// A fitted regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Fit a tree on the rows selected by `indices` (typically a
    /// bootstrap sample). `indices` must be non-empty.
    pub fn fit(
        x: ArrayView2<f64>,
        y: ArrayView1<f64>,
        indices: Vec<usize>,
        params: &ForestHyperparams,
    ) -> Self {
        debug_assert!(!indices.is_empty());
        let mut nodes = Vec::new();
        build_node(&mut nodes, x, y, indices, 0, params);
        Self { nodes }
    }

    /// Route one encoded feature vector from the root to a leaf.
    pub fn predict_row(&self, features: &[f64]) -> f64 {
        let mut node = &self.nodes[0];
        while !node.is_leaf {
            node = if features[node.feature] <= node.threshold {
                &self.nodes[node.left]
            } else {
                &self.nodes[node.right]
            };
        }
        node.value
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }
}

/// Recursively grow the subtree for `indices`; returns the index
/// of the created node.
fn build_node(
    nodes: &mut Vec<TreeNode>,
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    indices: Vec<usize>,
    depth: usize,
    params: &ForestHyperparams,
) -> usize {
    let n = indices.len();
    let sum: f64 = indices.iter().map(|&i| y[i]).sum();
    let sum_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
    let mean = sum / n as f64;
    let sse = sum_sq - sum * sum / n as f64;

    // Reserve this node's slot before recursing into children
    let node_id = nodes.len();
    nodes.push(TreeNode::leaf(mean));

    // Stopping rules: depth limit, too few rows to split, or a
    // node that is already pure
    if depth >= params.max_depth || n < params.min_samples_split || sse <= 1e-12 {
        return node_id;
    }

    let Some((feature, threshold)) = best_split(x, y, &indices, params) else {
        return node_id;
    };

    // Partition with the prediction-time predicate
    let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = indices
        .into_iter()
        .partition(|&i| x[[i, feature]] <= threshold);

    // The sweep guarantees both sides are large enough except in
    // degenerate float-adjacency cases; fall back to a leaf then
    if left_rows.len() < params.min_samples_leaf || right_rows.len() < params.min_samples_leaf {
        return node_id;
    }

    let left = build_node(nodes, x, y, left_rows, depth + 1, params);
    let right = build_node(nodes, x, y, right_rows, depth + 1, params);
    nodes[node_id] = TreeNode {
        feature,
        threshold,
        left,
        right,
        value: mean,
        is_leaf: false,
    };
    node_id
}

/// Exhaustive best-split search over all features. Returns None
/// when no boundary satisfies the leaf-size minimums.
fn best_split(
    x: ArrayView2<f64>,
    y: ArrayView1<f64>,
    indices: &[usize],
    params: &ForestHyperparams,
) -> Option<(usize, f64)> {
    let n = indices.len();
    let min_leaf = params.min_samples_leaf.max(1);
    let mut best: Option<(usize, f64)> = None;
    let mut best_score = f64::INFINITY;

    let mut order: Vec<(f64, f64)> = Vec::with_capacity(n);
    for feature in 0..x.ncols() {
        order.clear();
        order.extend(indices.iter().map(|&i| (x[[i, feature]], y[i])));
        // Feature values are validated finite, so total_cmp is a
        // plain numeric sort here
        order.sort_by(|a, b| a.0.total_cmp(&b.0));

        let total_sum: f64 = order.iter().map(|&(_, t)| t).sum();
        let total_sum_sq: f64 = order.iter().map(|&(_, t)| t * t).sum();

        let mut left_sum = 0.0;
        let mut left_sum_sq = 0.0;
        for i in 1..n {
            let (value, target) = order[i - 1];
            left_sum += target;
            left_sum_sq += target * target;

            if i < min_leaf || n - i < min_leaf {
                continue;
            }
            // No threshold exists between two equal values
            if value == order[i].0 {
                continue;
            }

            let left_n = i as f64;
            let right_n = (n - i) as f64;
            let right_sum = total_sum - left_sum;
            let right_sum_sq = total_sum_sq - left_sum_sq;
            let score = (left_sum_sq - left_sum * left_sum / left_n)
                + (right_sum_sq - right_sum * right_sum / right_n);

            if score < best_score {
                best_score = score;
                best = Some((feature, (value + order[i].0) / 2.0));
            }
        }
    }

    best
}
