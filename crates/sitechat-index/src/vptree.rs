//! Vantage-point tree over the prepared corpus vectors.
//!
//! Each node holds one corpus point (the vantage point) and a radius: the
//! inside subtree holds points within `radius` of it, the outside subtree
//! points at `radius` or beyond. Search walks nearer subtrees first and skips
//! a subtree only when the triangle inequality proves it cannot hold a point
//! better than the current k-th neighbor. The tree partitions by Euclidean
//! distance between prepared vectors, which is monotone in both supported
//! metrics, so results match [`FlatIndex`](crate::FlatIndex) exactly.

use std::collections::BinaryHeap;

use sitechat_core::{Metric, Neighbor, Result, VectorIndex};

use crate::vectors::VectorSet;

// Widens pruning bounds so float rounding between the metric distance and the
// Euclidean geometry never discards a true neighbor.
const BOUND_SLACK_REL: f32 = 1e-4;
const BOUND_SLACK_ABS: f32 = 1e-5;

#[derive(Debug, Clone)]
struct Node {
    point: usize,
    radius: f32,
    inside: Option<usize>,
    outside: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct VpTreeIndex {
    vectors: VectorSet,
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl VpTreeIndex {
    pub fn build(metric: Metric, dim: usize, embeddings: &[Vec<f32>]) -> Result<Self> {
        let vectors = VectorSet::build(metric, dim, embeddings)?;
        let mut nodes = Vec::with_capacity(vectors.len());
        let mut items: Vec<usize> = (0..vectors.len()).collect();
        let root = build_node(&vectors, &mut nodes, &mut items);
        tracing::debug!(points = vectors.len(), nodes = nodes.len(), "built vantage-point tree");
        Ok(Self { vectors, nodes, root })
    }

    fn search_bound(&self, heap: &BinaryHeap<Neighbor>, k: usize) -> f32 {
        match heap.peek() {
            Some(worst) if heap.len() >= k => {
                let r = self.vectors.euclidean_radius(worst.distance);
                r * (1.0 + BOUND_SLACK_REL) + BOUND_SLACK_ABS
            }
            _ => f32::INFINITY,
        }
    }
}

/// Builds the subtree over `items` and returns its node id. The first item is
/// the vantage point; the rest are split at the median distance from it.
fn build_node(vectors: &VectorSet, nodes: &mut Vec<Node>, items: &mut [usize]) -> Option<usize> {
    let (&mut point, rest) = items.split_first_mut()?;
    let id = nodes.len();
    nodes.push(Node { point, radius: 0.0, inside: None, outside: None });
    if rest.is_empty() {
        return Some(id);
    }

    let vantage = vectors.row(point).to_vec();
    let mut by_distance: Vec<(f32, usize)> =
        rest.iter().map(|&p| (vectors.euclidean_to(&vantage, p), p)).collect();
    by_distance.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    for (slot, &(_, p)) in rest.iter_mut().zip(&by_distance) {
        *slot = p;
    }

    let median = (by_distance.len() - 1) / 2;
    let radius = by_distance[median].0;
    let (inside_items, outside_items) = rest.split_at_mut(median + 1);
    let inside = build_node(vectors, nodes, inside_items);
    let outside = build_node(vectors, nodes, outside_items);
    nodes[id] = Node { point, radius, inside, outside };
    Some(id)
}

fn offer(heap: &mut BinaryHeap<Neighbor>, k: usize, candidate: Neighbor) {
    if heap.len() < k {
        heap.push(candidate);
    } else if heap.peek().is_some_and(|worst| candidate < *worst) {
        heap.pop();
        heap.push(candidate);
    }
}

impl VectorIndex for VpTreeIndex {
    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dim(&self) -> usize {
        self.vectors.dim()
    }

    fn metric(&self) -> Metric {
        self.vectors.metric()
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        let Some(root) = self.root else { return Ok(Vec::new()) };
        if k == 0 {
            return Ok(Vec::new());
        }
        let query = self.vectors.prepare_query(query)?;
        let k = k.min(self.vectors.len());

        // Max-heap on (distance, position): the top is the current k-th best.
        let mut heap = BinaryHeap::with_capacity(k + 1);
        // Pending subtrees with a lower bound on their Euclidean distance.
        let mut pending: Vec<(usize, f32)> = vec![(root, 0.0)];
        while let Some((id, lower_bound)) = pending.pop() {
            if lower_bound > self.search_bound(&heap, k) {
                continue;
            }
            let node = &self.nodes[id];
            offer(&mut heap, k, Neighbor::new(node.point, self.vectors.distance_to(&query, node.point)));

            let d = self.vectors.euclidean_to(&query, node.point);
            let inside = node.inside.map(|c| (c, (d - node.radius).max(0.0)));
            let outside = node.outside.map(|c| (c, (node.radius - d).max(0.0)));
            // Push the farther side first so the nearer side is explored first.
            let (near, far) = if d <= node.radius { (inside, outside) } else { (outside, inside) };
            let bound = self.search_bound(&heap, k);
            for (child, child_bound) in [far, near].into_iter().flatten() {
                if child_bound <= bound {
                    pending.push((child, child_bound));
                }
            }
        }
        Ok(heap.into_sorted_vec())
    }
}
