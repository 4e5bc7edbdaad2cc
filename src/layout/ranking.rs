//! Rank assignment and crossing reduction over node indices.
//!
//! Graph nodes keep their graph index; dummy nodes are appended after them,
//! so a slot index alone tells the two apart and no id can collide.

use std::collections::{BTreeSet, HashMap};

use crate::graph::GraphNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RankEdge {
    pub from: usize,
    pub to: usize,
}

/// Parent and child lists per slot index.
#[derive(Debug, Default)]
pub(super) struct Adjacency {
    pub parents: Vec<Vec<usize>>,
    pub children: Vec<Vec<usize>>,
}

impl Adjacency {
    pub fn new(slot_count: usize, edges: &[RankEdge]) -> Self {
        let mut adjacency = Self {
            parents: vec![Vec::new(); slot_count],
            children: vec![Vec::new(); slot_count],
        };
        for edge in edges {
            adjacency.children[edge.from].push(edge.to);
            adjacency.parents[edge.to].push(edge.from);
        }
        adjacency
    }
}

/// Ranks taken straight from hierarchy depth, with unused depths squeezed
/// out so a chart without founders does not start with an empty band.
pub(super) fn rank_by_depth(nodes: &[GraphNode]) -> Vec<usize> {
    let depths: BTreeSet<usize> = nodes.iter().map(|node| node.depth).collect();
    let compact: HashMap<usize, usize> = depths
        .into_iter()
        .enumerate()
        .map(|(rank, depth)| (depth, rank))
        .collect();
    nodes.iter().map(|node| compact[&node.depth]).collect()
}

/// Reorders each rank by the median position of its neighbours, sweeping
/// down against parents then up against children. Sorting is stable, so
/// nodes without a better spot keep their current order, which starts out
/// as graph order.
pub(super) fn order_rank_nodes(
    rank_nodes: &mut [Vec<usize>],
    adjacency: &Adjacency,
    passes: usize,
) {
    if rank_nodes.len() <= 1 {
        return;
    }
    let slot_count = adjacency.parents.len();
    let mut position = vec![0usize; slot_count];
    for bucket in rank_nodes.iter() {
        record_positions(bucket, &mut position);
    }

    for _ in 0..passes.max(1) {
        for rank in 1..rank_nodes.len() {
            reorder_bucket(&mut rank_nodes[rank], &adjacency.parents, &mut position);
        }
        for rank in (0..rank_nodes.len() - 1).rev() {
            reorder_bucket(&mut rank_nodes[rank], &adjacency.children, &mut position);
        }
    }
}

fn record_positions(bucket: &[usize], position: &mut [usize]) {
    for (pos, &slot) in bucket.iter().enumerate() {
        position[slot] = pos;
    }
}

fn reorder_bucket(bucket: &mut Vec<usize>, neighbors: &[Vec<usize>], position: &mut [usize]) {
    if bucket.len() <= 1 {
        return;
    }
    let mut keyed: Vec<(f32, usize)> = bucket
        .iter()
        .map(|&slot| {
            let key = median_position(&neighbors[slot], position).unwrap_or(position[slot] as f32);
            (key, slot)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    bucket.clear();
    bucket.extend(keyed.into_iter().map(|(_, slot)| slot));
    record_positions(bucket, position);
}

/// Median rank position of `neighbors`, or `None` when there are none.
pub(super) fn median_position(neighbors: &[usize], position: &[usize]) -> Option<f32> {
    if neighbors.is_empty() {
        return None;
    }
    let mut values: Vec<usize> = neighbors.iter().map(|&slot| position[slot]).collect();
    values.sort_unstable();
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 1 {
        values[mid] as f32
    } else {
        (values[mid - 1] + values[mid]) as f32 * 0.5
    })
}
