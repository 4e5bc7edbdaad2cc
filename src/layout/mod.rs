//! Layered (Sugiyama-style) layout of the org graph.
//!
//! Ranks come from hierarchy depth rather than from a rank-minimizing
//! heuristic, so founders always sit above the executive, the executive above
//! departments and departments above teams. Long edges are split with dummy
//! nodes, ranks are ordered by median sweeps, and x coordinates are balanced
//! toward neighbour barycenters while keeping `node_spacing` between nodes.
//! Every tie is broken by graph order, so the same input always yields the
//! same coordinates.

mod ranking;
mod routing;
mod types;

use std::collections::HashMap;

use tracing::trace;

use crate::config::LayoutConfig;
use crate::graph::OrgGraph;

use ranking::{Adjacency, RankEdge, order_rank_nodes, rank_by_depth};
use routing::{same_rank_step, smooth_step};

pub use types::{EdgeLayout, LayoutResult, NodeLayout};

/// One placeable box. Graph nodes occupy slots `0..graph.nodes.len()` in
/// graph order; dummies for long edges follow.
#[derive(Debug, Clone, Copy)]
struct Slot {
    width: f32,
    height: f32,
    rank: usize,
    center_x: f32,
    dummy: bool,
}

pub fn compute_layout(graph: &OrgGraph, config: &LayoutConfig) -> LayoutResult {
    if graph.nodes.is_empty() {
        return LayoutResult::default();
    }

    let node_index: HashMap<&str, usize> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id.as_str(), idx))
        .collect();
    let ranks = rank_by_depth(&graph.nodes);
    let max_rank = ranks.iter().copied().max().unwrap_or(0);

    let mut slots: Vec<Slot> = Vec::with_capacity(graph.nodes.len());
    let mut rank_nodes: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    for (idx, node) in graph.nodes.iter().enumerate() {
        let size = config.node_sizes.for_kind(node.kind);
        slots.push(Slot {
            width: size.width,
            height: size.height,
            rank: ranks[idx],
            center_x: 0.0,
            dummy: false,
        });
        rank_nodes[ranks[idx]].push(idx);
    }

    // Split edges spanning several ranks so ordering sees every band.
    let mut layout_edges: Vec<RankEdge> = Vec::with_capacity(graph.edges.len());
    let mut endpoints: Vec<Option<(usize, usize)>> = Vec::with_capacity(graph.edges.len());
    let mut chains: HashMap<usize, Vec<usize>> = HashMap::new();
    for (edge_idx, edge) in graph.edges.iter().enumerate() {
        let (Some(&from), Some(&to)) = (
            node_index.get(edge.source.as_str()),
            node_index.get(edge.target.as_str()),
        ) else {
            debug_assert!(false, "edge {} references a node outside the graph", edge.id);
            endpoints.push(None);
            continue;
        };
        endpoints.push(Some((from, to)));
        let (from_rank, to_rank) = (ranks[from], ranks[to]);
        if to_rank <= from_rank {
            continue;
        }
        let mut prev = from;
        let mut chain = Vec::new();
        for rank in (from_rank + 1)..to_rank {
            let dummy = slots.len();
            slots.push(Slot {
                width: 0.0,
                height: 0.0,
                rank,
                center_x: 0.0,
                dummy: true,
            });
            rank_nodes[rank].push(dummy);
            layout_edges.push(RankEdge { from: prev, to: dummy });
            chain.push(dummy);
            prev = dummy;
        }
        layout_edges.push(RankEdge { from: prev, to });
        if !chain.is_empty() {
            chains.insert(edge_idx, chain);
        }
    }

    let adjacency = Adjacency::new(slots.len(), &layout_edges);
    order_rank_nodes(&mut rank_nodes, &adjacency, config.order_passes);

    let rank_tops = assign_rank_tops(&rank_nodes, &slots, config);
    assign_cross_positions(&rank_nodes, &adjacency, &mut slots, config);

    let min_x = slots
        .iter()
        .map(|slot| slot.center_x - slot.width / 2.0)
        .fold(f32::MAX, f32::min);
    let shift_x = config.padding - min_x;

    let mut nodes: Vec<NodeLayout> = Vec::with_capacity(graph.nodes.len());
    let mut max_x: f32 = 0.0;
    let mut max_y: f32 = 0.0;
    for (node, slot) in graph.nodes.iter().zip(&slots) {
        let layout = NodeLayout {
            id: node.id.clone(),
            kind: node.kind,
            x: slot.center_x - slot.width / 2.0 + shift_x,
            y: rank_tops[slot.rank],
            width: slot.width,
            height: slot.height,
            rank: slot.rank,
        };
        max_x = max_x.max(layout.x + layout.width);
        max_y = max_y.max(layout.y + layout.height);
        nodes.push(layout);
    }

    let mut edges: Vec<EdgeLayout> = Vec::with_capacity(graph.edges.len());
    for (edge_idx, edge) in graph.edges.iter().enumerate() {
        let Some((from_idx, to_idx)) = endpoints[edge_idx] else {
            continue;
        };
        let from = &nodes[from_idx];
        let to = &nodes[to_idx];
        let points = if to.rank <= from.rank {
            same_rank_step(from, to, config.rank_spacing / 4.0)
        } else {
            let via: Vec<(f32, f32)> = chains
                .get(&edge_idx)
                .map(|chain| {
                    chain
                        .iter()
                        .map(|&dummy| {
                            let slot = slots[dummy];
                            let band = rank_band(slot.rank, &rank_nodes, &slots);
                            (slot.center_x + shift_x, rank_tops[slot.rank] + band / 2.0)
                        })
                        .collect()
                })
                .unwrap_or_default();
            smooth_step(from, to, &via)
        };
        for point in &points {
            max_y = max_y.max(point.1);
        }
        edges.push(EdgeLayout {
            id: edge.id.clone(),
            from: edge.source.clone(),
            to: edge.target.clone(),
            class: edge.class,
            points,
        });
    }

    trace!(
        nodes = nodes.len(),
        edges = edges.len(),
        dummies = slots.len() - graph.nodes.len(),
        ranks = rank_nodes.len(),
        "layout computed"
    );
    LayoutResult {
        nodes,
        edges,
        width: max_x + config.padding,
        height: max_y + config.padding,
    }
}

/// Tallest real node on a rank.
fn rank_band(rank: usize, rank_nodes: &[Vec<usize>], slots: &[Slot]) -> f32 {
    rank_nodes[rank]
        .iter()
        .map(|&idx| slots[idx].height)
        .fold(0.0, f32::max)
}

fn assign_rank_tops(rank_nodes: &[Vec<usize>], slots: &[Slot], config: &LayoutConfig) -> Vec<f32> {
    let mut tops = Vec::with_capacity(rank_nodes.len());
    let mut main_cursor = config.padding;
    for rank in 0..rank_nodes.len() {
        tops.push(main_cursor);
        main_cursor += rank_band(rank, rank_nodes, slots) + config.rank_spacing;
    }
    tops
}

/// Pulls every node toward the mean of its placed neighbours, sweeping down
/// (parents) then up (children). Rank order is kept and neighbours stay at
/// least `node_spacing` apart.
fn assign_cross_positions(
    rank_nodes: &[Vec<usize>],
    adjacency: &Adjacency,
    slots: &mut [Slot],
    config: &LayoutConfig,
) {
    let mut placed: Vec<Option<f32>> = vec![None; slots.len()];
    let mut place_rank = |rank_idx: usize, use_parents: bool, slots: &mut [Slot]| {
        let bucket = &rank_nodes[rank_idx];
        if bucket.is_empty() {
            return;
        }
        let neighbors = if use_parents {
            &adjacency.parents
        } else {
            &adjacency.children
        };
        let entries: Vec<(usize, f32)> = bucket
            .iter()
            .map(|&idx| {
                let centers: Vec<f32> = neighbors[idx].iter().filter_map(|&n| placed[n]).collect();
                let desired = if centers.is_empty() {
                    placed[idx].unwrap_or(0.0)
                } else {
                    centers.iter().sum::<f32>() / centers.len() as f32
                };
                (idx, desired)
            })
            .collect();

        let desired_mean = entries.iter().map(|(_, d)| *d).sum::<f32>() / entries.len() as f32;
        let mut assigned: Vec<(usize, f32)> = Vec::with_capacity(entries.len());
        let mut prev: Option<(f32, f32)> = None;
        for (idx, desired) in entries {
            let half = slots[idx].width / 2.0;
            let center = match prev {
                Some((prev_center, prev_half)) => {
                    let gap = if slots[idx].dummy {
                        config.node_spacing / 2.0
                    } else {
                        config.node_spacing
                    };
                    desired.max(prev_center + prev_half + half + gap)
                }
                None => desired,
            };
            assigned.push((idx, center));
            prev = Some((center, half));
        }
        let actual_mean = assigned.iter().map(|(_, c)| *c).sum::<f32>() / assigned.len() as f32;
        let delta = desired_mean - actual_mean;
        for (idx, center) in assigned {
            slots[idx].center_x = center + delta;
            placed[idx] = Some(center + delta);
        }
    };

    for _ in 0..config.position_passes.max(1) {
        for rank_idx in 0..rank_nodes.len() {
            place_rank(rank_idx, true, slots);
        }
        for rank_idx in (0..rank_nodes.len()).rev() {
            place_rank(rank_idx, false, slots);
        }
    }
}
