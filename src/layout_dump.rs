use crate::graph::{EdgeClass, OrgGraph};
use crate::layout::LayoutResult;
use crate::search::SearchMatches;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Everything the rendering surface needs for one frame.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
    pub expanded: Vec<String>,
    pub matches: Vec<String>,
    pub query: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: String,
    pub label: String,
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rank: usize,
    pub depth: usize,
    pub member_count: usize,
    pub team_count: usize,
    pub expanded: bool,
    pub highlighted: bool,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub id: String,
    pub from: String,
    pub to: String,
    pub class: EdgeClass,
    pub dashed: bool,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &LayoutResult, graph: &OrgGraph, matches: &SearchMatches) -> Self {
        let nodes = layout
            .nodes
            .iter()
            .filter_map(|node| {
                let data = graph.node(&node.id)?;
                Some(NodeDump {
                    id: node.id.clone(),
                    label: data.label.clone(),
                    kind: node.kind.as_str().to_string(),
                    x: node.x,
                    y: node.y,
                    width: node.width,
                    height: node.height,
                    rank: node.rank,
                    depth: data.depth,
                    member_count: data.member_count,
                    team_count: data.team_count,
                    expanded: data.expanded,
                    highlighted: matches.contains(&node.id),
                })
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                id: edge.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
                class: edge.class,
                dashed: edge.class.is_dashed(),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        let expanded = graph
            .nodes
            .iter()
            .filter(|node| node.expanded)
            .map(|node| node.id.clone())
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            nodes,
            edges,
            expanded,
            matches: matches.units.iter().cloned().collect(),
            query: if matches.query.is_empty() {
                None
            } else {
                Some(matches.query.clone())
            },
        }
    }
}

pub fn write_layout_dump(
    path: &Path,
    layout: &LayoutResult,
    graph: &OrgGraph,
    matches: &SearchMatches,
) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, graph, matches);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}
