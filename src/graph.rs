use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::model::{OrgChart, OrgUnit, UnitKind};
use crate::visibility::Tab;

/// How an edge attaches its child, so the renderer can style each class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeClass {
    /// Founder to executive.
    Founding,
    /// Executive to department.
    Reporting,
    /// Department (or team) to team. Drawn dashed.
    Team,
}

impl EdgeClass {
    pub fn for_child(kind: UnitKind) -> Self {
        match kind {
            UnitKind::Founder | UnitKind::Executive => EdgeClass::Founding,
            UnitKind::Department => EdgeClass::Reporting,
            UnitKind::Team => EdgeClass::Team,
        }
    }

    pub fn is_dashed(self) -> bool {
        matches!(self, EdgeClass::Team)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub label: String,
    pub kind: UnitKind,
    pub depth: usize,
    pub member_count: usize,
    pub team_count: usize,
    pub expanded: bool,
    /// Passed through for highlighting; never used for filtering here.
    pub search_query: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub class: EdgeClass,
}

impl GraphEdge {
    pub fn new(source: &str, target: &str, class: EdgeClass) -> Self {
        Self {
            id: edge_id(source, target),
            source: source.to_string(),
            target: target.to_string(),
            class,
        }
    }
}

/// Stable edge id for renderer diffing. The source length prefix keeps ids
/// distinct when unit ids themselves contain `-`.
pub fn edge_id(source: &str, target: &str) -> String {
    format!("e-{}:{source}-{target}", source.len())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrgGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl OrgGraph {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// UI state folded into node payloads.
#[derive(Debug, Clone, Copy)]
pub struct GraphContext<'a> {
    pub tab: &'a Tab,
    pub expanded: &'a BTreeSet<String>,
    pub query: Option<&'a str>,
}

/// One node per visible unit, one edge per visible parent/child pair plus a
/// fixed edge from every visible founder to the executive. Children whose
/// parent is hidden simply get no edge.
pub fn build_graph(chart: &OrgChart, visible: &[&OrgUnit], ctx: GraphContext<'_>) -> Result<OrgGraph> {
    let visible_ids: HashSet<&str> = visible.iter().map(|unit| unit.id.as_str()).collect();
    let query = ctx
        .query
        .map(str::trim)
        .filter(|query| !query.is_empty())
        .map(str::to_string);

    let mut graph = OrgGraph::default();
    for unit in visible {
        let team_count = visible
            .iter()
            .filter(|other| other.parent_id.as_deref() == Some(unit.id.as_str()))
            .count();
        let expanded = match unit.kind {
            UnitKind::Department => match ctx.tab {
                Tab::All => ctx.expanded.contains(&unit.id),
                Tab::Department(id) => *id == unit.id,
            },
            UnitKind::Founder | UnitKind::Executive | UnitKind::Team => false,
        };
        graph.nodes.push(GraphNode {
            id: unit.id.clone(),
            label: unit.name.clone(),
            kind: unit.kind,
            depth: chart.depth_of(&unit.id)?,
            member_count: unit.members.len(),
            team_count,
            expanded,
            search_query: query.clone(),
        });

        match unit.kind {
            UnitKind::Founder => {}
            UnitKind::Executive => {
                for founder in visible.iter().filter(|other| other.kind == UnitKind::Founder) {
                    graph
                        .edges
                        .push(GraphEdge::new(&founder.id, &unit.id, EdgeClass::Founding));
                }
            }
            UnitKind::Department | UnitKind::Team => {
                let Some(parent) = unit.parent_id.as_deref() else {
                    continue;
                };
                if visible_ids.contains(parent) {
                    graph
                        .edges
                        .push(GraphEdge::new(parent, &unit.id, EdgeClass::for_child(unit.kind)));
                }
            }
        }
    }
    Ok(graph)
}
