use serde::Serialize;

use crate::graph::EdgeClass;
use crate::model::UnitKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLayout {
    pub id: String,
    pub kind: UnitKind,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rank: usize,
}

impl NodeLayout {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Where outgoing edges leave the node.
    pub fn bottom_center(&self) -> (f32, f32) {
        (self.center_x(), self.y + self.height)
    }

    /// Where incoming edges enter the node.
    pub fn top_center(&self) -> (f32, f32) {
        (self.center_x(), self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub id: String,
    pub from: String,
    pub to: String,
    pub class: EdgeClass,
    pub points: Vec<(f32, f32)>,
}

/// Positioned nodes and routed edges. Built fresh on every layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Nodes in graph order.
    pub nodes: Vec<NodeLayout>,
    pub edges: Vec<EdgeLayout>,
    pub width: f32,
    pub height: f32,
}

impl LayoutResult {
    pub fn node(&self, id: &str) -> Option<&NodeLayout> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeLayout> {
        self.edges.iter().find(|edge| edge.id == id)
    }
}
