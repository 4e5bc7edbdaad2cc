pub mod chart;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod depth;
pub mod error;
pub mod graph;
pub mod layout;
pub mod layout_dump;
pub mod members;
pub mod model;
pub mod refit;
pub mod search;
pub mod state;
pub mod storage;
pub mod visibility;

pub use chart::OrgChartView;
#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use error::{OrgError, Result, StorageError};
pub use graph::{EdgeClass, GraphEdge, GraphNode, OrgGraph, build_graph};
pub use layout::{EdgeLayout, LayoutResult, NodeLayout, compute_layout};
pub use members::sorted_members;
pub use model::{Member, OrgChart, OrgUnit, UnitKind};
pub use search::{SearchMatches, search};
pub use state::{ExpansionController, Viewport};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use visibility::{Tab, visible_units};
