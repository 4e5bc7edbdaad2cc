use crate::model::UnitKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeSize {
    pub width: f32,
    pub height: f32,
}

impl NodeSize {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSizes {
    pub founder: NodeSize,
    pub executive: NodeSize,
    pub department: NodeSize,
    pub team: NodeSize,
}

impl Default for NodeSizes {
    fn default() -> Self {
        Self {
            founder: NodeSize::new(220.0, 96.0),
            executive: NodeSize::new(260.0, 110.0),
            department: NodeSize::new(240.0, 120.0),
            team: NodeSize::new(200.0, 90.0),
        }
    }
}

impl NodeSizes {
    pub fn for_kind(&self, kind: UnitKind) -> NodeSize {
        match kind {
            UnitKind::Founder => self.founder,
            UnitKind::Executive => self.executive,
            UnitKind::Department => self.department,
            UnitKind::Team => self.team,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap between neighbouring nodes on the same rank.
    pub node_spacing: f32,
    /// Gap between consecutive ranks.
    pub rank_spacing: f32,
    /// Margin kept around the drawing after normalization.
    pub padding: f32,
    /// Median sweeps used to reduce crossings.
    pub order_passes: usize,
    /// Coordinate balancing sweeps (down then up).
    pub position_passes: usize,
    pub node_sizes: NodeSizes,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_spacing: 60.0,
            rank_spacing: 150.0,
            padding: 24.0,
            order_passes: 4,
            position_passes: 2,
            node_sizes: NodeSizes::default(),
        }
    }
}

/// Keys under which UI state is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageKeys {
    pub expanded_departments: String,
    pub viewport: String,
    pub all_sections_expanded: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            expanded_departments: "orgchart.expandedDepartments".to_string(),
            viewport: "orgchart.viewport".to_string(),
            all_sections_expanded: "orgchart.allSectionsExpanded".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub storage: StorageKeys,
    /// Delay before the viewport re-fits after an expansion change.
    pub refit_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            storage: StorageKeys::default(),
            refit_delay_ms: 300,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
    padding: Option<f32>,
    order_passes: Option<usize>,
    position_passes: Option<usize>,
    node_sizes: Option<NodeSizesFile>,
    storage_prefix: Option<String>,
    refit_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct NodeSizesFile {
    founder: Option<NodeSize>,
    executive: Option<NodeSize>,
    department: Option<NodeSize>,
    team: Option<NodeSize>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parses a config document. JSON5 is accepted, so plain JSON works too.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(v) = parsed.node_spacing {
        config.layout.node_spacing = v;
    }
    if let Some(v) = parsed.rank_spacing {
        config.layout.rank_spacing = v;
    }
    if let Some(v) = parsed.padding {
        config.layout.padding = v;
    }
    if let Some(v) = parsed.order_passes {
        config.layout.order_passes = v;
    }
    if let Some(v) = parsed.position_passes {
        config.layout.position_passes = v;
    }
    if let Some(sizes) = parsed.node_sizes {
        if let Some(v) = sizes.founder {
            config.layout.node_sizes.founder = v;
        }
        if let Some(v) = sizes.executive {
            config.layout.node_sizes.executive = v;
        }
        if let Some(v) = sizes.department {
            config.layout.node_sizes.department = v;
        }
        if let Some(v) = sizes.team {
            config.layout.node_sizes.team = v;
        }
    }
    if let Some(prefix) = parsed.storage_prefix {
        config.storage = StorageKeys {
            expanded_departments: format!("{prefix}.expandedDepartments"),
            viewport: format!("{prefix}.viewport"),
            all_sections_expanded: format!("{prefix}.allSectionsExpanded"),
        };
    }
    if let Some(v) = parsed.refit_delay_ms {
        config.refit_delay_ms = v;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_path() {
        let config = load_config(None).unwrap();
        assert_eq!(config.layout.node_spacing, 60.0);
        assert_eq!(config.layout.rank_spacing, 150.0);
        assert_eq!(config.refit_delay_ms, 300);
        assert_eq!(
            config.storage.expanded_departments,
            "orgchart.expandedDepartments"
        );
    }

    #[test]
    fn parses_json5_overrides() {
        let config = parse_config(
            r#"{
                // tighter chart
                nodeSpacing: 40,
                rankSpacing: 140,
                nodeSizes: { team: { width: 180, height: 80 } },
                storagePrefix: "site",
            }"#,
        )
        .unwrap();
        assert_eq!(config.layout.node_spacing, 40.0);
        assert_eq!(config.layout.rank_spacing, 140.0);
        assert_eq!(config.layout.node_sizes.team, NodeSize::new(180.0, 80.0));
        assert_eq!(
            config.layout.node_sizes.department,
            NodeSizes::default().department
        );
        assert_eq!(config.storage.viewport, "site.viewport");
    }

    #[test]
    fn loads_plain_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orgchart.json");
        std::fs::write(&path, r#"{"refitDelayMs": 120, "orderPasses": 2}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.refit_delay_ms, 120);
        assert_eq!(config.layout.order_passes, 2);
    }
}
