use std::collections::BTreeSet;

use orgchart_layout::graph::GraphContext;
use orgchart_layout::layout_dump::LayoutDump;
use orgchart_layout::{
    LayoutConfig, OrgChart, SearchMatches, Tab, build_graph, compute_layout, search,
    visible_units,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// UI state owned by the JavaScript side. Expansion persistence lives there
/// too, so this wrapper stays a pure function of its inputs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartLayoutOptions {
    tab: Option<String>,
    expanded: Option<Vec<String>>,
    query: Option<String>,
    node_spacing: Option<f32>,
    rank_spacing: Option<f32>,
}

fn layout_chart_json(units_json: &str, options: ChartLayoutOptions) -> Result<String, String> {
    let chart = OrgChart::from_json(units_json).map_err(|error| error.to_string())?;

    let mut config = LayoutConfig::default();
    if let Some(node_spacing) = options.node_spacing {
        config.node_spacing = node_spacing;
    }
    if let Some(rank_spacing) = options.rank_spacing {
        config.rank_spacing = rank_spacing;
    }

    let tab = Tab::from_token(options.tab.as_deref().unwrap_or("all"));
    if let Some(id) = tab.department() {
        if !chart.is_department(id) {
            return Err(format!("`{id}` is not a department"));
        }
    }
    let expanded: BTreeSet<String> = match options.expanded {
        Some(ids) => ids.into_iter().collect(),
        None => chart.departments().map(|unit| unit.id.clone()).collect(),
    };
    let matches = match options.query.as_deref() {
        Some(query) => search(&chart, query),
        None => SearchMatches::default(),
    };

    let visible = visible_units(&chart, &tab, &expanded);
    let graph = build_graph(
        &chart,
        &visible,
        GraphContext {
            tab: &tab,
            expanded: &expanded,
            query: options.query.as_deref(),
        },
    )
    .map_err(|error| error.to_string())?;
    let layout = compute_layout(&graph, &config);
    let dump = LayoutDump::from_layout(&layout, &graph, &matches);
    serde_json::to_string(&dump).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn layout_chart(units_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<ChartLayoutOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        ChartLayoutOptions::default()
    };

    layout_chart_json(units_json, options).map_err(|error| JsValue::from_str(&error))
}
