use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{OrgChart, OrgUnit, UnitKind};

pub const ALL_TAB: &str = "all";

/// Which slice of the chart is on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tab {
    #[default]
    All,
    Department(String),
}

impl Tab {
    pub fn from_token(token: &str) -> Self {
        let token = token.trim();
        if token.is_empty() || token.eq_ignore_ascii_case(ALL_TAB) {
            Tab::All
        } else {
            Tab::Department(token.to_string())
        }
    }

    pub fn department(&self) -> Option<&str> {
        match self {
            Tab::All => None,
            Tab::Department(id) => Some(id.as_str()),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::All => f.write_str(ALL_TAB),
            Tab::Department(id) => f.write_str(id),
        }
    }
}

impl From<String> for Tab {
    fn from(value: String) -> Self {
        Tab::from_token(&value)
    }
}

impl From<Tab> for String {
    fn from(value: Tab) -> Self {
        value.to_string()
    }
}

/// Units on screen for `tab` and the current expansion set, in chart order.
///
/// Search never enters here directly: it rewrites the expansion set first.
pub fn visible_units<'a>(
    chart: &'a OrgChart,
    tab: &Tab,
    expanded: &BTreeSet<String>,
) -> Vec<&'a OrgUnit> {
    chart
        .units()
        .iter()
        .filter(|unit| is_visible(unit, tab, expanded))
        .collect()
}

fn is_visible(unit: &OrgUnit, tab: &Tab, expanded: &BTreeSet<String>) -> bool {
    match unit.kind {
        UnitKind::Founder | UnitKind::Executive => true,
        UnitKind::Department => match tab {
            Tab::All => true,
            Tab::Department(id) => unit.id == *id,
        },
        UnitKind::Team => {
            let Some(parent) = unit.parent_id.as_deref() else {
                return false;
            };
            match tab {
                Tab::All => expanded.contains(parent),
                Tab::Department(id) => parent == id,
            }
        }
    }
}
