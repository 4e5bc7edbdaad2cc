use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::depth;
use crate::error::{OrgError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    Founder,
    Executive,
    Department,
    Team,
}

impl UnitKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Founder => "founder",
            UnitKind::Executive => "executive",
            UnitKind::Department => "department",
            UnitKind::Team => "team",
        }
    }

    /// Units whose children can be shown or hidden.
    pub fn is_expandable(self) -> bool {
        matches!(self, UnitKind::Department)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Member {
    pub fn new(name: &str, role: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            role: role.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgUnit {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: UnitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl OrgUnit {
    pub fn new(id: &str, name: &str, kind: UnitKind, parent_id: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            parent_id: parent_id.map(str::to_string),
            members: Vec::new(),
            category: None,
            description: None,
            icon: None,
        }
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }
}

/// A validated, immutable collection of org units.
///
/// Insertion order is preserved and drives every derived ordering
/// (visibility, graph nodes, layout tie-breaks).
#[derive(Debug, Clone)]
pub struct OrgChart {
    units: Vec<OrgUnit>,
    index: HashMap<String, usize>,
    depths: Vec<usize>,
    executive: usize,
}

impl OrgChart {
    pub fn from_json(input: &str) -> Result<Self> {
        let units: Vec<OrgUnit> = serde_json::from_str(input)?;
        Self::from_units(units)
    }

    pub fn from_units(units: Vec<OrgUnit>) -> Result<Self> {
        let mut index: HashMap<String, usize> = HashMap::with_capacity(units.len());
        let mut executive: Option<usize> = None;
        for (idx, unit) in units.iter().enumerate() {
            if index.insert(unit.id.clone(), idx).is_some() {
                return Err(OrgError::DuplicateId(unit.id.clone()));
            }
            if unit.kind == UnitKind::Executive {
                if let Some(first) = executive {
                    return Err(OrgError::MultipleExecutives {
                        first: units[first].id.clone(),
                        second: unit.id.clone(),
                    });
                }
                executive = Some(idx);
            }
        }
        let executive = executive.ok_or(OrgError::MissingExecutive)?;

        for unit in &units {
            validate_parent(unit, &units, &index)?;
        }
        depth::reject_parent_cycles(&units, &index)?;

        let depths = depth::resolve_all(&units, &index)?;
        debug!(
            units = units.len(),
            executive = %units[executive].id,
            "org chart validated"
        );
        Ok(Self {
            units,
            index,
            depths,
            executive,
        })
    }

    pub fn units(&self) -> &[OrgUnit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&OrgUnit> {
        self.index.get(id).map(|idx| &self.units[*idx])
    }

    pub fn executive(&self) -> &OrgUnit {
        &self.units[self.executive]
    }

    pub fn founders(&self) -> impl Iterator<Item = &OrgUnit> {
        self.of_kind(UnitKind::Founder)
    }

    pub fn departments(&self) -> impl Iterator<Item = &OrgUnit> {
        self.of_kind(UnitKind::Department)
    }

    pub fn of_kind(&self, kind: UnitKind) -> impl Iterator<Item = &OrgUnit> {
        self.units.iter().filter(move |unit| unit.kind == kind)
    }

    pub fn children<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a OrgUnit> + 'a {
        self.units
            .iter()
            .filter(move |unit| unit.parent_id.as_deref() == Some(id))
    }

    pub fn is_department(&self, id: &str) -> bool {
        self.get(id)
            .is_some_and(|unit| unit.kind == UnitKind::Department)
    }

    pub fn depth_of(&self, id: &str) -> Result<usize> {
        self.index
            .get(id)
            .map(|idx| self.depths[*idx])
            .ok_or_else(|| OrgError::UnknownUnit(id.to_string()))
    }

    /// The department a unit belongs to: itself for departments, the nearest
    /// department ancestor for teams, `None` for founders and the executive.
    pub fn owning_department(&self, id: &str) -> Option<&OrgUnit> {
        let mut current = self.get(id)?;
        // Validation rules out cycles, but the walk stays bounded anyway.
        for _ in 0..=self.units.len() {
            match current.kind {
                UnitKind::Department => return Some(current),
                UnitKind::Founder | UnitKind::Executive => return None,
                UnitKind::Team => {
                    current = self.get(current.parent_id.as_deref()?)?;
                }
            }
        }
        None
    }
}

fn validate_parent(unit: &OrgUnit, units: &[OrgUnit], index: &HashMap<String, usize>) -> Result<()> {
    let parent = match unit.parent_id.as_deref() {
        Some(parent_id) => match index.get(parent_id) {
            Some(idx) => Some(&units[*idx]),
            None => {
                return Err(OrgError::DanglingParent {
                    unit: unit.id.clone(),
                    parent: parent_id.to_string(),
                });
            }
        },
        None => None,
    };

    match unit.kind {
        UnitKind::Founder | UnitKind::Executive => {
            if parent.is_some() {
                return Err(OrgError::UnexpectedParent {
                    unit: unit.id.clone(),
                });
            }
        }
        // Departments sit at a fixed depth whatever they point at.
        UnitKind::Department => {}
        UnitKind::Team => {
            let Some(parent) = parent else {
                return Err(OrgError::MissingParent {
                    unit: unit.id.clone(),
                });
            };
            if !matches!(parent.kind, UnitKind::Department | UnitKind::Team) {
                return Err(OrgError::InvalidParent {
                    unit: unit.id.clone(),
                    parent: parent.id.clone(),
                });
            }
        }
    }
    Ok(())
}
