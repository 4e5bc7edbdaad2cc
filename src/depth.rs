//! Hierarchy depth of every org unit.
//!
//! Founders sit at depth 0, the executive at 1 and departments at 2. Teams
//! are one level below their parent, resolved recursively so nested teams
//! keep working. A parent chain that loops back on itself is reported as a
//! configuration error instead of recursing forever, whatever kinds of unit
//! the loop passes through.

use std::collections::HashMap;

use crate::error::{OrgError, Result};
use crate::model::{OrgUnit, UnitKind};

pub const FOUNDER_DEPTH: usize = 0;
pub const EXECUTIVE_DEPTH: usize = 1;
pub const DEPARTMENT_DEPTH: usize = 2;

pub struct DepthResolver<'a> {
    units: &'a [OrgUnit],
    index: &'a HashMap<String, usize>,
    memo: HashMap<usize, usize>,
}

impl<'a> DepthResolver<'a> {
    pub fn new(units: &'a [OrgUnit], index: &'a HashMap<String, usize>) -> Self {
        Self {
            units,
            index,
            memo: HashMap::new(),
        }
    }

    pub fn depth_of(&mut self, id: &str) -> Result<usize> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| OrgError::UnknownUnit(id.to_string()))?;
        let mut trail = Vec::new();
        self.depth_at(idx, &mut trail)
    }

    fn depth_at(&mut self, idx: usize, trail: &mut Vec<usize>) -> Result<usize> {
        if let Some(depth) = self.memo.get(&idx) {
            return Ok(*depth);
        }
        let unit = &self.units[idx];
        let depth = match unit.kind {
            UnitKind::Founder => FOUNDER_DEPTH,
            UnitKind::Executive => EXECUTIVE_DEPTH,
            UnitKind::Department => DEPARTMENT_DEPTH,
            UnitKind::Team => {
                if trail.contains(&idx) {
                    return Err(OrgError::ParentCycle {
                        unit: unit.id.clone(),
                    });
                }
                let parent_id = unit.parent_id.as_deref().ok_or_else(|| OrgError::MissingParent {
                    unit: unit.id.clone(),
                })?;
                let parent_idx =
                    *self
                        .index
                        .get(parent_id)
                        .ok_or_else(|| OrgError::DanglingParent {
                            unit: unit.id.clone(),
                            parent: parent_id.to_string(),
                        })?;
                trail.push(idx);
                let parent_depth = self.depth_at(parent_idx, trail)?;
                trail.pop();
                parent_depth + 1
            }
        };
        self.memo.insert(idx, depth);
        Ok(depth)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Unseen,
    OnPath,
    Rooted,
}

/// Follows every unit's `parentId` chain to its end, independent of kind.
///
/// Departments take a fixed depth and never consult their parent while
/// resolving, so a loop through a department has to be caught here.
pub fn reject_parent_cycles(units: &[OrgUnit], index: &HashMap<String, usize>) -> Result<()> {
    let mut walk = vec![Walk::Unseen; units.len()];
    for start in 0..units.len() {
        let mut path = Vec::new();
        let mut current = Some(start);
        while let Some(idx) = current {
            match walk[idx] {
                Walk::Rooted => break,
                Walk::OnPath => {
                    return Err(OrgError::ParentCycle {
                        unit: units[idx].id.clone(),
                    });
                }
                Walk::Unseen => {
                    walk[idx] = Walk::OnPath;
                    path.push(idx);
                    current = units[idx]
                        .parent_id
                        .as_deref()
                        .and_then(|parent| index.get(parent).copied());
                }
            }
        }
        for idx in path {
            walk[idx] = Walk::Rooted;
        }
    }
    Ok(())
}

/// Depth of every unit, in unit order.
pub fn resolve_all(units: &[OrgUnit], index: &HashMap<String, usize>) -> Result<Vec<usize>> {
    let mut resolver = DepthResolver::new(units, index);
    units
        .iter()
        .map(|unit| resolver.depth_of(&unit.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample_units;

    fn index_of(units: &[OrgUnit]) -> HashMap<String, usize> {
        units
            .iter()
            .enumerate()
            .map(|(idx, unit)| (unit.id.clone(), idx))
            .collect()
    }

    #[test]
    fn fixed_depths_by_kind() {
        let units = sample_units();
        let index = index_of(&units);
        let depths = resolve_all(&units, &index).unwrap();
        assert_eq!(depths, vec![0, 0, 1, 2, 2, 3]);
    }

    #[test]
    fn child_is_one_below_parent() {
        let mut units = sample_units();
        units.push(OrgUnit::new("x-web-ui", "UI", UnitKind::Team, Some("x-web")));
        let index = index_of(&units);
        let mut resolver = DepthResolver::new(&units, &index);
        for unit in &units {
            let depth = resolver.depth_of(&unit.id).unwrap();
            match unit.kind {
                UnitKind::Founder => assert_eq!(depth, 0),
                UnitKind::Executive => assert_eq!(depth, 1),
                UnitKind::Department => assert_eq!(depth, 2),
                UnitKind::Team => {
                    let parent = unit.parent_id.as_deref().unwrap();
                    assert_eq!(depth, resolver.depth_of(parent).unwrap() + 1);
                }
            }
        }
        assert_eq!(resolver.depth_of("x-web-ui").unwrap(), 4);
    }

    #[test]
    fn unknown_unit_is_an_error() {
        let units = sample_units();
        let index = index_of(&units);
        let mut resolver = DepthResolver::new(&units, &index);
        assert!(matches!(
            resolver.depth_of("nobody"),
            Err(OrgError::UnknownUnit(id)) if id == "nobody"
        ));
    }

    #[test]
    fn detects_team_cycles() {
        let mut units = sample_units();
        units.push(OrgUnit::new("a", "A", UnitKind::Team, Some("b")));
        units.push(OrgUnit::new("b", "B", UnitKind::Team, Some("a")));
        let index = index_of(&units);
        let err = resolve_all(&units, &index).unwrap_err();
        assert!(matches!(err, OrgError::ParentCycle { .. }));
        assert!(err.is_configuration());
    }

    #[test]
    fn detects_cycles_through_departments() {
        let mut units = sample_units();
        units.push(OrgUnit::new("d", "Loop", UnitKind::Department, Some("t")));
        units.push(OrgUnit::new("t", "Back", UnitKind::Team, Some("d")));
        let index = index_of(&units);
        // Depths alone never see it: the department stops the walk.
        assert!(resolve_all(&units, &index).is_ok());
        let err = reject_parent_cycles(&units, &index).unwrap_err();
        assert!(matches!(err, OrgError::ParentCycle { .. }));

        let mut units = sample_units();
        units.push(OrgUnit::new("own", "Self", UnitKind::Department, Some("own")));
        let index = index_of(&units);
        assert!(matches!(
            reject_parent_cycles(&units, &index),
            Err(OrgError::ParentCycle { unit }) if unit == "own"
        ));
    }

    #[test]
    fn acyclic_chains_pass() {
        let mut units = sample_units();
        units.push(OrgUnit::new("x-web-ui", "UI", UnitKind::Team, Some("x-web")));
        units.push(OrgUnit::new("z", "Nested", UnitKind::Department, Some("y")));
        let index = index_of(&units);
        assert!(reject_parent_cycles(&units, &index).is_ok());
    }
}
