use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Member, OrgChart, OrgUnit};

/// Result of matching a query against the chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchMatches {
    pub query: String,
    /// Departments that should be open to reveal the matches.
    pub departments: BTreeSet<String>,
    /// Units whose name or members matched, for highlighting.
    pub units: BTreeSet<String>,
}

impl SearchMatches {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn contains(&self, unit_id: &str) -> bool {
        self.units.contains(unit_id)
    }
}

/// Trimmed, lower-cased query; `None` when nothing is left to match.
pub fn normalize_query(query: &str) -> Option<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

pub fn search(chart: &OrgChart, query: &str) -> SearchMatches {
    let mut matches = SearchMatches {
        query: query.trim().to_string(),
        ..Default::default()
    };
    let Some(needle) = normalize_query(query) else {
        return matches;
    };

    for unit in chart.units() {
        if !unit_matches(unit, &needle) {
            continue;
        }
        matches.units.insert(unit.id.clone());
        if let Some(department) = chart.owning_department(&unit.id) {
            matches.departments.insert(department.id.clone());
        }
    }
    matches
}

fn unit_matches(unit: &OrgUnit, needle: &str) -> bool {
    contains_ci(&unit.name, needle) || unit.members.iter().any(|member| member_matches(member, needle))
}

pub fn member_matches(member: &Member, needle: &str) -> bool {
    contains_ci(&member.name, needle)
        || member
            .role
            .as_deref()
            .is_some_and(|role| contains_ci(role, needle))
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample_chart;

    #[test]
    fn team_member_expands_its_department() {
        let chart = sample_chart();
        let matches = search(&chart, "amy");
        assert_eq!(matches.departments.iter().collect::<Vec<_>>(), vec!["x"]);
        assert!(matches.contains("x-web"));
        assert!(!matches.contains("x"));
    }

    #[test]
    fn matches_roles_and_department_members() {
        let chart = sample_chart();
        let matches = search(&chart, "HEAD OF");
        assert_eq!(matches.departments.iter().collect::<Vec<_>>(), vec!["x"]);
        assert!(matches.contains("x"));

        let matches = search(&chart, "outreach");
        assert_eq!(matches.departments.iter().collect::<Vec<_>>(), vec!["y"]);
    }

    #[test]
    fn founders_match_without_expanding() {
        let chart = sample_chart();
        let matches = search(&chart, "grace");
        assert!(matches.contains("f2"));
        assert!(matches.departments.is_empty());
    }

    #[test]
    fn blank_query_matches_nothing() {
        let chart = sample_chart();
        assert!(search(&chart, "   ").is_empty());
        assert!(search(&chart, "").departments.is_empty());
        assert_eq!(normalize_query("  Mix "), Some("mix".to_string()));
    }
}
