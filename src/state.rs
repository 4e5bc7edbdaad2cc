//! Expansion, search and viewport state shared with the UI.
//!
//! The in-memory state is authoritative. Every mutation is written through to
//! the [`KeyValueStore`] right away, and a failing store only costs
//! persistence: errors are logged and dropped.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::StorageKeys;
use crate::error::{OrgError, Result};
use crate::model::OrgChart;
use crate::search::{SearchMatches, normalize_query, search};
use crate::storage::KeyValueStore;
use crate::visibility::Tab;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

pub struct ExpansionController<S> {
    store: S,
    keys: StorageKeys,
    /// Every department id, in chart order.
    departments: Vec<String>,
    expanded: BTreeSet<String>,
    query: String,
    tab: Tab,
}

impl<S: KeyValueStore> ExpansionController<S> {
    /// Restores the persisted expansion set, or expands everything on first
    /// run. Ids that no longer name a department are dropped.
    pub fn new(chart: &OrgChart, store: S, keys: StorageKeys) -> Self {
        let departments: Vec<String> = chart.departments().map(|unit| unit.id.clone()).collect();
        let expanded = match load_expanded(&store, &keys.expanded_departments) {
            Some(ids) => ids
                .into_iter()
                .filter(|id| departments.contains(id))
                .collect(),
            None => departments.iter().cloned().collect(),
        };
        debug!(expanded = ?expanded, "expansion state restored");
        Self {
            store,
            keys,
            departments,
            expanded,
            query: String::new(),
            tab: Tab::All,
        }
    }

    pub fn expanded(&self) -> &BTreeSet<String> {
        &self.expanded
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    pub fn is_all_expanded(&self) -> bool {
        self.departments.iter().all(|id| self.expanded.contains(id))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn active_tab(&self) -> &Tab {
        &self.tab
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Accordion toggle: an open department closes, any other opens alone.
    pub fn toggle_department(&mut self, id: &str) -> Result<()> {
        if !self.departments.iter().any(|dept| dept == id) {
            return Err(OrgError::NotADepartment(id.to_string()));
        }
        let next = if self.expanded.contains(id) {
            BTreeSet::new()
        } else {
            BTreeSet::from([id.to_string()])
        };
        self.replace_expanded(next);
        Ok(())
    }

    pub fn expand_all(&mut self) {
        let next = self.departments.iter().cloned().collect();
        self.replace_expanded(next);
    }

    pub fn collapse_all(&mut self) {
        self.replace_expanded(BTreeSet::new());
    }

    pub fn toggle_all(&mut self) {
        if self.is_all_expanded() {
            self.collapse_all();
        } else {
            self.expand_all();
        }
    }

    /// Records the query and, when it is not blank, opens exactly the
    /// departments holding a match. Clearing the query keeps the expansion.
    pub fn on_search(&mut self, chart: &OrgChart, query: &str) -> SearchMatches {
        self.query = query.to_string();
        let matches = search(chart, query);
        if normalize_query(query).is_some() {
            self.replace_expanded(matches.departments.clone());
        }
        matches
    }

    pub fn on_tab_change(&mut self, tab: Tab) {
        debug!(tab = %tab, "tab changed");
        self.tab = tab;
        self.query.clear();
    }

    pub fn save_viewport(&mut self, viewport: Viewport) {
        let key = self.keys.viewport.clone();
        self.write_json(&key, &viewport);
    }

    /// Last saved viewport; `None` means the surface should fit to view.
    pub fn restore_viewport(&self) -> Option<Viewport> {
        read_json(&self.store, &self.keys.viewport)
    }

    /// Flag for the flat listing view. Defaults to collapsed.
    pub fn all_sections_expanded(&self) -> bool {
        read_json(&self.store, &self.keys.all_sections_expanded).unwrap_or(false)
    }

    pub fn set_all_sections_expanded(&mut self, expanded: bool) {
        let key = self.keys.all_sections_expanded.clone();
        self.write_json(&key, &expanded);
    }

    fn replace_expanded(&mut self, next: BTreeSet<String>) {
        self.expanded = next;
        debug!(expanded = ?self.expanded, "expansion changed");
        let ordered: Vec<&String> = self
            .departments
            .iter()
            .filter(|id| self.expanded.contains(*id))
            .collect();
        let key = self.keys.expanded_departments.clone();
        match serde_json::to_string(&ordered) {
            Ok(value) => self.write_raw(&key, &value),
            Err(err) => warn!(%err, "failed to encode expansion state"),
        }
    }

    fn write_json<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(encoded) => self.write_raw(key, &encoded),
            Err(err) => warn!(key, %err, "failed to encode state"),
        }
    }

    fn write_raw(&mut self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!(key, %err, "failed to persist state, keeping it in memory");
        }
    }
}

fn load_expanded<S: KeyValueStore>(store: &S, key: &str) -> Option<Vec<String>> {
    read_json(store, key)
}

fn read_json<S: KeyValueStore, T: for<'de> Deserialize<'de>>(store: &S, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            warn!(key, %err, "failed to read persisted state");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, %err, "ignoring corrupt persisted state");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::sample_chart;
    use crate::model::{OrgUnit, UnitKind};
    use crate::storage::{MemoryStore, UnavailableStore};

    fn controller(store: MemoryStore) -> ExpansionController<MemoryStore> {
        ExpansionController::new(&sample_chart(), store, StorageKeys::default())
    }

    fn ids(set: &BTreeSet<String>) -> Vec<&str> {
        set.iter().map(String::as_str).collect()
    }

    fn persisted(ctrl: &ExpansionController<MemoryStore>) -> Option<String> {
        ctrl.store()
            .get(&StorageKeys::default().expanded_departments)
            .unwrap()
    }

    #[test]
    fn first_run_expands_everything() {
        let ctrl = controller(MemoryStore::new());
        assert_eq!(ids(ctrl.expanded()), vec!["x", "y"]);
        assert!(ctrl.is_all_expanded());
    }

    #[test]
    fn restores_and_reconciles_persisted_state() {
        let key = StorageKeys::default().expanded_departments;
        let store = MemoryStore::new().with_entry(&key, r#"["y", "gone"]"#);
        let ctrl = controller(store);
        assert_eq!(ids(ctrl.expanded()), vec!["y"]);

        let store = MemoryStore::new().with_entry(&key, "{broken");
        let ctrl = controller(store);
        assert_eq!(ids(ctrl.expanded()), vec!["x", "y"]);
    }

    #[test]
    fn toggle_is_exclusive() {
        let mut ctrl = controller(MemoryStore::new());
        ctrl.toggle_department("x").unwrap();
        assert!(ctrl.expanded().is_empty());
        ctrl.toggle_department("x").unwrap();
        assert_eq!(ids(ctrl.expanded()), vec!["x"]);
        ctrl.toggle_department("y").unwrap();
        assert_eq!(ids(ctrl.expanded()), vec!["y"]);
        ctrl.toggle_department("y").unwrap();
        assert!(ctrl.expanded().is_empty());
        assert_eq!(persisted(&ctrl).as_deref(), Some("[]"));
    }

    #[test]
    fn toggle_rejects_non_departments() {
        let mut ctrl = controller(MemoryStore::new());
        assert!(matches!(
            ctrl.toggle_department("x-web"),
            Err(OrgError::NotADepartment(_))
        ));
        assert_eq!(ids(ctrl.expanded()), vec!["x", "y"]);
    }

    #[test]
    fn toggle_all_flips_between_full_and_empty() {
        let mut ctrl = controller(MemoryStore::new());
        ctrl.toggle_all();
        assert!(ctrl.expanded().is_empty());
        ctrl.toggle_all();
        assert_eq!(ids(ctrl.expanded()), vec!["x", "y"]);
        assert_eq!(persisted(&ctrl).as_deref(), Some(r#"["x","y"]"#));
        ctrl.toggle_department("y").unwrap();
        ctrl.toggle_all();
        assert!(ctrl.is_all_expanded());
    }

    #[test]
    fn search_replaces_expansion_and_clearing_keeps_it() {
        let chart = sample_chart();
        let mut ctrl = controller(MemoryStore::new());
        let matches = ctrl.on_search(&chart, "Amy");
        assert!(matches.contains("x-web"));
        assert_eq!(ids(ctrl.expanded()), vec!["x"]);
        assert_eq!(ctrl.query(), "Amy");

        ctrl.on_search(&chart, "");
        assert_eq!(ids(ctrl.expanded()), vec!["x"]);
        assert_eq!(ctrl.query(), "");

        ctrl.on_search(&chart, "nobody by that name");
        assert!(ctrl.expanded().is_empty());
    }

    #[test]
    fn tab_change_clears_query_only() {
        let chart = sample_chart();
        let mut ctrl = controller(MemoryStore::new());
        ctrl.on_search(&chart, "amy");
        ctrl.on_tab_change(Tab::Department("y".to_string()));
        assert_eq!(ctrl.query(), "");
        assert_eq!(ctrl.active_tab(), &Tab::Department("y".to_string()));
        assert_eq!(ids(ctrl.expanded()), vec!["x"]);
    }

    #[test]
    fn unavailable_storage_degrades_to_memory() {
        let chart = sample_chart();
        let mut ctrl = ExpansionController::new(&chart, UnavailableStore, StorageKeys::default());
        assert_eq!(ids(ctrl.expanded()), vec!["x", "y"]);
        ctrl.toggle_department("y").unwrap();
        assert_eq!(ids(ctrl.expanded()), vec!["y"]);
        ctrl.save_viewport(Viewport {
            x: 1.0,
            y: 2.0,
            zoom: 0.5,
        });
        assert_eq!(ctrl.restore_viewport(), None);
        assert!(!ctrl.all_sections_expanded());
    }

    #[test]
    fn viewport_and_listing_flag_persist() {
        let mut ctrl = controller(MemoryStore::new());
        assert_eq!(ctrl.restore_viewport(), None);
        let viewport = Viewport {
            x: -120.0,
            y: 40.0,
            zoom: 0.75,
        };
        ctrl.save_viewport(viewport);
        assert_eq!(ctrl.restore_viewport(), Some(viewport));

        assert!(!ctrl.all_sections_expanded());
        ctrl.set_all_sections_expanded(true);
        assert!(ctrl.all_sections_expanded());
    }

    #[test]
    fn chart_without_departments_counts_as_expanded() {
        let chart = OrgChart::from_units(vec![OrgUnit::new(
            "exec",
            "Exec",
            UnitKind::Executive,
            None,
        )])
        .unwrap();
        let ctrl = ExpansionController::new(&chart, MemoryStore::new(), StorageKeys::default());
        assert!(ctrl.expanded().is_empty());
        assert!(ctrl.is_all_expanded());
    }
}
