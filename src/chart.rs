use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::Config;
use crate::error::{OrgError, Result};
use crate::graph::{GraphContext, OrgGraph, build_graph};
use crate::layout::{LayoutResult, compute_layout};
use crate::model::{OrgChart, OrgUnit};
use crate::refit::RefitScheduler;
use crate::search::SearchMatches;
use crate::state::{ExpansionController, Viewport};
use crate::storage::KeyValueStore;
use crate::visibility::{Tab, visible_units};

/// The chart as the UI sees it: static units plus live expansion, tab and
/// search state. Every structural change schedules a viewport re-fit, and
/// [`OrgChartView::layout`] always recomputes from scratch.
pub struct OrgChartView<S> {
    chart: OrgChart,
    config: Config,
    controller: ExpansionController<S>,
    matches: SearchMatches,
    refit: RefitScheduler,
}

impl<S: KeyValueStore> OrgChartView<S> {
    pub fn new(chart: OrgChart, store: S, config: Config) -> Self {
        let controller = ExpansionController::new(&chart, store, config.storage.clone());
        let refit = RefitScheduler::new(Duration::from_millis(config.refit_delay_ms));
        Self {
            chart,
            config,
            controller,
            matches: SearchMatches::default(),
            refit,
        }
    }

    pub fn chart(&self) -> &OrgChart {
        &self.chart
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn controller(&self) -> &ExpansionController<S> {
        &self.controller
    }

    pub fn search_matches(&self) -> &SearchMatches {
        &self.matches
    }

    pub fn active_tab(&self) -> &Tab {
        self.controller.active_tab()
    }

    pub fn visible_units(&self) -> Vec<&OrgUnit> {
        visible_units(&self.chart, self.controller.active_tab(), self.controller.expanded())
    }

    pub fn graph(&self) -> Result<OrgGraph> {
        let visible = self.visible_units();
        let query = self.controller.query();
        build_graph(
            &self.chart,
            &visible,
            GraphContext {
                tab: self.controller.active_tab(),
                expanded: self.controller.expanded(),
                query: Some(query),
            },
        )
    }

    pub fn layout(&self) -> Result<LayoutResult> {
        let graph = self.graph()?;
        Ok(compute_layout(&graph, &self.config.layout))
    }

    pub fn toggle_department(&mut self, id: &str) -> Result<()> {
        self.controller.toggle_department(id)?;
        self.structure_changed();
        Ok(())
    }

    pub fn expand_all(&mut self) {
        self.controller.expand_all();
        self.structure_changed();
    }

    pub fn collapse_all(&mut self) {
        self.controller.collapse_all();
        self.structure_changed();
    }

    pub fn toggle_all(&mut self) {
        self.controller.toggle_all();
        self.structure_changed();
    }

    pub fn search(&mut self, query: &str) -> &SearchMatches {
        self.matches = self.controller.on_search(&self.chart, query);
        debug!(
            query = %self.matches.query,
            units = self.matches.units.len(),
            departments = self.matches.departments.len(),
            "search applied"
        );
        self.structure_changed();
        &self.matches
    }

    /// Switches tab; a department tab must name a department.
    pub fn set_tab(&mut self, tab: Tab) -> Result<()> {
        if let Tab::Department(id) = &tab {
            if !self.chart.is_department(id) {
                return Err(OrgError::NotADepartment(id.clone()));
            }
        }
        self.controller.on_tab_change(tab);
        self.matches = SearchMatches::default();
        self.structure_changed();
        Ok(())
    }

    pub fn save_viewport(&mut self, viewport: Viewport) {
        self.controller.save_viewport(viewport);
    }

    pub fn restore_viewport(&self) -> Option<Viewport> {
        self.controller.restore_viewport()
    }

    pub fn all_sections_expanded(&self) -> bool {
        self.controller.all_sections_expanded()
    }

    pub fn set_all_sections_expanded(&mut self, expanded: bool) {
        self.controller.set_all_sections_expanded(expanded);
    }

    pub fn refit_pending(&self) -> bool {
        self.refit.is_pending()
    }

    /// True once the re-fit delay after the latest change has passed.
    pub fn poll_refit(&mut self, now: Instant) -> bool {
        self.refit.poll(now)
    }

    fn structure_changed(&mut self) {
        self.refit.schedule(Instant::now());
    }
}
