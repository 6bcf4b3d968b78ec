//! Interaction controller: owns the filter selections and rebuilds the
//! affected view when a selection changes.
//!
//! The widget-facing "All" sentinel is translated into the core tagged
//! unions here and nowhere else. Trigger rules: a state-dropdown event
//! rebuilds only the map; a crime-type-checklist event rebuilds only the
//! bars; the trend view is built once at construction and never again.

pub mod normalize;

pub use normalize::*;

use std::sync::Arc;

use boundary::BoundaryGeometry;
use charts::{BarSpec, MapSpec, TrendSpec, build_bars, build_map, build_trend};
use grid::{CompletedGrid, StateFilter, TypeSelection};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub selected_state: StateFilter,
    pub selected_types: TypeSelection,
}

pub struct Controller {
    grid: Arc<CompletedGrid>,
    boundaries: Arc<BoundaryGeometry>,
    filter: FilterState,
    map: MapSpec,
    bars: BarSpec,
    trend: TrendSpec,
}

impl Controller {
    pub fn new(grid: Arc<CompletedGrid>, boundaries: Arc<BoundaryGeometry>) -> Self {
        let filter = FilterState::default();
        let map = build_map(&grid, &boundaries, &filter.selected_state);
        let bars = build_bars(&grid, &filter.selected_types);
        let trend = build_trend(&grid);
        Self {
            grid,
            boundaries,
            filter,
            map,
            bars,
            trend,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn map(&self) -> &MapSpec {
        &self.map
    }

    pub fn bars(&self) -> &BarSpec {
        &self.bars
    }

    pub fn trend(&self) -> &TrendSpec {
        &self.trend
    }

    /// State-dropdown event. Rebuilds the map only.
    pub fn select_state(&mut self, raw: &str) -> &MapSpec {
        self.filter.selected_state = StateFilter::from_widget_value(raw);
        self.map = build_map(&self.grid, &self.boundaries, &self.filter.selected_state);
        &self.map
    }

    /// Crime-type-checklist event. Normalizes the raw selection, rebuilds
    /// the bars only, and returns the widget values the checklist should
    /// be rewritten with.
    pub fn select_types(&mut self, raw: &[String]) -> (&BarSpec, Vec<String>) {
        self.filter.selected_types = normalize_types(raw);
        let echo = as_widget_values(&self.filter.selected_types);
        self.bars = build_bars(&self.grid, &self.filter.selected_types);
        (&self.bars, echo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::IncidentRecord;
    use pretty_assertions::assert_eq;

    fn rec(state: &str, category: &str, crime_type: &str, year: u16, n: u64) -> IncidentRecord {
        IncidentRecord {
            state: state.to_string(),
            crime_category: category.to_string(),
            crime_type: crime_type.to_string(),
            year,
            reported_crimes: n,
        }
    }

    fn controller() -> Controller {
        let grid = Arc::new(CompletedGrid::complete(vec![
            rec("Selangor", "Property", "Theft", 2020, 5),
            rec("Selangor", "Assault", "Robbery", 2021, 2),
            rec("Johor", "Property", "Theft", 2020, 1),
        ]));
        let boundaries = Arc::new(BoundaryGeometry::default());
        Controller::new(grid, boundaries)
    }

    #[test]
    fn defaults_are_all_and_all_types() {
        let c = controller();
        assert_eq!(c.filter().selected_state, StateFilter::All);
        assert_eq!(c.filter().selected_types, TypeSelection::AllTypes);
        assert_eq!(c.map().data[0].locations, ["Selangor", "Johor"]);
        assert_eq!(c.bars().data.len(), 2);
    }

    #[test]
    fn state_event_rebuilds_map_only() {
        let mut c = controller();
        let bars_before = serde_json::to_string(c.bars()).unwrap();
        let trend_before = serde_json::to_string(c.trend()).unwrap();

        c.select_state("Johor");

        assert_eq!(c.map().data[0].locations, ["Johor"]);
        assert_eq!(serde_json::to_string(c.bars()).unwrap(), bars_before);
        assert_eq!(serde_json::to_string(c.trend()).unwrap(), trend_before);
    }

    #[test]
    fn types_event_rebuilds_bars_only() {
        let mut c = controller();
        let map_before = serde_json::to_string(c.map()).unwrap();
        let trend_before = serde_json::to_string(c.trend()).unwrap();

        let (bars, echo) = c.select_types(&["Theft".to_string()]);
        assert_eq!(bars.data.len(), 1);
        assert_eq!(bars.data[0].name, "Theft");
        assert_eq!(echo, ["Theft"]);

        assert_eq!(serde_json::to_string(c.map()).unwrap(), map_before);
        assert_eq!(serde_json::to_string(c.trend()).unwrap(), trend_before);
    }

    #[test]
    fn selecting_all_state_restores_every_location() {
        let mut c = controller();
        c.select_state("Johor");
        c.select_state("All");
        assert_eq!(c.map().data[0].locations, ["Selangor", "Johor"]);
    }

    #[test]
    fn empty_type_selection_resets_to_all() {
        let mut c = controller();
        c.select_types(&["Theft".to_string()]);
        let (bars, echo) = c.select_types(&[]);
        assert_eq!(echo, ["All"]);
        assert_eq!(bars.data.len(), 2);
    }
}
