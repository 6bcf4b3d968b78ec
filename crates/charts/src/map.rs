//! Choropleth map of total reported crimes per state.
//!
//! The color scale is anchored to the min/max of per-state totals across
//! ALL states, regardless of the active filter, so colors stay comparable
//! as the filter changes.

use boundary::BoundaryGeometry;
use grid::{CompletedGrid, StateFilter, min_max};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSpec {
    pub data: Vec<ChoroplethTrace>,
    pub layout: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub geojson: Value,
    pub locations: Vec<String>,
    pub z: Vec<u64>,
    pub featureidkey: &'static str,
    pub zmin: u64,
    pub zmax: u64,
}

/// States present in one source but not the other. Rendered as absent on
/// the map, never an error; callers may log it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinMismatch {
    /// In the dataset, no boundary feature.
    pub without_geometry: Vec<String>,
    /// In the boundary file, no dataset rows.
    pub without_counts: Vec<String>,
}

impl JoinMismatch {
    pub fn is_empty(&self) -> bool {
        self.without_geometry.is_empty() && self.without_counts.is_empty()
    }
}

pub fn build_map(
    grid: &CompletedGrid,
    boundaries: &BoundaryGeometry,
    selected: &StateFilter,
) -> MapSpec {
    let totals = grid.totals_by_state();

    // Global color bounds, computed before any filtering.
    let all_values: Vec<u64> = totals.iter().map(|(_, v)| *v).collect();
    let (zmin, zmax) = min_max(&all_values).unwrap_or((0, 0));

    let mut locations = Vec::new();
    let mut z = Vec::new();
    for (state, total) in &totals {
        if selected.matches(state) {
            locations.push(state.clone());
            z.push(*total);
        }
    }

    // Only ship geometry for the states being rendered. A rendered state
    // with no matching feature stays in `locations` and simply draws
    // nothing, matching the join-mismatch contract.
    let geojson = boundaries.to_geojson_value(|name| locations.iter().any(|s| s == name));

    MapSpec {
        data: vec![ChoroplethTrace {
            trace_type: "choropleth",
            geojson,
            locations,
            z,
            featureidkey: "properties.name",
            zmin,
            zmax,
        }],
        layout: json!({
            "geo": {"fitbounds": "locations", "visible": false},
            "paper_bgcolor": "white",
            "plot_bgcolor": "white",
            "margin": {"l": 0, "r": 0, "t": 30, "b": 0},
        }),
    }
}

pub fn join_mismatches(grid: &CompletedGrid, boundaries: &BoundaryGeometry) -> JoinMismatch {
    let mut mismatch = JoinMismatch::default();
    for state in grid.states() {
        if !boundaries.contains(state) {
            mismatch.without_geometry.push(state.clone());
        }
    }
    for name in boundaries.state_names() {
        if !grid.states().iter().any(|s| s == name) {
            mismatch.without_counts.push(name.to_string());
        }
    }
    mismatch
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

    fn sample_grid() -> CompletedGrid {
        CompletedGrid::complete(vec![
            rec("Selangor", "Property", "Theft", 2020, 50),
            rec("Johor", "Property", "Theft", 2020, 10),
            rec("Perak", "Property", "Theft", 2020, 30),
        ])
    }

    fn sample_boundaries() -> BoundaryGeometry {
        BoundaryGeometry::from_geojson_str(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {"name": "Selangor"},
                        "geometry": {"type": "Polygon",
                            "coordinates": [[[101.0, 3.0], [101.5, 3.0], [101.0, 3.5], [101.0, 3.0]]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"name": "Johor"},
                        "geometry": {"type": "Polygon",
                            "coordinates": [[[103.0, 1.5], [104.0, 1.5], [103.0, 2.5], [103.0, 1.5]]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"name": "Kedah"},
                        "geometry": {"type": "Polygon",
                            "coordinates": [[[100.0, 5.5], [101.0, 5.5], [100.0, 6.5], [100.0, 5.5]]]}
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn color_bounds_are_invariant_under_state_filter() {
        let grid = sample_grid();
        let boundaries = sample_boundaries();

        let all = build_map(&grid, &boundaries, &StateFilter::All);
        let one = build_map(
            &grid,
            &boundaries,
            &StateFilter::Only("Johor".to_string()),
        );

        assert_eq!(all.data[0].zmin, 10);
        assert_eq!(all.data[0].zmax, 50);
        assert_eq!(one.data[0].zmin, all.data[0].zmin);
        assert_eq!(one.data[0].zmax, all.data[0].zmax);
    }

    #[test]
    fn filter_restricts_locations_but_not_range() {
        let grid = sample_grid();
        let boundaries = sample_boundaries();
        let spec = build_map(
            &grid,
            &boundaries,
            &StateFilter::Only("Johor".to_string()),
        );

        assert_eq!(spec.data[0].locations, ["Johor"]);
        assert_eq!(spec.data[0].z, [10]);
        let features = spec.data[0].geojson["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["name"], "Johor");
    }

    #[test]
    fn state_without_geometry_is_kept_in_trace() {
        // Perak has counts but no boundary feature.
        let grid = sample_grid();
        let boundaries = sample_boundaries();
        let spec = build_map(&grid, &boundaries, &StateFilter::All);

        assert!(spec.data[0].locations.iter().any(|s| s == "Perak"));
        let features = spec.data[0].geojson["features"].as_array().unwrap();
        assert!(
            features
                .iter()
                .all(|f| f["properties"]["name"] != "Perak")
        );
    }

    #[test]
    fn mismatches_are_reported_both_ways() {
        let mismatch = join_mismatches(&sample_grid(), &sample_boundaries());
        assert_eq!(mismatch.without_geometry, ["Perak"]);
        assert_eq!(mismatch.without_counts, ["Kedah"]);
    }

    #[test]
    fn map_build_is_deterministic() {
        let grid = sample_grid();
        let boundaries = sample_boundaries();
        let a = serde_json::to_string(&build_map(&grid, &boundaries, &StateFilter::All)).unwrap();
        let b = serde_json::to_string(&build_map(&grid, &boundaries, &StateFilter::All)).unwrap();
        assert_eq!(a, b);
    }
}
