//! Grouped bar breakdown: total reported crimes by state and crime type.
//!
//! The breakdown joins back to the source records — crime type is a finer
//! key than the completed grid keeps — and emits one bar series per
//! selected type, states on the x axis in domain order.

use grid::{CompletedGrid, TypeSelection};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSpec {
    pub data: Vec<BarTrace>,
    pub layout: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    /// Crime type this series plots.
    pub name: String,
    pub x: Vec<String>,
    pub y: Vec<u64>,
}

pub fn build_bars(grid: &CompletedGrid, selection: &TypeSelection) -> BarSpec {
    let data = grid
        .totals_by_state_and_type(selection)
        .into_iter()
        .map(|(crime_type, per_state)| {
            let mut x = Vec::with_capacity(per_state.len());
            let mut y = Vec::with_capacity(per_state.len());
            for (state, total) in per_state {
                x.push(state);
                y.push(total);
            }
            BarTrace {
                trace_type: "bar",
                name: crime_type,
                x,
                y,
            }
        })
        .collect();

    BarSpec {
        data,
        layout: json!({
            "barmode": "group",
            "title": {
                "text": "Total Reported Crimes by State and Crime Type",
                "x": 0.5,
            },
            "plot_bgcolor": "rgba(0,0,0,0)",
            "paper_bgcolor": "rgba(0,0,0,0)",
        }),
    }
}
