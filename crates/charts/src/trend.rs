//! Animated trend view: one frame per year, one scatter panel per crime
//! category, one point per (state, category) sized by reported crimes.
//!
//! The state axis uses the grid's first-seen state order in every frame,
//! so the axis never reorders mid-animation. This view takes no filter
//! and is built exactly once.

use grid::CompletedGrid;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Marker diameter cap in pixels.
const SIZE_MAX_PX: f64 = 45.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSpec {
    pub data: Vec<ScatterTrace>,
    pub layout: Value,
    pub frames: Vec<TrendFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendFrame {
    pub name: String,
    pub data: Vec<ScatterTrace>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    /// Crime category this panel plots.
    pub name: String,
    pub x: Vec<u64>,
    pub y: Vec<String>,
    pub mode: &'static str,
    pub marker: Marker,
    pub xaxis: String,
    pub yaxis: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: Vec<u64>,
    pub sizemode: &'static str,
    pub sizeref: f64,
}

pub fn build_trend(grid: &CompletedGrid) -> TrendSpec {
    // One shared sizeref keeps marker areas comparable across frames and
    // panels, with the largest cell capped at SIZE_MAX_PX.
    let max_cell = grid.max_cell().max(1);
    let sizeref = 2.0 * max_cell as f64 / (SIZE_MAX_PX * SIZE_MAX_PX);

    let frames: Vec<TrendFrame> = grid
        .years()
        .iter()
        .map(|&year| TrendFrame {
            name: year.to_string(),
            data: frame_traces(grid, year, sizeref),
        })
        .collect();

    let data = frames.first().map(|f| f.data.clone()).unwrap_or_default();

    TrendSpec {
        data,
        layout: trend_layout(grid),
        frames,
    }
}

fn frame_traces(grid: &CompletedGrid, year: u16, sizeref: f64) -> Vec<ScatterTrace> {
    grid.categories()
        .iter()
        .enumerate()
        .map(|(panel, category)| {
            let mut x = Vec::with_capacity(grid.states().len());
            let mut y = Vec::with_capacity(grid.states().len());
            for state in grid.states() {
                let value = grid
                    .rows()
                    .iter()
                    .find(|r| {
                        r.state == *state && r.crime_category == *category && r.year == year
                    })
                    .map(|r| r.reported_crimes)
                    .unwrap_or(0);
                x.push(value);
                y.push(state.clone());
            }

            ScatterTrace {
                trace_type: "scatter",
                name: category.clone(),
                marker: Marker {
                    size: x.clone(),
                    sizemode: "area",
                    sizeref,
                },
                x,
                y,
                mode: "markers",
                xaxis: format!("x{}", axis_suffix(panel)),
                yaxis: format!("y{}", axis_suffix(panel)),
            }
        })
        .collect()
}

fn trend_layout(grid: &CompletedGrid) -> Value {
    let panels = grid.categories().len().max(1);
    let states: Vec<Value> = grid
        .states()
        .iter()
        .map(|s| Value::String(s.clone()))
        .collect();

    let mut layout = Map::new();
    layout.insert(
        "grid".to_string(),
        json!({"rows": 1, "columns": panels, "pattern": "independent"}),
    );
    layout.insert("paper_bgcolor".to_string(), json!("white"));
    layout.insert("plot_bgcolor".to_string(), json!("white"));
    layout.insert(
        "margin".to_string(),
        json!({"l": 150, "r": 20, "t": 50, "b": 50}),
    );

    for panel in 0..panels {
        let suffix = axis_suffix(panel);
        layout.insert(
            format!("xaxis{suffix}"),
            json!({
                "showgrid": true,
                "gridwidth": 1,
                "gridcolor": "lightgray",
                "zeroline": true,
                "zerolinewidth": 1,
                "zerolinecolor": "lightgray",
            }),
        );
        layout.insert(
            format!("yaxis{suffix}"),
            json!({
                "showgrid": true,
                "gridwidth": 1,
                "gridcolor": "lightgray",
                "tickmode": "array",
                "categoryorder": "array",
                "categoryarray": states.clone(),
                "autorange": "reversed",
                // State labels only on the leftmost panel.
                "showticklabels": panel == 0,
            }),
        );
    }

    layout.insert(
        "updatemenus".to_string(),
        json!([{
            "type": "buttons",
            "showactive": false,
            "x": 0.05, "y": -0.15,
            "buttons": [{
                "label": "Play",
                "method": "animate",
                "args": [null, {
                    "frame": {"duration": 700, "redraw": true},
                    "transition": {"duration": 250},
                    "fromcurrent": true,
                }],
            }],
        }]),
    );

    let steps: Vec<Value> = grid
        .years()
        .iter()
        .map(|year| {
            json!({
                "label": year.to_string(),
                "method": "animate",
                "args": [[year.to_string()], {
                    "frame": {"duration": 0, "redraw": true},
                    "mode": "immediate",
                }],
            })
        })
        .collect();
    layout.insert(
        "sliders".to_string(),
        json!([{
            "active": 0,
            "x": 0.15, "len": 0.8,
            "currentvalue": {"prefix": "Year: "},
            "steps": steps,
        }]),
    );

    Value::Object(layout)
}

fn axis_suffix(panel: usize) -> String {
    if panel == 0 {
        String::new()
    } else {
        (panel + 1).to_string()
    }
}
