//! View builders: pure functions from (completed grid, selection) to
//! Plotly figure specifications, serialized as `{data, layout[, frames]}`
//! JSON. Builders never mutate their inputs and are deterministic —
//! identical inputs serialize to byte-identical JSON.

pub mod bars;
pub mod map;
pub mod trend;

pub use bars::*;
pub use map::*;
pub use trend::*;
