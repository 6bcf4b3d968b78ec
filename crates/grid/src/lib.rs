pub mod completed;
pub mod filter;

pub use completed::*;
pub use filter::*;
