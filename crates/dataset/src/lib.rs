pub mod record;
pub mod table;

pub use record::*;
pub use table::*;
