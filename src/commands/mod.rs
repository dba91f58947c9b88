pub mod list;
pub mod rerun;

pub use list::*;
pub use rerun::*;
