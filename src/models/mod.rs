pub mod config;
pub mod environment;
pub mod job;

pub use config::*;
pub use environment::*;
pub use job::*;
