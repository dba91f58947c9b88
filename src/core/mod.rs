pub mod augment;
pub mod config;
pub mod driver;
pub mod host;
pub mod source;
pub mod submitter;

pub use augment::*;
pub use config::*;
pub use driver::*;
pub use host::*;
pub use source::*;
pub use submitter::*;
