pub mod task;
pub mod groups;
pub mod snapshot;
pub mod config;

pub use task::*;
pub use groups::*;
pub use snapshot::*;
pub use config::*;
