pub mod api;
pub mod config;
pub mod directory;
pub mod dump;
pub mod engine;
pub mod error;
pub mod model;
pub mod mutator;
pub mod progress;
pub mod protection;
pub mod reconcile;
pub mod report;

pub use crate::config::AppConfig;
pub use engine::{CleanupEngine, RunOptions};
pub use error::Error;
pub use progress::{RunReporter, SilentReporter};
pub use report::{RunReport, RunSummary};
