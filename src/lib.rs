// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod notify;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod scheduler;
pub mod snapshot;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use config::{EmailSettings, Layout, SelectorSet, SiteProfile, WatchConfig};
pub use pipeline::{PersistPolicy, Pipeline, RunOutcome};
pub use results::VehicleRecord;
