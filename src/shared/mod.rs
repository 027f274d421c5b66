pub mod logging;
pub mod state_paths;

pub use logging::RuntimeLog;
pub use state_paths::StatePaths;
