mod execution_time;
mod progress;

pub use execution_time::{ExecutionTime, ExecutionTimeReporter};
pub use progress::ProgressReporter;
