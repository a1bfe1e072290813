// ABOUTME: Task lifecycle and dashboard aggregation for huddle
// ABOUTME: The manager validates and orchestrates; stats is pure computation

pub mod error;
pub mod manager;
pub mod stats;

pub use error::{TaskError, TaskResult};
pub use manager::TaskManager;
pub use stats::{compute_stats, DashboardStats, GraphPoint, StageCounts};
