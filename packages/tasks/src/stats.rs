// ABOUTME: Dashboard aggregation over the active task set
// ABOUTME: Pure computation; identical input snapshots yield identical stats

use serde::{Deserialize, Serialize};

use huddle_core::{Task, TaskPriority, TaskStage, UserSummary};

/// Per-stage task counts. Stages with no tasks report zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub todo: usize,
    #[serde(rename = "in progress")]
    pub in_progress: usize,
    pub completed: usize,
}

/// One point of the priority-breakdown series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub name: String,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_tasks: usize,
    pub tasks: StageCounts,
    pub graph_data: Vec<GraphPoint>,
    #[serde(rename = "last10Task")]
    pub last_ten_tasks: Vec<Task>,
    pub users: Vec<UserSummary>,
}

/// Aggregate dashboard statistics from a snapshot of the active (non-trashed)
/// task set and the active roster. `tasks` must already be ordered most
/// recently created first; the ten newest are echoed back verbatim.
pub fn compute_stats(tasks: &[Task], users: Vec<UserSummary>) -> DashboardStats {
    let mut counts = StageCounts::default();
    for task in tasks {
        match task.stage {
            TaskStage::Todo => counts.todo += 1,
            TaskStage::InProgress => counts.in_progress += 1,
            TaskStage::Completed => counts.completed += 1,
        }
    }

    // Fixed priority order keeps the series stable across snapshots
    let graph_data = [
        TaskPriority::High,
        TaskPriority::Medium,
        TaskPriority::Normal,
        TaskPriority::Low,
    ]
    .iter()
    .map(|priority| GraphPoint {
        name: priority_label(*priority).to_string(),
        total: tasks.iter().filter(|t| t.priority == *priority).count(),
    })
    .collect();

    DashboardStats {
        total_tasks: tasks.len(),
        tasks: counts,
        graph_data,
        last_ten_tasks: tasks.iter().take(10).cloned().collect(),
        users,
    }
}

fn priority_label(priority: TaskPriority) -> &'static str {
    match priority {
        TaskPriority::High => "high",
        TaskPriority::Medium => "medium",
        TaskPriority::Normal => "normal",
        TaskPriority::Low => "low",
    }
}
