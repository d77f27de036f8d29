use crate::models::{Priority, Status, Task};
use chrono::NaiveDate;

/// Dashboard figures derived from the current task list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub todo: usize,
    pub doing: usize,
    pub await_feedback: usize,
    pub done: usize,
    pub urgent: usize,
    pub total: usize,
    /// Earliest due date among urgent tasks.
    pub next_urgent: Option<NaiveDate>,
}

impl Summary {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let count = |status: Status| tasks.iter().filter(|t| t.status == status).count();
        let urgent = || tasks.iter().filter(|t| t.priority == Priority::High);
        Summary {
            todo: count(Status::Todo),
            doing: count(Status::Doing),
            await_feedback: count(Status::AwaitFeedback),
            done: count(Status::Done),
            urgent: urgent().count(),
            total: tasks.len(),
            next_urgent: urgent().filter_map(|t| t.due_date).min(),
        }
    }
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}
