mod simulator;

pub use simulator::{BuffSimulator, StackRemovalOrder};
pub(crate) use simulator::covered_time;


use crate::model::{AgentRef, SkillRef};

/// One concurrently-active instance of a stacking buff: a closed
/// `[time_start, time_end)` interval over one skill, credited to the
/// agent that applied it.
///
/// Multiple stacks for the same (target, skill) may overlap in time;
/// that overlap *is* the stack count.
#[derive(Debug, Clone)]
pub struct BuffStack {
    pub time_start: u64,
    pub time_end: u64,
    pub buff: SkillRef,
    /// `None` when the recorder did not attribute the application.
    pub source: Option<AgentRef>,
}

impl BuffStack {
    pub fn duration(&self) -> u64 {
        self.time_end.saturating_sub(self.time_start)
    }

    pub fn contains(&self, time: u64) -> bool {
        (self.time_start..self.time_end).contains(&time)
    }
}
