mod agent;
mod builder;
mod event;
mod skill;

pub use agent::{Agent, AgentKind, AgentRef, AgentTable};
pub use builder::{BuiltModel, ModelBuilder};
pub use event::{BuffRemoval, Event, EventKind};
pub use skill::{Skill, SkillRef, SkillTable};
