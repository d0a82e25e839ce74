mod error;
mod raw;
mod reader;

pub use error::LogError;
pub use raw::{LogHeader, RawAgent, RawAgentName, RawCombatItem, RawLog, RawSkill};
pub use reader::LogReader;
