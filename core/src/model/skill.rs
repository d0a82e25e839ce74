//! Typed skills and the skill lookup table.

use std::sync::Arc;

use hashbrown::HashMap;
use tracing::trace;

use crate::evtc::RawSkill;

pub type SkillRef = Arc<Skill>;

/// A skill or buff definition. Immutable and shared by reference from
/// every event that mentions it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skill {
    pub id: u32,
    pub name: String,
}

impl Skill {
    /// Sentinel for skill ids missing from the log's skill table.
    pub fn unknown(id: u32) -> Skill {
        Skill {
            id,
            name: String::from("Unknown"),
        }
    }
}

#[derive(Debug)]
pub struct SkillTable {
    skills: Vec<SkillRef>,
    by_id: HashMap<u32, SkillRef>,
}

impl SkillTable {
    pub(crate) fn new(raw: &[RawSkill]) -> Self {
        let mut skills = Vec::with_capacity(raw.len());
        let mut by_id = HashMap::with_capacity(raw.len());
        for raw_skill in raw {
            let skill = Arc::new(Skill {
                id: raw_skill.id as u32,
                name: raw_skill.name.clone(),
            });
            // Recorders occasionally list a skill twice; first entry wins.
            by_id
                .entry(skill.id)
                .or_insert_with(|| Arc::clone(&skill));
            skills.push(skill);
        }
        Self { skills, by_id }
    }

    pub fn skills(&self) -> &[SkillRef] {
        &self.skills
    }

    pub fn get(&self, id: u32) -> Option<SkillRef> {
        self.by_id.get(&id).cloned()
    }

    /// Resolve a skill id, degrading to a sentinel for ids the log's
    /// table does not list.
    pub fn resolve(&self, id: u32) -> SkillRef {
        self.by_id.get(&id).cloned().unwrap_or_else(|| {
            trace!(id, "reference to unlisted skill id");
            Arc::new(Skill::unknown(id))
        })
    }
}
