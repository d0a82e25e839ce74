//! Helpers for building synthetic EVTC byte images in tests.

use crate::evtc::RawCombatItem;

/// Statechange discriminants used by test fixtures.
pub mod state {
    pub const ENTER_COMBAT: u8 = 1;
    pub const EXIT_COMBAT: u8 = 2;
    pub const CHANGE_UP: u8 = 3;
    pub const CHANGE_DEAD: u8 = 4;
    pub const CHANGE_DOWN: u8 = 5;
    pub const SPAWN: u8 = 6;
    pub const DESPAWN: u8 = 7;
    pub const HEALTH_UPDATE: u8 = 8;
    pub const LOG_START: u8 = 9;
    pub const LOG_END: u8 = 10;
    pub const REWARD: u8 = 17;
}

/// Builds revision-1 EVTC payloads byte by byte.
pub struct LogWriter {
    pub boss_species_id: u16,
    agents: Vec<Vec<u8>>,
    skills: Vec<Vec<u8>>,
    events: Vec<Vec<u8>>,
}

impl LogWriter {
    pub fn new() -> Self {
        Self {
            boss_species_id: 0,
            agents: Vec::new(),
            skills: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn player(&mut self, address: u64, character: &str, account: &str, subgroup: &str) {
        let mut name = Vec::new();
        name.extend_from_slice(character.as_bytes());
        name.push(0);
        name.extend_from_slice(account.as_bytes());
        name.push(0);
        name.extend_from_slice(subgroup.as_bytes());
        name.push(0);
        self.agents.push(agent_record(address, 1, 0, &name));
    }

    pub fn npc(&mut self, address: u64, name: &str, species_id: u16) {
        let mut field = Vec::new();
        field.extend_from_slice(name.as_bytes());
        field.push(0);
        self.agents
            .push(agent_record(address, species_id as u32, u32::MAX, &field));
    }

    pub fn gadget(&mut self, address: u64, name: &str, pseudo_id: u16) {
        let mut field = Vec::new();
        field.extend_from_slice(name.as_bytes());
        field.push(0);
        let profession = 0xFFFF_0000 | pseudo_id as u32;
        self.agents
            .push(agent_record(address, profession, u32::MAX, &field));
    }

    pub fn skill(&mut self, id: i32, name: &str) {
        let mut record = Vec::with_capacity(68);
        record.extend_from_slice(&id.to_le_bytes());
        record.extend_from_slice(name.as_bytes());
        record.resize(68, 0);
        self.skills.push(record);
    }

    pub fn event(&mut self, item: RawCombatItem) {
        self.events.push(encode_event_rev1(&item));
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(b"EVTC20240101");
        out.push(1); // revision
        out.extend_from_slice(&self.boss_species_id.to_le_bytes());
        out.push(0);

        out.extend_from_slice(&(self.agents.len() as u32).to_le_bytes());
        for agent in &self.agents {
            out.extend_from_slice(agent);
        }
        out.extend_from_slice(&(self.skills.len() as u32).to_le_bytes());
        for skill in &self.skills {
            out.extend_from_slice(skill);
        }
        for event in &self.events {
            out.extend_from_slice(event);
        }
        out
    }
}

fn agent_record(address: u64, profession: u32, is_elite: u32, name: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(96);
    record.extend_from_slice(&address.to_le_bytes());
    record.extend_from_slice(&profession.to_le_bytes());
    record.extend_from_slice(&is_elite.to_le_bytes());
    for stat in [10u16, 11, 12, 13, 14, 15] {
        record.extend_from_slice(&stat.to_le_bytes());
    }
    let mut field = name.to_vec();
    field.resize(64, 0);
    record.extend_from_slice(&field);
    record.resize(96, 0);
    record
}

pub fn encode_event_rev1(item: &RawCombatItem) -> Vec<u8> {
    let mut r = Vec::with_capacity(64);
    r.extend_from_slice(&item.time.to_le_bytes());
    r.extend_from_slice(&item.src_agent.to_le_bytes());
    r.extend_from_slice(&item.dst_agent.to_le_bytes());
    r.extend_from_slice(&item.value.to_le_bytes());
    r.extend_from_slice(&item.buff_dmg.to_le_bytes());
    r.extend_from_slice(&item.overstack_value.to_le_bytes());
    r.extend_from_slice(&item.skill_id.to_le_bytes());
    r.extend_from_slice(&item.src_instance_id.to_le_bytes());
    r.extend_from_slice(&item.dst_instance_id.to_le_bytes());
    r.extend_from_slice(&item.src_master_instance_id.to_le_bytes());
    r.extend_from_slice(&item.dst_master_instance_id.to_le_bytes());
    r.extend_from_slice(&[
        item.iff,
        item.buff,
        item.result,
        item.is_activation,
        item.is_buff_remove,
        item.is_ninety,
        item.is_fifty,
        item.is_moving,
        item.is_statechange,
        item.is_flanking,
        item.is_shields,
        item.is_offcycle,
    ]);
    r.resize(64, 0);
    r
}

pub fn state_change(time: u64, src_agent: u64, discriminant: u8) -> RawCombatItem {
    RawCombatItem {
        time,
        src_agent,
        is_statechange: discriminant,
        ..RawCombatItem::default()
    }
}

pub fn damage(time: u64, src_agent: u64, dst_agent: u64, skill_id: u32, amount: i32) -> RawCombatItem {
    RawCombatItem {
        time,
        src_agent,
        dst_agent,
        skill_id,
        value: amount,
        ..RawCombatItem::default()
    }
}

pub fn buff_apply(time: u64, src_agent: u64, dst_agent: u64, skill_id: u32, duration_ms: i32) -> RawCombatItem {
    RawCombatItem {
        time,
        src_agent,
        dst_agent,
        skill_id,
        buff: 1,
        value: duration_ms,
        ..RawCombatItem::default()
    }
}

/// `removal`: 1 = all stacks, 2 = single, 3 = manual. Per the recorder's
/// convention the buff owner goes in `src_agent` and the remover in
/// `dst_agent`.
pub fn buff_remove(time: u64, owner: u64, remover: u64, skill_id: u32, removal: u8) -> RawCombatItem {
    RawCombatItem {
        time,
        src_agent: owner,
        dst_agent: remover,
        skill_id,
        buff: 1,
        is_buff_remove: removal,
        ..RawCombatItem::default()
    }
}

pub fn health_update(time: u64, src_agent: u64, fraction_x10000: u64) -> RawCombatItem {
    RawCombatItem {
        time,
        src_agent,
        dst_agent: fraction_x10000,
        is_statechange: state::HEALTH_UPDATE,
        ..RawCombatItem::default()
    }
}
