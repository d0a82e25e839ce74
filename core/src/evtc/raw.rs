//! Raw EVTC record types
//!
//! These mirror the on-disk layout of the recorder's tables. The reader
//! fills them in without assigning any meaning to identifiers; resolution
//! into typed agents, skills and events happens in the model builder.

use chrono::NaiveDate;

/// Fixed-size header at the start of every EVTC file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogHeader {
    /// Build date of the recorder that wrote the log (`yyyymmdd` in the file)
    pub build_date: NaiveDate,
    /// Binary layout revision of the event records
    pub revision: u8,
    /// Species id of the encounter target the recorder believed it was
    /// logging. Zero for logs without a designated target.
    pub boss_species_id: u16,
}

/// One entry of the flat agent table.
#[derive(Debug, Clone)]
pub struct RawAgent {
    /// Recorder-assigned numeric address. Reused over the file's lifetime
    /// for distinct logical agents.
    pub address: u64,
    pub profession: u32,
    pub is_elite: u32,
    pub toughness: u16,
    pub concentration: u16,
    pub healing: u16,
    pub condition: u16,
    pub hitbox_width: u16,
    pub hitbox_height: u16,
    pub name: RawAgentName,
}

/// Decoded 64-byte name field. Players carry up to three NUL-separated
/// strings (character, account, subgroup); everything else only the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAgentName {
    pub character: String,
    pub account: String,
    pub subgroup: String,
}

/// One entry of the flat skill table.
#[derive(Debug, Clone)]
pub struct RawSkill {
    pub id: i32,
    pub name: String,
}

/// One fixed-size combat event record.
///
/// Field meaning depends on the discriminants (`is_statechange`,
/// `is_activation`, `is_buff_remove`, `buff`); the reader leaves all of
/// that to the model builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawCombatItem {
    pub time: u64,
    pub src_agent: u64,
    pub dst_agent: u64,
    pub value: i32,
    pub buff_dmg: i32,
    pub overstack_value: u32,
    pub skill_id: u32,
    pub src_instance_id: u16,
    pub dst_instance_id: u16,
    pub src_master_instance_id: u16,
    pub dst_master_instance_id: u16,
    pub iff: u8,
    pub buff: u8,
    pub result: u8,
    pub is_activation: u8,
    pub is_buff_remove: u8,
    pub is_ninety: u8,
    pub is_fifty: u8,
    pub is_moving: u8,
    pub is_statechange: u8,
    pub is_flanking: u8,
    pub is_shields: u8,
    pub is_offcycle: u8,
}

/// Everything the reader extracts from one log file.
#[derive(Debug, Clone)]
pub struct RawLog {
    pub header: LogHeader,
    pub agents: Vec<RawAgent>,
    pub skills: Vec<RawSkill>,
    pub events: Vec<RawCombatItem>,
}
