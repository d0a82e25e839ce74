//! Binary EVTC reader
//!
//! Frames a raw byte stream into header + agent table + skill table +
//! event records. Compressed archives (`.zevtc`, a ZIP wrapper around the
//! payload) are detected by magic and unpacked first.

use std::io::Read;

use chrono::{Datelike, NaiveDate};
use memchr::memchr;
use tracing::{debug, warn};

use super::error::LogError;
use super::raw::{LogHeader, RawAgent, RawAgentName, RawCombatItem, RawLog, RawSkill};

#[cfg(test)]
mod tests;

/// Newest event-record revision this reader understands.
const SUPPORTED_REVISION: u8 = 1;

/// Newest recorder build this reader was written against. Logs written by
/// newer builds still parse, with reduced feature support.
const LATEST_KNOWN_BUILD: (i32, u32, u32) = (2025, 6, 1);

const MAGIC: &[u8; 4] = b"EVTC";
const ZIP_MAGIC: &[u8; 2] = b"PK";

const AGENT_RECORD_SIZE: usize = 96;
const SKILL_RECORD_SIZE: usize = 68;
const EVENT_RECORD_SIZE: usize = 64;

pub struct LogReader;

impl LogReader {
    /// Parse a raw log out of `bytes`, decompressing first if the stream is
    /// an archive. The reader validates structure only; it never interprets
    /// addresses, skill ids or event discriminants.
    pub fn read(bytes: &[u8]) -> Result<RawLog, LogError> {
        if bytes.starts_with(ZIP_MAGIC) {
            let decompressed = decompress(bytes)?;
            return Self::read_payload(&decompressed);
        }
        Self::read_payload(bytes)
    }

    fn read_payload(bytes: &[u8]) -> Result<RawLog, LogError> {
        let mut cursor = Cursor::new(bytes);

        let header = read_header(&mut cursor)?;
        debug!(
            build = %header.build_date,
            revision = header.revision,
            boss_species_id = header.boss_species_id,
            "parsed EVTC header"
        );

        let agent_count = cursor.read_u32()? as usize;
        let mut agents = Vec::with_capacity(agent_count.min(4096));
        for _ in 0..agent_count {
            agents.push(read_agent(&mut cursor)?);
        }

        let skill_count = cursor.read_u32()? as usize;
        let mut skills = Vec::with_capacity(skill_count.min(4096));
        for _ in 0..skill_count {
            skills.push(read_skill(&mut cursor)?);
        }

        // Event records run to the end of the payload. A trailing partial
        // record means the file was cut off mid-write.
        let remaining = cursor.remaining();
        if remaining % EVENT_RECORD_SIZE != 0 {
            return Err(LogError::UnexpectedEndOfData {
                offset: cursor.offset + (remaining / EVENT_RECORD_SIZE) * EVENT_RECORD_SIZE,
            });
        }
        let event_count = remaining / EVENT_RECORD_SIZE;
        let mut events = Vec::with_capacity(event_count);
        for _ in 0..event_count {
            events.push(read_event(&mut cursor, header.revision)?);
        }

        debug!(
            agents = agents.len(),
            skills = skills.len(),
            events = events.len(),
            "framed raw log"
        );

        Ok(RawLog {
            header,
            agents,
            skills,
            events,
        })
    }
}

fn decompress(bytes: &[u8]) -> Result<Vec<u8>, LogError> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(LogError::Decompression)?;
    if archive.is_empty() {
        return Err(LogError::malformed("archive contains no entries"));
    }
    let mut entry = archive.by_index(0).map_err(LogError::Decompression)?;
    let mut payload = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut payload)
        .map_err(LogError::DecompressionIo)?;
    Ok(payload)
}

fn read_header(cursor: &mut Cursor) -> Result<LogHeader, LogError> {
    let magic = cursor.read_bytes(4)?;
    if magic != MAGIC {
        return Err(LogError::BadMagic);
    }

    let date_bytes = cursor.read_bytes(8)?;
    let date_str = std::str::from_utf8(date_bytes)
        .map_err(|_| LogError::malformed("build date is not valid UTF-8"))?;
    let build_date = NaiveDate::parse_from_str(date_str, "%Y%m%d")
        .map_err(|_| LogError::malformed(format!("invalid build date {date_str:?}")))?;

    let revision = cursor.read_u8()?;
    if revision > SUPPORTED_REVISION {
        return Err(LogError::UnsupportedVersion {
            revision,
            supported: SUPPORTED_REVISION,
        });
    }

    if (build_date.year(), build_date.month(), build_date.day()) > LATEST_KNOWN_BUILD {
        warn!(
            build = %build_date,
            "log was written by a newer recorder build; continuing with reduced feature support"
        );
    }

    let boss_species_id = cursor.read_u16()?;
    cursor.read_u8()?; // unused pad byte

    Ok(LogHeader {
        build_date,
        revision,
        boss_species_id,
    })
}

fn read_agent(cursor: &mut Cursor) -> Result<RawAgent, LogError> {
    let record = cursor.read_bytes(AGENT_RECORD_SIZE)?;

    Ok(RawAgent {
        address: u64::from_le_bytes(slice8(record, 0)),
        profession: u32::from_le_bytes(slice4(record, 8)),
        is_elite: u32::from_le_bytes(slice4(record, 12)),
        toughness: u16::from_le_bytes(slice2(record, 16)),
        concentration: u16::from_le_bytes(slice2(record, 18)),
        healing: u16::from_le_bytes(slice2(record, 20)),
        hitbox_width: u16::from_le_bytes(slice2(record, 22)),
        condition: u16::from_le_bytes(slice2(record, 24)),
        hitbox_height: u16::from_le_bytes(slice2(record, 26)),
        name: decode_name(&record[28..92]),
    })
}

fn read_skill(cursor: &mut Cursor) -> Result<RawSkill, LogError> {
    let record = cursor.read_bytes(SKILL_RECORD_SIZE)?;
    let id = i32::from_le_bytes(slice4(record, 0));
    let name_field = &record[4..];
    let end = memchr(0, name_field).unwrap_or(name_field.len());
    let name = String::from_utf8_lossy(&name_field[..end]).into_owned();
    Ok(RawSkill { id, name })
}

fn read_event(cursor: &mut Cursor, revision: u8) -> Result<RawCombatItem, LogError> {
    let r = cursor.read_bytes(EVENT_RECORD_SIZE)?;

    let mut item = RawCombatItem {
        time: u64::from_le_bytes(slice8(r, 0)),
        src_agent: u64::from_le_bytes(slice8(r, 8)),
        dst_agent: u64::from_le_bytes(slice8(r, 16)),
        value: i32::from_le_bytes(slice4(r, 24)),
        buff_dmg: i32::from_le_bytes(slice4(r, 28)),
        ..RawCombatItem::default()
    };

    // The two supported revisions diverge after the shared prefix: revision
    // 0 packs overstack/skill id into 16 bits and has no dst master id.
    if revision == 0 {
        item.overstack_value = u16::from_le_bytes(slice2(r, 32)) as u32;
        item.skill_id = u16::from_le_bytes(slice2(r, 34)) as u32;
        item.src_instance_id = u16::from_le_bytes(slice2(r, 36));
        item.dst_instance_id = u16::from_le_bytes(slice2(r, 38));
        item.src_master_instance_id = u16::from_le_bytes(slice2(r, 40));
        // bytes 42..51 are recorder-internal garbage
        item.iff = r[51];
        item.buff = r[52];
        item.result = r[53];
        item.is_activation = r[54];
        item.is_buff_remove = r[55];
        item.is_ninety = r[56];
        item.is_fifty = r[57];
        item.is_moving = r[58];
        item.is_statechange = r[59];
        item.is_flanking = r[60];
        item.is_shields = r[61];
        item.is_offcycle = r[62];
    } else {
        item.overstack_value = u32::from_le_bytes(slice4(r, 32));
        item.skill_id = u32::from_le_bytes(slice4(r, 36));
        item.src_instance_id = u16::from_le_bytes(slice2(r, 40));
        item.dst_instance_id = u16::from_le_bytes(slice2(r, 42));
        item.src_master_instance_id = u16::from_le_bytes(slice2(r, 44));
        item.dst_master_instance_id = u16::from_le_bytes(slice2(r, 46));
        item.iff = r[48];
        item.buff = r[49];
        item.result = r[50];
        item.is_activation = r[51];
        item.is_buff_remove = r[52];
        item.is_ninety = r[53];
        item.is_fifty = r[54];
        item.is_moving = r[55];
        item.is_statechange = r[56];
        item.is_flanking = r[57];
        item.is_shields = r[58];
        item.is_offcycle = r[59];
    }

    Ok(item)
}

/// Decode a 64-byte agent name field into its NUL-separated parts.
fn decode_name(field: &[u8]) -> RawAgentName {
    let mut parts = [const { String::new() }; 3];
    let mut rest = field;
    for part in parts.iter_mut() {
        let Some(end) = memchr(0, rest) else {
            *part = String::from_utf8_lossy(rest).into_owned();
            break;
        };
        *part = String::from_utf8_lossy(&rest[..end]).into_owned();
        rest = &rest[end + 1..];
        if rest.is_empty() {
            break;
        }
    }
    let [character, account, subgroup] = parts;
    RawAgentName {
        character,
        account,
        subgroup,
    }
}

fn slice2(bytes: &[u8], at: usize) -> [u8; 2] {
    [bytes[at], bytes[at + 1]]
}

fn slice4(bytes: &[u8], at: usize) -> [u8; 4] {
    [bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]
}

fn slice8(bytes: &[u8], at: usize) -> [u8; 8] {
    let mut out = [0u8; 8];
    out.copy_from_slice(&bytes[at..at + 8]);
    out
}

/// Byte cursor tracking its absolute offset for truncation reporting.
struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], LogError> {
        if self.remaining() < len {
            return Err(LogError::UnexpectedEndOfData {
                offset: self.offset,
            });
        }
        let out = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(out)
    }

    fn read_u8(&mut self) -> Result<u8, LogError> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, LogError> {
        let b = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, LogError> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}
