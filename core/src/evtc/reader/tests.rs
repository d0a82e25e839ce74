use std::io::Write;

use super::*;
use crate::test_util::{LogWriter, damage, state, state_change};

fn sample_writer() -> LogWriter {
    let mut log = LogWriter::new();
    log.boss_species_id = 15438;
    log.player(1000, "Roija", ":Roija.1234", "1");
    log.npc(2000, "Vale Guardian", 15438);
    log.skill(500, "Greatsword Swing");
    log.event(state_change(100, 1000, state::ENTER_COMBAT));
    log.event(damage(150, 1000, 2000, 500, 1200));
    log
}

#[test]
fn parses_header_and_tables() {
    let raw = LogReader::read(&sample_writer().bytes()).expect("valid log");

    assert_eq!(raw.header.revision, 1);
    assert_eq!(raw.header.boss_species_id, 15438);
    assert_eq!(
        raw.header.build_date,
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date")
    );

    assert_eq!(raw.agents.len(), 2);
    assert_eq!(raw.agents[0].address, 1000);
    assert_eq!(raw.agents[0].name.character, "Roija");
    assert_eq!(raw.agents[0].name.account, ":Roija.1234");
    assert_eq!(raw.agents[0].name.subgroup, "1");
    assert_eq!(raw.agents[1].profession & 0xFFFF, 15438);
    assert_eq!(raw.agents[1].is_elite, u32::MAX);

    assert_eq!(raw.skills.len(), 1);
    assert_eq!(raw.skills[0].id, 500);
    assert_eq!(raw.skills[0].name, "Greatsword Swing");

    assert_eq!(raw.events.len(), 2);
    assert_eq!(raw.events[0].time, 100);
    assert_eq!(raw.events[0].is_statechange, state::ENTER_COMBAT);
    assert_eq!(raw.events[1].src_agent, 1000);
    assert_eq!(raw.events[1].dst_agent, 2000);
    assert_eq!(raw.events[1].skill_id, 500);
    assert_eq!(raw.events[1].value, 1200);
}

#[test]
fn rejects_bad_magic() {
    let mut bytes = sample_writer().bytes();
    bytes[0] = b'X';
    assert!(matches!(
        LogReader::read(&bytes),
        Err(LogError::BadMagic)
    ));
}

#[test]
fn rejects_unknown_revision() {
    let mut bytes = sample_writer().bytes();
    bytes[12] = 7; // revision byte
    assert!(matches!(
        LogReader::read(&bytes),
        Err(LogError::UnsupportedVersion {
            revision: 7,
            supported: 1
        })
    ));
}

#[test]
fn truncation_in_agent_table_reports_offset() {
    let bytes = sample_writer().bytes();
    // Cut in the middle of the first agent record. The header is 16
    // bytes, the agent count 4 more; the failed read starts at 20.
    let truncated = &bytes[..40];
    match LogReader::read(truncated) {
        Err(LogError::UnexpectedEndOfData { offset }) => assert_eq!(offset, 20),
        other => panic!("expected truncation error, got {other:?}"),
    }
}

#[test]
fn trailing_partial_event_reports_offset() {
    let mut bytes = sample_writer().bytes();
    let full_len = bytes.len();
    bytes.extend_from_slice(&[0xAB; 10]);
    match LogReader::read(&bytes) {
        Err(LogError::UnexpectedEndOfData { offset }) => assert_eq!(offset, full_len),
        other => panic!("expected truncation error, got {other:?}"),
    }
}

#[test]
fn empty_input_is_truncated_at_zero() {
    match LogReader::read(&[]) {
        Err(LogError::UnexpectedEndOfData { offset }) => assert_eq!(offset, 0),
        other => panic!("expected truncation error, got {other:?}"),
    }
}

#[test]
fn decompresses_zip_wrapped_logs() {
    let payload = sample_writer().bytes();

    let mut buf = std::io::Cursor::new(Vec::new());
    let mut writer = zip::ZipWriter::new(&mut buf);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    writer.start_file("log.evtc", options).expect("zip entry");
    writer.write_all(&payload).expect("zip payload");
    writer.finish().expect("zip finish");
    let compressed = buf.into_inner();

    let from_zip = LogReader::read(&compressed).expect("zipped log");
    let direct = LogReader::read(&payload).expect("plain log");
    assert_eq!(from_zip.agents.len(), direct.agents.len());
    assert_eq!(from_zip.events.len(), direct.events.len());
    assert_eq!(from_zip.header, direct.header);
}

#[test]
fn parses_revision_zero_layout() {
    // Revision 0 packs overstack/skill id into 16 bits each and pads
    // differently; hand-roll one record.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"EVTC20180101");
    bytes.push(0); // revision
    bytes.extend_from_slice(&15438u16.to_le_bytes());
    bytes.push(0);
    bytes.extend_from_slice(&0u32.to_le_bytes()); // no agents
    bytes.extend_from_slice(&0u32.to_le_bytes()); // no skills

    let mut record = Vec::new();
    record.extend_from_slice(&42u64.to_le_bytes()); // time
    record.extend_from_slice(&7u64.to_le_bytes()); // src
    record.extend_from_slice(&9u64.to_le_bytes()); // dst
    record.extend_from_slice(&333i32.to_le_bytes()); // value
    record.extend_from_slice(&0i32.to_le_bytes()); // buff_dmg
    record.extend_from_slice(&5u16.to_le_bytes()); // overstack
    record.extend_from_slice(&500u16.to_le_bytes()); // skill id
    record.extend_from_slice(&1u16.to_le_bytes()); // src instid
    record.extend_from_slice(&2u16.to_le_bytes()); // dst instid
    record.extend_from_slice(&0u16.to_le_bytes()); // src master instid
    record.resize(51, 0); // recorder-internal bytes
    record.extend_from_slice(&[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]); // iff..is_offcycle
    record.resize(64, 0);
    bytes.extend_from_slice(&record);

    let raw = LogReader::read(&bytes).expect("revision 0 log");
    assert_eq!(raw.header.revision, 0);
    assert_eq!(raw.events.len(), 1);
    let event = raw.events[0];
    assert_eq!(event.time, 42);
    assert_eq!(event.src_agent, 7);
    assert_eq!(event.dst_agent, 9);
    assert_eq!(event.value, 333);
    assert_eq!(event.overstack_value, 5);
    assert_eq!(event.skill_id, 500);
    assert_eq!(event.src_instance_id, 1);
    assert_eq!(event.dst_instance_id, 2);
    assert_eq!(event.iff, 1);
}
