//! End-to-end scenarios driving [`wiresniff_core::Pipeline`] exactly the way
//! a capture driver would: raw bytes in, events out.

use std::io::Write;

use flate2::{Compression, write::ZlibEncoder};
use wiresniff_core::{DecodeError, DecodeResult, DecoderRegistry, OpcodeIndex, Pipeline};
use wiresniff_proto::{BufferReader, FrameHeader, IpcHeader, KEEPALIVE_MAGIC, STANDARD_MAGIC, SegmentHeader};

fn addr(port: u16) -> std::net::SocketAddr {
    std::net::SocketAddr::from(([127, 0, 0, 1], port))
}

fn frame_bytes(body: &[u8], compressed: bool, segment_count: u16) -> Vec<u8> {
    let mut bytes = vec![0u8; FrameHeader::SIZE];
    bytes[0..16].copy_from_slice(&STANDARD_MAGIC);
    bytes[30..32].copy_from_slice(&segment_count.to_le_bytes());
    bytes[33] = u8::from(compressed);
    bytes.extend_from_slice(body);
    let total = bytes.len() as u32;
    bytes[24..28].copy_from_slice(&total.to_le_bytes());
    bytes
}

fn ipc_segment_bytes(opcode: u16, payload: &[u8]) -> Vec<u8> {
    let mut ipc = vec![0u8; IpcHeader::SIZE];
    ipc[2..4].copy_from_slice(&opcode.to_le_bytes());
    ipc.extend_from_slice(payload);

    let mut segment = vec![0u8; SegmentHeader::SIZE];
    segment[12..14].copy_from_slice(&3u16.to_le_bytes()); // Ipc
    segment.extend_from_slice(&ipc);
    let total = segment.len() as u32;
    segment[0..4].copy_from_slice(&total.to_le_bytes());
    segment
}

#[derive(Debug, PartialEq, Eq)]
struct NpcSpawn {
    gimmick_id: u32,
    effects: Vec<u8>,
}

fn npc_spawn_body() -> Vec<u8> {
    let mut body = vec![0u8; 4]; // gimmickId == 0
    body.extend(std::iter::repeat_n(0u8, 30)); // 30 zero-padded effect slots
    body
}

fn decode_npc_spawn(reader: &mut BufferReader<'_>, _constants: &()) -> DecodeResult {
    let gimmick_id = reader.next_u32();
    let mut effects = Vec::with_capacity(30);
    for _ in 0..30 {
        effects.push(reader.next_u8());
    }
    if reader.is_truncated() {
        return Err(DecodeError::Truncated);
    }
    Ok(Box::new(NpcSpawn { gimmick_id, effects }))
}

fn pipeline_with_npc_spawn() -> Pipeline<()> {
    let mut decoders: DecoderRegistry<()> = DecoderRegistry::new();
    decoders.register("npcSpawn", decode_npc_spawn);
    let pipeline = Pipeline::new(decoders);
    pipeline.set_region_data(OpcodeIndex::build([], [("NpcSpawn", 0x42)]), Some(()));
    pipeline
}

#[test]
fn scenario_1_keepalive_only() {
    let mut pipeline: Pipeline<()> = Pipeline::new(DecoderRegistry::new());
    let mut packet_rx = pipeline.events().subscribe_packet();
    let mut diagnostics_rx = pipeline.events().subscribe_diagnostics();
    let mut message_rx = pipeline.events().subscribe_message();

    let mut bytes = vec![0u8; FrameHeader::SIZE];
    bytes[0..16].copy_from_slice(&KEEPALIVE_MAGIC);
    bytes[24..28].copy_from_slice(&(FrameHeader::SIZE as u32).to_le_bytes());
    pipeline.handle_payload(addr(1), addr(2), &bytes);

    let packet = packet_rx.try_recv().expect("packet event");
    assert!(packet.segments.is_empty());
    assert!(diagnostics_rx.try_recv().is_ok());
    assert!(message_rx.try_recv().is_err());
}

#[test]
fn scenario_2_uncompressed_ipc_known_opcode() {
    let mut pipeline = pipeline_with_npc_spawn();
    let mut message_rx = pipeline.events().subscribe_message();
    let mut segment_rx = pipeline.events().subscribe_segment();
    let mut packet_rx = pipeline.events().subscribe_packet();
    let mut diagnostics_rx = pipeline.events().subscribe_diagnostics();

    let body = ipc_segment_bytes(0x42, &npc_spawn_body());
    let frame = frame_bytes(&body, false, 1);
    pipeline.handle_payload(addr(1), addr(2), &frame);

    let message = message_rx.try_recv().expect("message event");
    assert_eq!(&*message.name, "npcSpawn");
    let parsed = message
        .segment
        .parsed_ipc_data
        .as_ref()
        .expect("npcSpawn decoded")
        .as_any()
        .downcast_ref::<NpcSpawn>()
        .expect("downcasts to NpcSpawn");
    assert_eq!(parsed.gimmick_id, 0);
    assert_eq!(parsed.effects.len(), 30);

    assert!(segment_rx.try_recv().is_ok());
    assert!(packet_rx.try_recv().is_ok());
    assert!(diagnostics_rx.try_recv().is_ok());
}

#[test]
fn scenario_3_compressed_ipc_matches_uncompressed() {
    let mut pipeline = pipeline_with_npc_spawn();
    let mut message_rx = pipeline.events().subscribe_message();
    let mut segment_rx = pipeline.events().subscribe_segment();
    let mut packet_rx = pipeline.events().subscribe_packet();
    let mut diagnostics_rx = pipeline.events().subscribe_diagnostics();

    let body = ipc_segment_bytes(0x42, &npc_spawn_body());
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body).expect("zlib write");
    let compressed = encoder.finish().expect("zlib finish");
    let frame = frame_bytes(&compressed, true, 1);
    pipeline.handle_payload(addr(1), addr(2), &frame);

    let message = message_rx.try_recv().expect("message event");
    assert_eq!(&*message.name, "npcSpawn");
    assert!(segment_rx.try_recv().is_ok());
    assert!(packet_rx.try_recv().is_ok());
    assert!(diagnostics_rx.try_recv().is_ok());
}

#[test]
fn scenario_4_encrypted_frame_is_dropped_quietly() {
    let mut pipeline = pipeline_with_npc_spawn();
    let mut segment_rx = pipeline.events().subscribe_segment();
    let mut packet_rx = pipeline.events().subscribe_packet();
    let mut error_rx = pipeline.events().subscribe_error();

    let frame = frame_bytes(&[0x01, 0x02, 0x03, 0x04, 0x05], true, 1);
    pipeline.handle_payload(addr(1), addr(2), &frame);

    assert!(segment_rx.try_recv().is_err());
    assert!(packet_rx.try_recv().is_err());
    assert!(error_rx.try_recv().is_err());
}

#[test]
fn scenario_5_fragmented_delivery_matches_single_shot() {
    let mut pipeline = pipeline_with_npc_spawn();
    let mut message_rx = pipeline.events().subscribe_message();
    let mut packet_rx = pipeline.events().subscribe_packet();

    let body = ipc_segment_bytes(0x42, &npc_spawn_body());
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body).expect("zlib write");
    let compressed = encoder.finish().expect("zlib finish");
    let frame = frame_bytes(&compressed, true, 1);

    let (first, rest) = frame.split_at(1);
    let (second, third) = rest.split_at(17);
    pipeline.handle_payload(addr(1), addr(2), first);
    assert!(packet_rx.try_recv().is_err());
    pipeline.handle_payload(addr(1), addr(2), second);
    assert!(packet_rx.try_recv().is_err());
    pipeline.handle_payload(addr(1), addr(2), third);

    let message = message_rx.try_recv().expect("message event");
    assert_eq!(&*message.name, "npcSpawn");
    assert!(packet_rx.try_recv().is_ok());
}

#[test]
fn scenario_6_unknown_opcode() {
    let mut pipeline: Pipeline<()> = Pipeline::new(DecoderRegistry::new());
    pipeline.set_region_data(OpcodeIndex::empty(), Some(()));
    let mut message_rx = pipeline.events().subscribe_message();

    let body = ipc_segment_bytes(0x9999, &[1, 2, 3]);
    let frame = frame_bytes(&body, false, 1);
    pipeline.handle_payload(addr(1), addr(2), &frame);

    let message = message_rx.try_recv().expect("message event");
    assert_eq!(&*message.name, "unknown");
    assert!(message.segment.parsed_ipc_data.is_none());
    assert!(message.segment.ipc_data.is_some());
}

#[test]
fn two_back_to_back_frames_in_one_payload_yield_two_packets() {
    let mut pipeline: Pipeline<()> = Pipeline::new(DecoderRegistry::new());
    let mut packet_rx = pipeline.events().subscribe_packet();

    let mut bytes = vec![0u8; FrameHeader::SIZE];
    bytes[0..16].copy_from_slice(&KEEPALIVE_MAGIC);
    bytes[24..28].copy_from_slice(&(FrameHeader::SIZE as u32).to_le_bytes());
    let mut both = bytes.clone();
    both.extend_from_slice(&bytes);

    pipeline.handle_payload(addr(1), addr(2), &both);
    assert!(packet_rx.try_recv().is_ok());
    assert!(packet_rx.try_recv().is_ok());
    assert!(packet_rx.try_recv().is_err());
}
