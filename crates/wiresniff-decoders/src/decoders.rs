//! Representative decode functions.
//!
//! Each reads its fields from a [`BufferReader`] in wire order and returns a
//! typed record. None allocates a scratch buffer of its own — fixed-length
//! arrays are read by repeating primitive reads, per the registry's
//! contract. A decoder that runs off the end of the body reports
//! [`DecodeError::Truncated`] rather than returning a partially-filled
//! record the caller might mistake for complete.

use wiresniff_core::{DecodeError, DecodeResult};
use wiresniff_proto::BufferReader;

use crate::{
    constants::RegionConstants,
    messages::{ActorMove, ChatMessage, InitZone, MarketBoardItemListing, NpcSpawn, StatusEffect, StatusList},
};

fn read_status_effects(reader: &mut BufferReader<'_>, count: usize) -> Vec<StatusEffect> {
    let mut effects = Vec::with_capacity(count);
    for _ in 0..count {
        effects.push(StatusEffect {
            effect_id: reader.next_u16(),
            duration: reader.next_f32(),
            source_actor: reader.next_u32(),
        });
    }
    effects
}

fn finish(reader: &BufferReader<'_>) -> Result<(), DecodeError> {
    if reader.is_truncated() { Err(DecodeError::Truncated) } else { Ok(()) }
}

/// Decode an `npcSpawn` IPC body.
pub fn npc_spawn(reader: &mut BufferReader<'_>, constants: &RegionConstants) -> DecodeResult {
    let gimmick_id = reader.next_u32();
    let position = reader.next_position3();
    let effects = read_status_effects(reader, constants.status_effect_slots);
    let name = reader.next_string();
    finish(reader)?;
    Ok(Box::new(NpcSpawn { gimmick_id, position, effects, name }))
}

/// Decode a `statusList` IPC body.
pub fn status_list(reader: &mut BufferReader<'_>, constants: &RegionConstants) -> DecodeResult {
    let actor_id = reader.next_u32();
    let effects = read_status_effects(reader, constants.status_effect_slots);
    finish(reader)?;
    Ok(Box::new(StatusList { actor_id, effects }))
}

/// Decode an `actorMove` IPC body.
pub fn actor_move(reader: &mut BufferReader<'_>, _constants: &RegionConstants) -> DecodeResult {
    let actor_id = reader.next_u32();
    let position = reader.next_position3();
    let rotation = reader.next_f32();
    finish(reader)?;
    Ok(Box::new(ActorMove { actor_id, position, rotation }))
}

/// Decode a `chatMessage` IPC body.
pub fn chat_message(reader: &mut BufferReader<'_>, _constants: &RegionConstants) -> DecodeResult {
    let channel = reader.next_u16();
    let sender_name = reader.next_string();
    let body = reader.next_string();
    finish(reader)?;
    Ok(Box::new(ChatMessage { channel, sender_name, body }))
}

/// Decode a `marketBoardItemListing` IPC body.
pub fn market_board_item_listing(reader: &mut BufferReader<'_>, _constants: &RegionConstants) -> DecodeResult {
    let listing_id = reader.next_u32();
    let item_id = reader.next_u32();
    let price_per_unit = reader.next_u32();
    let quantity = reader.next_u32();
    let retainer_name = reader.next_string();
    finish(reader)?;
    Ok(Box::new(MarketBoardItemListing { listing_id, item_id, price_per_unit, quantity, retainer_name }))
}

/// Decode an `initZone` IPC body.
pub fn init_zone(reader: &mut BufferReader<'_>, _constants: &RegionConstants) -> DecodeResult {
    let zone_id = reader.next_u16();
    let weather_id = reader.next_u8();
    let spawn_position = reader.next_position3();
    finish(reader)?;
    Ok(Box::new(InitZone { zone_id, weather_id, spawn_position }))
}
