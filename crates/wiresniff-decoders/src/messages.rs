//! Decoded record types the representative decoders produce.
//!
//! These are ordinary data structs; [`crate::registry::build_registry`]
//! wires decode functions that read their fields from an IPC body in wire
//! order.

/// A status effect slot as carried on `statusList` and embedded in
/// `npcSpawn`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusEffect {
    /// Effect catalog id; `0` means the slot is empty.
    pub effect_id: u16,
    /// Remaining duration in seconds.
    pub duration: f32,
    /// Actor id that applied the effect.
    pub source_actor: u32,
}

/// `npcSpawn`: an NPC entering render range.
#[derive(Debug, Clone, PartialEq)]
pub struct NpcSpawn {
    /// Map-specific gimmick/event id, `0` for a plain NPC.
    pub gimmick_id: u32,
    /// World position.
    pub position: [f32; 3],
    /// Status effect slots, fixed-length per [`crate::RegionConstants::status_effect_slots`].
    pub effects: Vec<StatusEffect>,
    /// Display name.
    pub name: String,
}

/// `statusList`: a full status effect refresh for one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusList {
    /// Actor the list belongs to.
    pub actor_id: u32,
    /// Status effect slots, fixed-length per [`crate::RegionConstants::status_effect_slots`].
    pub effects: Vec<StatusEffect>,
}

/// `actorMove`: a position/rotation update for an actor already in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorMove {
    /// Actor being moved.
    pub actor_id: u32,
    /// New world position.
    pub position: [f32; 3],
    /// New facing, radians.
    pub rotation: f32,
}

/// `chatMessage`: a chat line on some channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    /// Channel identifier (say, party, linkshell, ...).
    pub channel: u16,
    /// Sender's display name.
    pub sender_name: String,
    /// Message body.
    pub body: String,
}

/// `marketBoardItemListing`: one row of a market board item listing.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketBoardItemListing {
    /// Listing id, unique within the item's board.
    pub listing_id: u32,
    /// Catalog item id being sold.
    pub item_id: u32,
    /// Unit price in the deployment's currency.
    pub price_per_unit: u32,
    /// Quantity available at this price.
    pub quantity: u32,
    /// Retainer (vendor) display name.
    pub retainer_name: String,
}

/// `initZone`: the zone-entry handshake message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitZone {
    /// Zone catalog id being entered.
    pub zone_id: u16,
    /// Active weather id at entry time.
    pub weather_id: u8,
    /// Player spawn position in the new zone.
    pub spawn_position: [f32; 3],
}
