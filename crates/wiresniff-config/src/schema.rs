//! JSON shape of the remote opcode and constants catalogs.

use serde::Deserialize;

/// One `{name, opcode}` entry of an upstream opcode list.
///
/// Name is the UpperCamelCase message name (`"NpcSpawn"`); [`crate::build_opcode_index`]
/// lowers the leading character before handing the merged table to
/// `wiresniff-core`.
#[derive(Debug, Clone, Deserialize)]
pub struct OpcodeEntry {
    /// UpperCamelCase message name as published upstream.
    pub name: String,
    /// Numeric opcode the name is keyed to.
    pub opcode: u16,
}

/// A region's opcode catalog, split the way the upstream lists are
/// published: messages the server sends, and messages the client sends.
///
/// Each list is a JSON array of `{name, opcode}` objects (`spec.md` §6), not
/// a `name -> opcode` map — [`crate::build_opcode_index`] does the
/// name→opcode flattening.
#[derive(Debug, Clone, Deserialize)]
pub struct OpcodeCatalog {
    /// Server-to-client message name/opcode entries.
    #[serde(rename = "ServerZoneIpcType")]
    pub server_zone_ipc_type: Vec<OpcodeEntry>,
    /// Client-to-server message name/opcode entries.
    #[serde(rename = "ClientZoneIpcType")]
    pub client_zone_ipc_type: Vec<OpcodeEntry>,
}

/// A region's fixed-array width constants, as published alongside the
/// opcode catalog.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RegionConstantsDto {
    /// Number of status effect slots.
    #[serde(rename = "StatusEffectSlots")]
    pub status_effect_slots: usize,
    /// Number of raw appearance bytes.
    #[serde(rename = "AppearanceByteCount")]
    pub appearance_byte_count: usize,
}

impl From<RegionConstantsDto> for wiresniff_decoders::RegionConstants {
    fn from(dto: RegionConstantsDto) -> Self {
        Self { status_effect_slots: dto.status_effect_slots, appearance_byte_count: dto.appearance_byte_count }
    }
}
