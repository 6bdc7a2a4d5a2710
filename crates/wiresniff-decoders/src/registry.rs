//! Builds the concrete decoder table for [`RegionConstants`].
//!
//! The full catalog carries on the order of 55 message decoders; this table
//! registers the handful implemented in full (`npcSpawn`, `statusList`,
//! `actorMove`, `chatMessage`, `marketBoardItemListing`, `initZone`) and
//! documents that the rest follow the exact same contract — a `BufferReader`
//! positioned at the IPC body in, a typed record out, no backward seeking.

use wiresniff_core::DecoderRegistry;

use crate::{constants::RegionConstants, decoders};

/// Build the decoder table with every representative entry registered.
#[must_use]
pub fn build_registry() -> DecoderRegistry<RegionConstants> {
    let mut registry = DecoderRegistry::new();
    registry.register("npcSpawn", decoders::npc_spawn);
    registry.register("statusList", decoders::status_list);
    registry.register("actorMove", decoders::actor_move);
    registry.register("chatMessage", decoders::chat_message);
    registry.register("marketBoardItemListing", decoders::market_board_item_listing);
    registry.register("initZone", decoders::init_zone);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_one_entry_per_representative_decoder() {
        assert_eq!(build_registry().len(), 6);
    }
}
