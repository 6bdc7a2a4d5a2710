//! Config-loader boundary: fetches a region's opcode and constants catalogs.
//!
//! `wiresniff-core` and `wiresniff-decoders` only know how to consume an
//! already-built [`OpcodeIndex`](wiresniff_core::OpcodeIndex) and
//! [`RegionConstants`](wiresniff_decoders::RegionConstants); this crate is
//! the only thing that talks to the network to go get them. Swapping
//! [`ConfigSource`] for a static/offline implementation (see
//! [`source::StaticSource`]) is how tests and examples avoid a live network
//! call, the same way `lockframe-server`'s storage trait lets tests swap in
//! an in-memory backend.

pub mod error;
pub mod region;
pub mod schema;
pub mod source;

pub use error::ConfigError;
pub use region::Region;
pub use schema::{OpcodeCatalog, OpcodeEntry, RegionConstantsDto};
pub use source::{ConfigSource, HttpSource, StaticSource};

use wiresniff_core::OpcodeIndex;
use wiresniff_decoders::RegionConstants;

/// Build an [`OpcodeIndex`] from a region's catalog, per `spec.md`'s
/// server-zone-then-client-zone merge order.
#[must_use]
pub fn build_opcode_index(catalog: &OpcodeCatalog) -> OpcodeIndex {
    OpcodeIndex::build(
        catalog.server_zone_ipc_type.iter().map(|entry| (entry.name.as_str(), entry.opcode)),
        catalog.client_zone_ipc_type.iter().map(|entry| (entry.name.as_str(), entry.opcode)),
    )
}

/// Fetch and build everything [`wiresniff_core::Pipeline::set_region_data`]
/// needs for `region`: the merged opcode index and the region constants.
///
/// # Errors
///
/// Propagates whatever [`ConfigSource::fetch_opcodes`]/`fetch_constants`
/// returned. Per `spec.md` §7 (`AssetLoadFailure`), a failure here must
/// prevent `ready` from firing — the caller is expected to not call
/// `set_region_data` at all when this returns `Err`.
pub async fn load_region_data(
    source: &impl ConfigSource,
    region: Region,
) -> Result<(OpcodeIndex, RegionConstants), ConfigError> {
    let catalog = source.fetch_opcodes(region).await?;
    let constants = source.fetch_constants(region).await?;
    Ok((build_opcode_index(&catalog), constants.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_opcode_index_merges_both_lists() {
        let server_zone = vec![OpcodeEntry { name: "NpcSpawn".to_string(), opcode: 0x100 }];
        let client_zone = vec![OpcodeEntry { name: "ChatMessage".to_string(), opcode: 0x200 }];

        let catalog = OpcodeCatalog { server_zone_ipc_type: server_zone, client_zone_ipc_type: client_zone };
        let index = build_opcode_index(&catalog);

        assert_eq!(&*index.lookup(0x100), "npcSpawn");
        assert_eq!(&*index.lookup(0x200), "chatMessage");
    }

    #[tokio::test]
    async fn load_region_data_uses_static_source() {
        let source = StaticSource::global_defaults();
        let (index, constants) = load_region_data(&source, Region::Global).await.expect("loads");
        assert!(!index.is_empty());
        assert_eq!(constants, RegionConstants::GLOBAL);
    }
}
