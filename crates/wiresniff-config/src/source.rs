//! [`ConfigSource`]: where a region's opcode/constants catalogs come from.
//!
//! [`HttpSource`] is the production implementation, fetching the two
//! documented upstream URLs. [`StaticSource`] holds a fixed, in-memory
//! catalog per region for tests and offline use — the config-layer
//! equivalent of swapping `lockframe-server`'s `Storage` trait for
//! `storage::memory` in tests.

use std::{collections::HashMap, future::Future};

use crate::{error::ConfigError, region::Region, schema::{OpcodeCatalog, OpcodeEntry, RegionConstantsDto}};

/// Upstream opcode catalog URL, keyed by nothing — the response carries
/// every region's entries in one array, filtered by [`HttpSource`] after
/// fetch.
pub const OPCODES_URL: &str =
    "https://raw.githubusercontent.com/karashiiro/FFXIVOpcodes/master/opcodes.min.json";

/// Upstream region-constants catalog URL.
pub const CONSTANTS_URL: &str =
    "https://raw.githubusercontent.com/karashiiro/FFXIVOpcodes/master/constants.min.json";

/// A source of per-region opcode and constants catalogs.
///
/// Implemented by [`HttpSource`] (the production fetcher) and
/// [`StaticSource`] (a fixed in-memory table for tests). `wiresniff-config`
/// is written against this trait, never against `reqwest` directly, so a
/// test never needs a live network connection to exercise
/// [`crate::load_region_data`].
pub trait ConfigSource {
    /// Fetch the opcode catalog for `region`.
    fn fetch_opcodes(
        &self,
        region: Region,
    ) -> impl Future<Output = Result<OpcodeCatalog, ConfigError>> + Send;

    /// Fetch the constants catalog for `region`.
    fn fetch_constants(
        &self,
        region: Region,
    ) -> impl Future<Output = Result<RegionConstantsDto, ConfigError>> + Send;
}

/// One entry of the upstream opcodes response: one region's two lists.
#[derive(Debug, Clone, serde::Deserialize)]
struct OpcodesResponseEntry {
    region: String,
    lists: OpcodeCatalog,
}

/// The production [`ConfigSource`]: fetches both catalogs over HTTPS.
///
/// Each call re-fetches and re-parses the whole upstream array; region
/// switches are expected to be rare (an operator action, not a per-packet
/// event) so there is no caching layer here — `wiresniff-core::Pipeline`
/// caches the *built* [`wiresniff_core::OpcodeIndex`], not this crate.
#[derive(Debug, Clone, Default)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    /// Build a source using a fresh [`reqwest::Client`].
    #[must_use]
    pub fn new() -> Self {
        Self { client: reqwest::Client::new() }
    }
}

impl ConfigSource for HttpSource {
    async fn fetch_opcodes(&self, region: Region) -> Result<OpcodeCatalog, ConfigError> {
        tracing::debug!(%region, url = OPCODES_URL, "fetching opcode catalog");
        let entries: Vec<OpcodesResponseEntry> =
            self.client.get(OPCODES_URL).send().await?.error_for_status()?.json().await?;
        entries
            .into_iter()
            .find(|entry| entry.region.eq_ignore_ascii_case(region.catalog_slug()))
            .map(|entry| entry.lists)
            .ok_or_else(|| {
                tracing::warn!(%region, "region absent from opcode catalog response");
                ConfigError::RegionNotConfigured(region.to_string())
            })
    }

    async fn fetch_constants(&self, region: Region) -> Result<RegionConstantsDto, ConfigError> {
        tracing::debug!(%region, url = CONSTANTS_URL, "fetching region constants");
        let by_region: HashMap<String, RegionConstantsDto> =
            self.client.get(CONSTANTS_URL).send().await?.error_for_status()?.json().await?;
        by_region
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(region.catalog_slug()))
            .map(|(_, dto)| dto)
            .ok_or_else(|| {
                tracing::warn!(%region, "region absent from constants catalog response");
                ConfigError::RegionNotConfigured(region.to_string())
            })
    }
}

/// A fixed, in-memory [`ConfigSource`] for tests and offline use.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    catalogs: HashMap<Region, OpcodeCatalog>,
    constants: HashMap<Region, RegionConstantsDto>,
}

impl StaticSource {
    /// A source with no catalogs loaded; every region lookup fails with
    /// [`ConfigError::RegionNotConfigured`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `catalog` and `constants` for `region`, replacing any
    /// previous entry.
    #[must_use]
    pub fn with_region(mut self, region: Region, catalog: OpcodeCatalog, constants: RegionConstantsDto) -> Self {
        self.catalogs.insert(region, catalog);
        self.constants.insert(region, constants);
        self
    }

    /// A source pre-populated with a minimal Global catalog, useful for
    /// tests that just need `load_region_data` to succeed without caring
    /// about specific opcodes.
    #[must_use]
    pub fn global_defaults() -> Self {
        let catalog = OpcodeCatalog {
            server_zone_ipc_type: vec![OpcodeEntry { name: "NpcSpawn".to_string(), opcode: 0x042_u16 }],
            client_zone_ipc_type: vec![OpcodeEntry { name: "ChatMessage".to_string(), opcode: 0x043_u16 }],
        };
        let constants = RegionConstantsDto { status_effect_slots: 30, appearance_byte_count: 26 };
        Self::new().with_region(Region::Global, catalog, constants)
    }
}

impl ConfigSource for StaticSource {
    async fn fetch_opcodes(&self, region: Region) -> Result<OpcodeCatalog, ConfigError> {
        self.catalogs.get(&region).cloned().ok_or_else(|| ConfigError::RegionNotConfigured(region.to_string()))
    }

    async fn fetch_constants(&self, region: Region) -> Result<RegionConstantsDto, ConfigError> {
        self.constants.get(&region).copied().ok_or_else(|| ConfigError::RegionNotConfigured(region.to_string()))
    }
}
