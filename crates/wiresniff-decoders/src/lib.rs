//! Region constants and the concrete per-message decoder table.
//!
//! `wiresniff-core` defines the decoder registry's shape generically over a
//! region-constants type; this crate supplies that type and a representative
//! set of decoders built against it.

pub mod constants;
pub mod decoders;
pub mod messages;
pub mod registry;

pub use constants::RegionConstants;
pub use messages::{ActorMove, ChatMessage, InitZone, MarketBoardItemListing, NpcSpawn, StatusEffect, StatusList};
pub use registry::build_registry;
