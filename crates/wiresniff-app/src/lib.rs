//! Public facade: wires `wiresniff-config`, `wiresniff-capture`, and
//! `wiresniff-core`'s pipeline together into the operations `spec.md` §6
//! describes — `new`, `open`, `close`, `set_region`, `subscribe_*`, and the
//! static `list_devices`.
//!
//! This crate has no logic of its own beyond sequencing: load a region's
//! catalogs, build a pipeline against `wiresniff-decoders`' concrete
//! decoder table, hand both to `wiresniff-capture`, and re-expose its
//! detached event/region handles.

pub mod error;

pub use error::SnifferError;
pub use wiresniff_config::Region;
pub use wiresniff_core::{
    DiagnosticsEvent, ErrorEvent, EventHandles, MessageEvent, PacketEvent, Segment, SegmentEvent,
};

use pcap::Device;
use wiresniff_capture::CaptureEngine;
use wiresniff_config::{ConfigSource, HttpSource, load_region_data};
use wiresniff_core::{DecoderRegistry, Pipeline};
use wiresniff_decoders::RegionConstants;

/// List every capture-capable device on this host.
///
/// # Errors
///
/// Returns [`SnifferError::Capture`] if device enumeration fails.
pub fn list_devices() -> Result<Vec<Device>, SnifferError> {
    wiresniff_capture::list_devices().map_err(SnifferError::from)
}

/// The public entry point: construct with a region, [`Sniffer::open`] a
/// device, subscribe to events, [`Sniffer::close`] when done.
///
/// Generic over where opcode/constants catalogs come from — production code
/// uses the default [`HttpSource`]; tests substitute
/// [`wiresniff_config::StaticSource`] to avoid a live network call.
pub struct Sniffer<S: ConfigSource = HttpSource> {
    source: S,
    region: Region,
    engine: Option<CaptureEngine<RegionConstants>>,
}

impl Sniffer<HttpSource> {
    /// Build a sniffer for `region`, fetching catalogs over HTTPS on
    /// [`Sniffer::open`].
    #[must_use]
    pub fn new(region: Region) -> Self {
        Self::with_source(region, HttpSource::new())
    }
}

impl<S: ConfigSource> Sniffer<S> {
    /// Build a sniffer for `region` using an explicit [`ConfigSource`].
    #[must_use]
    pub fn with_source(region: Region, source: S) -> Self {
        Self { source, region, engine: None }
    }

    /// Load `self.region`'s catalogs, build the pipeline, and start
    /// capturing on `device_name`.
    ///
    /// # Errors
    ///
    /// Returns [`SnifferError::Config`] if the catalog fetch fails (`ready`
    /// never fires, capture never starts) or [`SnifferError::Capture`] if
    /// opening the device or applying the BPF filter fails. Catalogs are
    /// loaded before the device is opened, so a config failure never leaves
    /// a half-started capture behind.
    pub async fn open(&mut self, device_name: &str) -> Result<(), SnifferError> {
        tracing::info!(region = %self.region, device = device_name, "opening sniffer");
        let (opcodes, constants) = load_region_data(&self.source, self.region).await?;

        let pipeline = Pipeline::new(self.decoder_registry());
        pipeline.set_region_data(opcodes, Some(constants));

        let engine = CaptureEngine::open(device_name, pipeline)?;
        self.engine = Some(engine);
        tracing::info!("sniffer ready");
        Ok(())
    }

    /// Stop capturing and release the device handle.
    ///
    /// In-flight frame processing at the moment this is called runs to
    /// completion. A no-op if the sniffer was never opened.
    pub fn close(&mut self) {
        if self.engine.take().is_some() {
            tracing::info!("sniffer closed");
        }
    }

    /// Fetch `region`'s catalogs and atomically swap the running pipeline
    /// over to them. The next frame processed after this call resolves
    /// opcodes against `region`'s map.
    ///
    /// # Errors
    ///
    /// Returns [`SnifferError::Config`] if the catalog fetch fails; the
    /// previously active region stays in effect. Returns
    /// [`SnifferError::NotOpen`] if called before [`Sniffer::open`] has
    /// succeeded.
    pub async fn set_region(&mut self, region: Region) -> Result<(), SnifferError> {
        let (opcodes, constants) = load_region_data(&self.source, region).await?;
        let engine = self.engine.as_ref().ok_or(SnifferError::NotOpen)?;
        self.region = region;
        tracing::info!(region = %region, "switched active region");
        engine.region().set(opcodes, Some(constants));
        Ok(())
    }

    /// Detached subscription handles for every event kind.
    ///
    /// # Errors
    ///
    /// Returns [`SnifferError::NotOpen`] if called before [`Sniffer::open`]
    /// has succeeded.
    pub fn events(&self) -> Result<&EventHandles, SnifferError> {
        self.engine.as_ref().map(CaptureEngine::events).ok_or(SnifferError::NotOpen)
    }

    fn decoder_registry(&self) -> DecoderRegistry<RegionConstants> {
        wiresniff_decoders::build_registry()
    }
}

#[cfg(test)]
mod tests {
    use wiresniff_config::StaticSource;

    use super::*;

    #[tokio::test]
    async fn open_with_unknown_device_surfaces_capture_error() {
        let mut sniffer = Sniffer::with_source(Region::Global, StaticSource::global_defaults());
        let err = sniffer.open("definitely-not-a-real-device-42").await.unwrap_err();
        assert!(matches!(err, SnifferError::Capture(_)));
    }

    #[tokio::test]
    async fn open_with_unconfigured_region_surfaces_config_error() {
        let mut sniffer = Sniffer::with_source(Region::Korean, StaticSource::new());
        let err = sniffer.open("lo").await.unwrap_err();
        assert!(matches!(err, SnifferError::Config(_)));
    }
}
