//! Runs the blocking `pcap` capture loop on a dedicated thread and feeds
//! every filtered PSH payload into a [`Pipeline`].
//!
//! `pcap`'s capture loop is blocking and has no async-friendly poll; rather
//! than wrap it in `spawn_blocking` per call, this crate gives it its own
//! `std::thread` for the lifetime of the capture, matching `spec.md` §5's
//! single-threaded-with-respect-to-processing model. Event bus senders are
//! `Send + Sync` and cheaply cloned, so consumers on other (async) tasks are
//! unaffected by which thread produces events.

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread::JoinHandle,
    time::Duration,
};

use pcap::{Active, Capture, Device};
use wiresniff_core::{EventHandles, Pipeline};

use crate::{bpf::FILTER, error::CaptureError, link::decode_psh_payload};

/// How long `pcap::Capture::next_packet` blocks before timing out and
/// letting the capture loop re-check the shutdown flag.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// List every capture-capable device on this host, as `pcap` enumerates
/// them.
///
/// # Errors
///
/// Returns [`CaptureError::Pcap`] if device enumeration itself fails
/// (insufficient permissions on most platforms).
pub fn list_devices() -> Result<Vec<Device>, CaptureError> {
    Ok(Device::list()?)
}

fn open_device(device_name: &str) -> Result<Capture<Active>, CaptureError> {
    let devices = Device::list()?;
    let device = devices
        .into_iter()
        .find(|d| d.name == device_name)
        .ok_or_else(|| CaptureError::DeviceNotFound(device_name.to_string()))?;

    let mut capture = Capture::from_device(device)?
        .promisc(true)
        .snaplen(65_535)
        .timeout(i32::try_from(POLL_TIMEOUT.as_millis()).unwrap_or(i32::MAX))
        .open()?;
    capture.filter(FILTER, true)?;
    Ok(capture)
}

/// A running capture: owns the capture thread and the [`Pipeline`] it feeds.
///
/// Dropping a handle without calling [`CaptureEngine::close`] leaves the
/// capture thread running in the background; `close` is the documented way
/// to stop delivery and reclaim the device handle.
pub struct CaptureEngine<C> {
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
    events: EventHandles,
    region: wiresniff_core::RegionHandle<C>,
}

impl<C> CaptureEngine<C>
where
    C: Send + Sync + 'static,
{
    /// Open `device_name`, apply the protocol's BPF filter, and start
    /// feeding every matching PSH payload into `pipeline` on a dedicated
    /// thread.
    ///
    /// # Errors
    ///
    /// Returns [`CaptureError::DeviceNotFound`] or [`CaptureError::Pcap`]
    /// synchronously, before the capture thread is spawned — per `spec.md`
    /// §7's `NetworkConfig` error kind, capture never starts on failure.
    pub fn open(device_name: &str, mut pipeline: Pipeline<C>) -> Result<Self, CaptureError> {
        let mut capture = open_device(device_name)?;
        let events = pipeline.event_handles();
        let region = pipeline.region_handle();
        let shutdown = Arc::new(AtomicBool::new(false));
        let thread_shutdown = Arc::clone(&shutdown);

        let thread = std::thread::Builder::new()
            .name("wiresniff-capture".to_string())
            .spawn(move || {
                run_capture_loop(&mut capture, &mut pipeline, &thread_shutdown);
            })
            .map_err(|_| CaptureError::ThreadStartFailure)?;

        Ok(Self { shutdown, thread: Some(thread), events, region })
    }

    /// Detached subscription handles for this capture's pipeline.
    #[must_use]
    pub fn events(&self) -> &EventHandles {
        &self.events
    }

    /// Detached handle for replacing this capture's active region data.
    #[must_use]
    pub fn region(&self) -> &wiresniff_core::RegionHandle<C> {
        &self.region
    }

    /// Signal the capture thread to stop and wait for it to exit.
    ///
    /// In-flight frame processing at the moment `close` is called runs to
    /// completion; no partially-processed frame is abandoned mid-event.
    pub fn close(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl<C> Drop for CaptureEngine<C> {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn run_capture_loop<C>(capture: &mut Capture<Active>, pipeline: &mut Pipeline<C>, shutdown: &AtomicBool)
where
    C: Send + Sync + 'static,
{
    while !shutdown.load(Ordering::SeqCst) {
        match capture.next_packet() {
            Ok(packet) => {
                if let Some(decoded) = decode_psh_payload(packet.data) {
                    let source: SocketAddr = decoded.source;
                    let destination: SocketAddr = decoded.destination;
                    pipeline.handle_payload(source, destination, decoded.payload);
                }
            },
            Err(pcap::Error::TimeoutExpired) => {
                // Just a chance to re-check `shutdown`; not a real error.
            },
            Err(err) => {
                tracing::warn!(error = %err, "capture read failed, stopping capture loop");
                break;
            },
        }
    }
}
