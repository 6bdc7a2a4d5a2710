//! `wiresniff` binary: a thin CLI front end over [`wiresniff_app::Sniffer`].
//!
//! ```bash
//! # List capture-capable devices
//! wiresniff --list-devices
//!
//! # Capture on a device against the Global region's opcode tables
//! wiresniff --device eth0 --region global
//! ```

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use wiresniff_app::{Region, Sniffer};

/// Passive capture of the MMO protocol sniffer's well-known port ranges.
#[derive(Parser, Debug)]
#[command(name = "wiresniff")]
#[command(about = "Passive sniffer for the FFXIV-family network protocol")]
#[command(version)]
struct Args {
    /// Capture device to open (see `--list-devices` for valid names).
    #[arg(short, long)]
    device: Option<String>,

    /// Deployment region whose opcode and constants tables to load.
    #[arg(short, long, value_enum, default_value_t = RegionArg::Global)]
    region: RegionArg,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// List capture-capable devices and exit.
    #[arg(long)]
    list_devices: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RegionArg {
    Global,
    Chinese,
    Korean,
}

impl From<RegionArg> for Region {
    fn from(value: RegionArg) -> Self {
        match value {
            RegionArg::Global => Self::Global,
            RegionArg::Chinese => Self::Chinese,
            RegionArg::Korean => Self::Korean,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry().with(fmt::layer()).with(filter).init();

    if args.list_devices {
        #[allow(clippy::print_stdout, reason = "device listing is the command's entire output")]
        for device in wiresniff_app::list_devices()? {
            println!("{}\t{}", device.name, device.desc.as_deref().unwrap_or(""));
        }
        return Ok(());
    }

    let Some(device) = args.device else {
        tracing::error!("--device is required unless --list-devices is passed");
        std::process::exit(2);
    };

    let mut sniffer = Sniffer::new(args.region.into());
    sniffer.open(&device).await?;
    tracing::info!(device = %device, region = ?args.region, "capturing");

    let events = sniffer.events()?;
    let mut messages = events.subscribe_message();
    let mut errors = events.subscribe_error();

    loop {
        tokio::select! {
            Ok(message) = messages.recv() => {
                tracing::debug!(name = %message.name, "message");
            }
            Ok(err) = errors.recv() => {
                tracing::warn!(error = %err.message, "frame processing error");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    sniffer.close();
    Ok(())
}
