//! # CRSF RX
//!
//! Serial channel monitor for a CRSF (Crossfire) receiver.
//!
//! Reads the receiver UART, decodes RC channels frames and prints the
//! channel values while the link is up.

use anyhow::Result;
use tokio::sync::watch;
use tokio::time::{interval, sleep, Duration};
use tracing::{info, warn};

use crsf_rx::clock::{MicrosClock, MonotonicClock};
use crsf_rx::config::Config;
use crsf_rx::crsf::decoder::{ChannelSnapshot, CrsfDecoder};
use crsf_rx::serial::{CrsfReceiver, CrsfSerial};
use crsf_rx::telemetry::{render_line, LinkState, LinkTransition};

/// Main entry point for CRSF RX
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging on a non-blocking stderr writer
///    - Load configuration (first argument, defaults otherwise)
///
/// 2. **Receiver task**
///    - Open the receiver UART and feed every byte to the decoder
///    - On failure wait `reconnect_interval_ms` and reopen
///    - On shutdown, log the final decoder stats
///
/// 3. **Monitor loop**
///    - Every `print_interval_ms`, print the channels while connected
///      (JSONL records are emitted in both link states)
///    - Log link acquired/lost transitions
///    - Handle Ctrl+C for graceful shutdown
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
///
/// Expected output:
/// ```text
/// INFO crsf_rx::serial: Opened CRSF receiver at /dev/ttyUSB0 (420000 baud)
/// INFO crsf_rx: CRSF link acquired
/// CH: 1501 1501  988 1501 1501 1501 1501 1501
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only channel lines
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("CRSF RX v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => {
            info!("Loading configuration from {}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };

    let clock = MonotonicClock::new();
    let decoder = CrsfDecoder::new(config.crsf.decoder_config());
    let (receiver, snapshots) = CrsfReceiver::new(decoder, clock, config.serial.read_buffer_size);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let receiver_task = tokio::spawn(receive_forever(receiver, config.clone(), shutdown_rx));

    monitor(snapshots, clock, &config).await;

    shutdown_tx.send_replace(true);
    receiver_task.await?;
    Ok(())
}

/// Keep the receiver running across port failures until shutdown
///
/// Logs the final counters from the decoder it owns before returning.
async fn receive_forever(
    mut receiver: CrsfReceiver<MonotonicClock>,
    config: Config,
    mut shutdown: watch::Receiver<bool>,
) {
    let retry = Duration::from_millis(config.serial.reconnect_interval_ms);

    loop {
        match CrsfSerial::open(&config.serial.port, config.serial.baud_rate) {
            Ok(serial) => {
                info!("Receiving CRSF from {}", serial.device_path());
                let mut port = serial.into_port();

                let outcome = tokio::select! {
                    result = receiver.run(&mut port) => Some(result),
                    _ = shutdown.changed() => None,
                };

                match outcome {
                    Some(Ok(())) => warn!("Receiver port closed, reconnecting"),
                    Some(Err(e)) => warn!("Receiver failed: {}, reconnecting", e),
                    None => break,
                }
            }
            Err(e) => warn!("{}", e),
        }

        tokio::select! {
            _ = sleep(retry) => {}
            _ = shutdown.changed() => break,
        }
    }

    info!("Decoder stats: {:?}", receiver.decoder().stats());
}

/// Print channel lines until Ctrl+C
async fn monitor(snapshots: watch::Receiver<ChannelSnapshot>, clock: MonotonicClock, config: &Config) {
    let link_timeout_us = config.crsf.link_timeout_us();
    let shown = config.monitor.channels_shown;
    let mut print_interval = interval(Duration::from_millis(config.monitor.print_interval_ms));
    let mut link = LinkState::new();

    info!("Printing channels every {}ms", config.monitor.print_interval_ms);
    info!("Press Ctrl+C to exit");

    loop {
        tokio::select! {
            _ = print_interval.tick() => {
                let snapshot = *snapshots.borrow();
                let connected = snapshot.is_connected(clock.now_us(), link_timeout_us);

                match link.update(connected) {
                    Some(LinkTransition::Acquired) => info!("CRSF link acquired"),
                    Some(LinkTransition::Lost) => warn!("CRSF link lost, holding last channel values"),
                    None => {}
                }

                match render_line(config.monitor.format, &snapshot, connected, shown, chrono::Utc::now()) {
                    Ok(Some(line)) => println!("{}", line),
                    Ok(None) => {}
                    Err(e) => warn!("{}", e),
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }
}
