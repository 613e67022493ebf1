//! # CRSF Receiver Loop
//!
//! Byte source for the decoder: reads UART chunks, stamps them with the
//! microsecond clock and publishes a [`ChannelSnapshot`] after every
//! non-empty chunk, so channels and diagnostic counters stay current.
//!
//! The decoder is owned by this task alone. Consumers only ever see whole
//! snapshots through the `watch` channel, so a half-updated channel array
//! is never observable.

use tokio::sync::watch;
use tracing::{debug, info};

use super::port_trait::SerialPortIO;
use crate::clock::MicrosClock;
use crate::crsf::decoder::{ChannelSnapshot, CrsfDecoder};
use crate::error::{CrsfRxError, Result};

/// Drives a [`CrsfDecoder`] from a serial port
pub struct CrsfReceiver<C: MicrosClock> {
    decoder: CrsfDecoder,
    clock: C,
    publisher: watch::Sender<ChannelSnapshot>,
    buffer: Vec<u8>,
}

impl<C: MicrosClock> CrsfReceiver<C> {
    /// Create a receiver and the channel its snapshots are published on
    ///
    /// # Arguments
    ///
    /// * `decoder` - Decoder to drive; its state survives reconnects
    /// * `clock` - Timestamp source for received bytes
    /// * `read_buffer_size` - Largest chunk read from the port at once
    pub fn new(decoder: CrsfDecoder, clock: C, read_buffer_size: usize) -> (Self, watch::Receiver<ChannelSnapshot>) {
        let (publisher, subscriber) = watch::channel(decoder.snapshot());

        let receiver = Self {
            decoder,
            clock,
            publisher,
            buffer: vec![0u8; read_buffer_size.max(1)],
        };

        (receiver, subscriber)
    }

    pub fn decoder(&self) -> &CrsfDecoder {
        &self.decoder
    }

    /// Another handle on the snapshot channel
    pub fn subscribe(&self) -> watch::Receiver<ChannelSnapshot> {
        self.publisher.subscribe()
    }

    /// Read one chunk from the port and feed it through the decoder
    ///
    /// Every byte of the chunk is stamped with the time the read completed.
    /// A stale partial frame delivered in the same chunk as the next frame
    /// is therefore not cleared by the frame timeout; the two are
    /// reassembled together and the result fails its CRC.
    ///
    /// # Returns
    ///
    /// * `Result<usize>` - Number of bytes processed, 0 when the port closed
    ///
    /// # Errors
    ///
    /// Returns error if the read fails
    pub async fn poll_once<P: SerialPortIO + ?Sized>(&mut self, port: &mut P) -> Result<usize> {
        let count = port
            .read(&mut self.buffer)
            .await
            .map_err(|e| CrsfRxError::Serial(format!("Failed to read from receiver: {}", e)))?;

        if count == 0 {
            return Ok(0);
        }

        let timestamp_us = self.clock.now_us();

        for &byte in &self.buffer[..count] {
            self.decoder.process_byte(byte, timestamp_us);
        }

        // send_replace keeps working with no subscribers left
        self.publisher.send_replace(self.decoder.snapshot());

        Ok(count)
    }

    /// Process bytes until the port closes or fails
    ///
    /// # Errors
    ///
    /// Returns error on the first failed read
    pub async fn run<P: SerialPortIO + ?Sized>(&mut self, port: &mut P) -> Result<()> {
        info!("CRSF receiver loop started");

        loop {
            let count = self.poll_once(port).await?;
            if count == 0 {
                debug!("Receiver port closed");
                return Ok(());
            }
        }
    }
}
