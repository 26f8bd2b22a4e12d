// src/hal/device.rs
//! EGG-D800 device facade
//!
//! Owns the transport plus the three register blocks and keeps them in
//! step with the hardware: every mutating convenience method stages the
//! new value into the block image and immediately transmits the complete
//! report.

use tracing::info;

use crate::error::EggResult;
use crate::hal::afe::AfeRegisters;
use crate::hal::codec::CodecRegisters;
use crate::hal::gpio::GpioPins;
use crate::hal::transport::HidTransport;

/// A connected EGG-D800.
#[derive(Debug)]
pub struct EggD800<T: HidTransport> {
    transport: T,
    /// Analog front end (report 1).
    pub afe: AfeRegisters,
    /// Audio codec controls (report 3).
    pub codec: CodecRegisters,
    /// GPIO pins (report 4).
    pub gpio: GpioPins,
}

impl<T: HidTransport> EggD800<T> {
    /// Open a device over the given transport, reading all register
    /// blocks to mirror the hardware state.
    pub fn open(mut transport: T) -> EggResult<Self> {
        let afe = AfeRegisters::read(&mut transport)?;
        let codec = CodecRegisters::read(&mut transport)?;
        let gpio = GpioPins::read(&mut transport)?;
        info!(
            num_channels = afe.num_channels(),
            data_rate = afe.data_rate(),
            "device opened"
        );
        Ok(Self {
            transport,
            afe,
            codec,
            gpio,
        })
    }

    /// Re-read every register block from the hardware.
    pub fn refresh(&mut self) -> EggResult<()> {
        self.afe = AfeRegisters::read(&mut self.transport)?;
        self.codec = CodecRegisters::read(&mut self.transport)?;
        self.gpio = GpioPins::read(&mut self.transport)?;
        Ok(())
    }

    /// Total data rate in Hz.
    pub fn data_rate(&self) -> u32 {
        self.afe.data_rate()
    }

    /// Set the total data rate and transmit the AFE block.
    pub fn set_data_rate(&mut self, rate: u32) -> EggResult<()> {
        self.afe.set_data_rate(rate)?;
        self.afe.write(&mut self.transport)
    }

    /// Active channel count.
    pub fn num_channels(&self) -> u32 {
        self.afe.num_channels()
    }

    /// Set the channel count and transmit the AFE block.
    pub fn set_num_channels(&mut self, count: u32) -> EggResult<()> {
        self.afe.set_num_channels(count)?;
        self.afe.write(&mut self.transport)
    }

    /// Select hardware input channels by index and transmit the AFE
    /// block. Pattern words and channel count go out together.
    pub fn select_channels(&mut self, indexes: &[usize]) -> EggResult<()> {
        self.afe.select_channels(indexes)?;
        self.afe.write(&mut self.transport)
    }

    /// Transmit the staged codec block.
    pub fn write_codec(&mut self) -> EggResult<()> {
        self.codec.write(&mut self.transport)
    }

    /// Transmit the staged GPIO block.
    pub fn write_gpio(&mut self) -> EggResult<()> {
        self.gpio.write(&mut self.transport)
    }
}
