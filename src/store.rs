//! Durable high score on a byte-addressable non-volatile medium.
//!
//! The medium needs a settle delay after every write before it accepts the
//! next request, so [`PersistentStore::write`] waits it out. Reads go
//! straight through. Nothing guards against a torn record if power drops
//! halfway through [`PersistentStore::save_high_score`].

use core::fmt;

use embedded_hal_async::{
    delay::DelayNs,
    i2c::I2c,
};

/// Default location of the high-score record.
pub const HIGH_SCORE_ADDR: u16 = 0x0000;

/// Write-cycle time of a 24-series EEPROM, in milliseconds.
pub const SETTLE_MS: u32 = 5;

/// 7-bit bus address of a 24-series EEPROM with A0..A2 tied low.
pub const EEPROM_ADDR: u8 = 0x50;

/// Single-byte request/response access to the medium.
#[allow(async_fn_in_trait)]
pub trait ByteStore {
    type Error;

    async fn write(&mut self, address: u16, byte: u8) -> Result<(), Self::Error>;
    async fn read(&mut self, address: u16) -> Result<u8, Self::Error>;
}

/// A byte operation failed on the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreError<E> {
    Read { address: u16, source: E },
    Write { address: u16, source: E },
}

impl<E> StoreError<E> {
    /// Address of the byte operation that failed.
    pub const fn address(&self) -> u16 {
        match self {
            Self::Read { address, .. } | Self::Write { address, .. } => *address,
        }
    }
}

impl<E> fmt::Display for StoreError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { address, .. } => write!(f, "read of byte {address:#06x} failed"),
            Self::Write { address, .. } => write!(f, "write of byte {address:#06x} failed"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for StoreError<E> {}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for StoreError<E> {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Read { address, .. } => defmt::write!(f, "read of byte {=u16:#x} failed", *address),
            Self::Write { address, .. } => defmt::write!(f, "write of byte {=u16:#x} failed", *address),
        }
    }
}

/// High-score record on top of a [`ByteStore`].
pub struct PersistentStore<B, D> {
    bytes: B,
    delay: D,
    base: u16,
    settle_ms: u32,
}

impl<B: ByteStore, D: DelayNs> PersistentStore<B, D> {
    pub const fn new(bytes: B, delay: D) -> Self {
        Self {
            bytes,
            delay,
            base: HIGH_SCORE_ADDR,
            settle_ms: SETTLE_MS,
        }
    }

    #[must_use]
    pub const fn with_base_address(mut self, base: u16) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub const fn with_settle_ms(mut self, settle_ms: u32) -> Self {
        self.settle_ms = settle_ms;
        self
    }

    pub const fn base_address(&self) -> u16 {
        self.base
    }

    pub fn into_inner(self) -> (B, D) {
        (self.bytes, self.delay)
    }

    /// Write one byte and hold the caller until the medium has settled.
    pub async fn write(&mut self, address: u16, byte: u8) -> Result<(), StoreError<B::Error>> {
        self.bytes
            .write(address, byte)
            .await
            .map_err(|source| StoreError::Write { address, source })?;
        self.delay.delay_ms(self.settle_ms).await;
        Ok(())
    }

    pub async fn read(&mut self, address: u16) -> Result<u8, StoreError<B::Error>> {
        self.bytes
            .read(address)
            .await
            .map_err(|source| StoreError::Read { address, source })
    }

    /// Store `score` least-significant byte first.
    ///
    /// Stops at the first failed byte, leaving the earlier bytes written.
    pub async fn save_high_score(&mut self, score: u32) -> Result<(), StoreError<B::Error>> {
        for (i, byte) in score.to_le_bytes().into_iter().enumerate() {
            self.write(self.base.wrapping_add(i as u16), byte).await?;
        }
        debug!("high score {} saved at {=u16:#x}", score, self.base);
        Ok(())
    }

    pub async fn get_high_score(&mut self) -> Result<u32, StoreError<B::Error>> {
        let mut bytes = [0_u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = self.read(self.base.wrapping_add(i as u16)).await?;
        }
        Ok(u32::from_le_bytes(bytes))
    }
}

/// 24-series I2C EEPROM with 16-bit memory addressing.
pub struct Eeprom<I2C> {
    i2c: I2C,
    device: u8,
}

impl<I2C: I2c> Eeprom<I2C> {
    pub const fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            device: EEPROM_ADDR,
        }
    }

    #[must_use]
    pub const fn with_device_address(mut self, device: u8) -> Self {
        self.device = device;
        self
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> ByteStore for Eeprom<I2C> {
    type Error = I2C::Error;

    async fn write(&mut self, address: u16, byte: u8) -> Result<(), Self::Error> {
        let [hi, lo] = address.to_be_bytes();
        self.i2c.write(self.device, &[hi, lo, byte]).await
    }

    async fn read(&mut self, address: u16) -> Result<u8, Self::Error> {
        let mut byte = [0_u8];
        self.i2c
            .write_read(self.device, &address.to_be_bytes(), &mut byte)
            .await?;
        Ok(byte[0])
    }
}
