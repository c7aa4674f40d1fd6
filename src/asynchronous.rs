//! Ads7828 Async API

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;

use super::{
    decode, AsyncTransport, Command, Error, Mode, PowerDown, A1A0, MAX_ATTEMPTS, POLL_INTERVAL_US, RESPONSE_TIMEOUT_MS,
};

/// ADS7828 asynchronous device driver
///
/// Acquiring the async mutex cannot fail, so reads never report
/// [`Error::Busy`].
pub struct Ads7828<'a, M: RawMutex, T: AsyncTransport, DELAY: embedded_hal_async::delay::DelayNs> {
    /// The shared bus, owned by the caller
    bus: &'a Mutex<M, T>,

    /// The concrete [`embedded_hal_async::delay::DelayNs`] implementation
    delay: DELAY,

    /// The I2C address.
    pub(crate) addr: u8,

    power_down: PowerDown,
}

impl<'a, M: RawMutex, T: AsyncTransport, DELAY: embedded_hal_async::delay::DelayNs> Ads7828<'a, M, T, DELAY> {
    /// Create a new ADS7828 instance and start the bus.
    ///
    /// A failing start-up is logged and the driver is returned anyway.
    pub async fn new_async(bus: &'a Mutex<M, T>, delay: DELAY, pins: A1A0) -> Self {
        let addr: u8 = pins.into();

        {
            let mut transport = bus.lock().await;
            debug!("starting ADS7828 at {=u8:#x}", addr);
            if transport.start().await.is_err() {
                error!("bus start-up failed for ADS7828 at {=u8:#x}", addr);
            }
        }

        Self {
            bus,
            delay,
            addr,
            power_down: PowerDown::default(),
        }
    }

    /// Create a new ADS7828 instance with A1 and A0 tied to GND, resulting in
    /// an instance responding to address `0x48`.
    pub async fn new_async_with_default_address(bus: &'a Mutex<M, T>, delay: DELAY) -> Self {
        Self::new_async(bus, delay, A1A0::default()).await
    }

    /// Destroy the driver instance, return the delay provider.
    pub fn release(self) -> DELAY {
        self.delay
    }

    /// The 7-bit I2C address this instance talks to.
    pub fn address(&self) -> u8 {
        self.addr
    }

    /// Power-down selection sent with every command.
    pub fn power_down(&self) -> PowerDown {
        self.power_down
    }

    /// Change the power-down selection used by subsequent reads.
    pub fn set_power_down(&mut self, power_down: PowerDown) {
        self.power_down = power_down;
    }

    /// Read single-ended channel `channel` (0..=7, higher bits are ignored).
    ///
    /// # Errors
    ///
    /// The error of the last attempt once all attempts have failed
    pub async fn read_single_ended(&mut self, channel: u8) -> Result<u16, Error<T::Error>> {
        self.read(Mode::SingleEnded, channel).await
    }

    /// Read differential pair `channel` (0..=7, higher bits are ignored).
    ///
    /// # Errors
    ///
    /// The error of the last attempt once all attempts have failed
    pub async fn read_differential(&mut self, channel: u8) -> Result<u16, Error<T::Error>> {
        self.read(Mode::Differential, channel).await
    }

    /// Read `channel` in the given input mode, retrying up to
    /// [`MAX_ATTEMPTS`] times without backoff.
    ///
    /// # Errors
    ///
    /// The error of the last attempt once all attempts have failed
    pub async fn read(&mut self, mode: Mode, channel: u8) -> Result<u16, Error<T::Error>> {
        let command: u8 = Command::conversion(mode, channel, self.power_down).into();

        let mut last = Error::Timeout;
        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(command).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("attempt {=u8} of command {=u8:#x} failed", attempt, command);
                    last = e;
                }
            }
        }

        error!(
            "ADS7828 at {=u8:#x}: read failed after {=u8} attempts",
            self.addr, MAX_ATTEMPTS
        );
        Err(last)
    }

    /// Read all eight single-ended channels in order.
    ///
    /// # Errors
    ///
    /// The error of the first channel whose attempts all failed
    pub async fn read_all_single_ended(&mut self) -> Result<[u16; 8], Error<T::Error>> {
        self.read_all(Mode::SingleEnded).await
    }

    /// Read all eight differential pairs in order.
    ///
    /// # Errors
    ///
    /// The error of the first pair whose attempts all failed
    pub async fn read_all_differential(&mut self) -> Result<[u16; 8], Error<T::Error>> {
        self.read_all(Mode::Differential).await
    }

    async fn read_all(&mut self, mode: Mode) -> Result<[u16; 8], Error<T::Error>> {
        let mut values = [0; 8];
        for (channel, value) in (0u8..).zip(values.iter_mut()) {
            *value = self.read(mode, channel).await?;
        }
        Ok(values)
    }

    async fn attempt(&mut self, command: u8) -> Result<u16, Error<T::Error>> {
        let addr = self.addr;
        let mut transport = self.bus.lock().await;

        transport.transmit(addr, &[command]).await.map_err(|e| {
            error!("ADS7828 at {=u8:#x} rejected command", addr);
            Error::Bus(e)
        })?;

        transport.request(addr, 2).await;

        let mut waited_us = 0;
        while transport.available() < 2 {
            if waited_us >= RESPONSE_TIMEOUT_MS * 1_000 {
                error!("ADS7828 at {=u8:#x} did not respond", addr);
                return Err(Error::Timeout);
            }
            self.delay.delay_us(POLL_INTERVAL_US).await;
            waited_us += POLL_INTERVAL_US;
        }

        match (transport.read_byte(), transport.read_byte()) {
            (Some(msb), Some(lsb)) => Ok(decode([msb, lsb])),
            _ => Err(Error::Timeout),
        }
    }
}
