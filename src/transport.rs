//! Bus transport contract used by the drivers, and its `embedded-hal` adapter.

/// Receive buffer size of [`I2cTransport`].
pub const BUFFER_LEN: usize = 32;

/// Minimal two-wire bus contract needed to talk to the ADS7828.
///
/// Reads are split into a request, which clocks bytes in from the device,
/// and byte-wise draining of whatever arrived. This lets the driver bound
/// the wait for a response independently of the bus implementation.
pub trait Transport {
    /// Error reported by a failed write transaction.
    type Error: core::fmt::Debug;

    /// Bring the bus up. Called once while the driver is being created.
    ///
    /// # Errors
    ///
    /// `Self::Error` when the bus cannot be started
    fn start(&mut self) -> Result<(), Self::Error>;

    /// Write `bytes` to `address` as a single transaction.
    ///
    /// # Errors
    ///
    /// `Self::Error` when the transaction is not acknowledged
    fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Request `len` bytes from `address`, returning how many were received.
    fn request(&mut self, address: u8, len: usize) -> usize;

    /// Number of received bytes not yet read.
    fn available(&mut self) -> usize;

    /// Take the next received byte.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Async flavour of [`Transport`].
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait AsyncTransport {
    /// Error reported by a failed write transaction.
    type Error: core::fmt::Debug;

    /// Bring the bus up. Called once while the driver is being created.
    ///
    /// # Errors
    ///
    /// `Self::Error` when the bus cannot be started
    async fn start(&mut self) -> Result<(), Self::Error>;

    /// Write `bytes` to `address` as a single transaction.
    ///
    /// # Errors
    ///
    /// `Self::Error` when the transaction is not acknowledged
    async fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Request `len` bytes from `address`, returning how many were received.
    async fn request(&mut self, address: u8, len: usize) -> usize;

    /// Number of received bytes not yet read.
    fn available(&mut self) -> usize;

    /// Take the next received byte.
    fn read_byte(&mut self) -> Option<u8>;
}

/// [`Transport`] over an `embedded-hal` I2C bus.
///
/// `request` performs one I2C read into an internal buffer. A failed read
/// leaves nothing available, so the driver sees it as a missing response.
pub struct I2cTransport<I2C> {
    /// The concrete I2C bus implementation
    i2c: I2C,

    buf: [u8; BUFFER_LEN],
    len: usize,
    pos: usize,
}

impl<I2C> I2cTransport<I2C> {
    /// Wrap an I2C bus.
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            buf: [0; BUFFER_LEN],
            len: 0,
            pos: 0,
        }
    }

    /// Destroy the transport, return the I2C bus instance.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    fn begin_receive(&mut self, len: usize) -> usize {
        self.len = 0;
        self.pos = 0;
        len.min(BUFFER_LEN)
    }

    fn pending(&self) -> usize {
        self.len - self.pos
    }

    fn next_byte(&mut self) -> Option<u8> {
        if self.pos < self.len {
            let byte = self.buf[self.pos];
            self.pos += 1;
            Some(byte)
        } else {
            None
        }
    }
}

impl<I2C: embedded_hal::i2c::I2c> Transport for I2cTransport<I2C> {
    type Error = I2C::Error;

    fn start(&mut self) -> Result<(), Self::Error> {
        // The HAL has configured the peripheral by the time we own it.
        Ok(())
    }

    fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes)
    }

    fn request(&mut self, address: u8, len: usize) -> usize {
        let len = self.begin_receive(len);
        match self.i2c.read(address, &mut self.buf[..len]) {
            Ok(()) => self.len = len,
            Err(_) => debug!("i2c read from {=u8:#x} failed", address),
        }
        self.len
    }

    fn available(&mut self) -> usize {
        self.pending()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.next_byte()
    }
}

#[cfg(feature = "async")]
impl<I2C: embedded_hal_async::i2c::I2c> AsyncTransport for I2cTransport<I2C> {
    type Error = I2C::Error;

    async fn start(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn transmit(&mut self, address: u8, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(address, bytes).await
    }

    async fn request(&mut self, address: u8, len: usize) -> usize {
        let len = self.begin_receive(len);
        match self.i2c.read(address, &mut self.buf[..len]).await {
            Ok(()) => self.len = len,
            Err(_) => debug!("i2c read from {=u8:#x} failed", address),
        }
        self.len
    }

    fn available(&mut self) -> usize {
        self.pending()
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.next_byte()
    }
}
