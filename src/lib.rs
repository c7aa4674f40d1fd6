//! This is a platform-agnostic Rust driver for the ADS7828 8-channel, 12-bit
//! analog-to-digital converter based on the [`embedded-hal`] traits.
//!
//! [`embedded-hal`]: https://docs.rs/embedded-hal
//!
//! For further details of the device architecture and operation, please refer
//! to the official [`Datasheet`].
//!
//! [`Datasheet`]: https://www.ti.com/lit/gpn/ads7828

#![doc(html_root_url = "https://docs.rs/ads7828/latest")]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

mod command;
pub use command::*;

mod transport;
pub use transport::*;

#[cfg(feature = "async")]
pub mod asynchronous;

pub mod blocking;

#[cfg(test)]
mod fake;

/// Address of the device with A1 and A0 both tied low.
pub const BASE_ADDRESS: u8 = 0b100_1000;

/// Attempts made by a read before it gives up.
pub const MAX_ATTEMPTS: u8 = 3;

/// How long a read waits for the two response bytes, per attempt.
pub const RESPONSE_TIMEOUT_MS: u32 = 100;

/// Interval between polls for the response bytes.
const POLL_INTERVAL_US: u32 = 1_000;

/// A1/A0 pin logic level representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum A1A0 {
    /// A1 and A0 tied to GND (default).
    LowLow,
    /// A1 tied to GND, A0 tied to V+.
    LowHigh,
    /// A1 tied to V+, A0 tied to GND.
    HighLow,
    /// A1 and A0 tied to V+.
    HighHigh,
}

impl Default for A1A0 {
    fn default() -> Self {
        Self::LowLow
    }
}

/// Only the two low bits of the selector are used.
impl From<u8> for A1A0 {
    fn from(selector: u8) -> Self {
        match selector & 0x03 {
            0 => Self::LowLow,
            1 => Self::LowHigh,
            2 => Self::HighLow,
            _ => Self::HighHigh,
        }
    }
}

impl From<A1A0> for u8 {
    fn from(pins: A1A0) -> Self {
        match pins {
            A1A0::LowLow => BASE_ADDRESS,
            A1A0::LowHigh => BASE_ADDRESS | 0b01,
            A1A0::HighLow => BASE_ADDRESS | 0b10,
            A1A0::HighHigh => BASE_ADDRESS | 0b11,
        }
    }
}

/// Ads7828 Errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The shared bus was already in use by the calling context.
    Busy,
    /// The command write was rejected by the bus.
    Bus(E),
    /// The two response bytes did not arrive in time.
    Timeout,
}

/// Combine the two response bytes into the 12-bit conversion result.
#[must_use]
pub fn decode(response: [u8; 2]) -> u16 {
    (u16::from(response[0] & 0x0f) << 8) + u16::from(response[1])
}
