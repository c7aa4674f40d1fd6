#![allow(missing_docs)]
use bilge::prelude::*;

/// Command byte written to the device ahead of every conversion.
///
/// ```text
/// bit 7    SD       single-ended / differential
/// bit 6..4 C2..C0   channel select
/// bit 3..2 PD1..PD0 power-down selection
/// bit 1..0 unused
/// ```
#[bitsize(8)]
#[derive(DebugBits, FromBits, PartialEq)]
pub struct Command {
    reserved0_1: u2,

    /// Power-down selection
    pub power_down: PowerDown,

    /// Channel select, in the device's bit order
    pub channel_select: u3,

    /// Input mode
    pub mode: Mode,
}

impl Default for Command {
    fn default() -> Self {
        Self::from(0b1000_0100)
    }
}

impl Command {
    /// Build the command for a conversion on `channel`.
    ///
    /// Only the low three bits of `channel` are used. In single-ended mode
    /// they name one of CH0..CH7, in differential mode one of the eight
    /// ordered input pairs.
    #[must_use]
    pub fn conversion(mode: Mode, channel: u8, power_down: PowerDown) -> Self {
        Self::from(0)
            .with_mode(mode)
            .with_channel(channel)
            .with_power_down(power_down)
    }

    /// Configure input mode.
    #[must_use]
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.set_mode(mode);
        Self::from(self.value)
    }

    /// Configure channel, given as the logical channel number.
    #[must_use]
    pub fn with_channel(mut self, channel: u8) -> Self {
        self.set_channel_select(Self::channel_bits(channel));
        Self::from(self.value)
    }

    /// Configure power-down selection.
    #[must_use]
    pub fn with_power_down(mut self, power_down: PowerDown) -> Self {
        self.set_power_down(power_down);
        Self::from(self.value)
    }

    /// C2 takes bit 0 of the channel number, C1 bit 2 and C0 bit 1.
    fn channel_bits(channel: u8) -> u3 {
        let channel = channel & 0x07;
        u3::new((channel >> 1) | ((channel & 0x01) << 2))
    }
}

/// Input mode.
#[bitsize(1)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Channel pairs measured against each other.
    Differential,

    /// Each channel measured against COM.
    SingleEnded,
}

/// Power-down selection between conversions.
#[bitsize(2)]
#[derive(Debug, Clone, Copy, FromBits, PartialEq, PartialOrd)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerDown {
    /// Power down the reference and the converter after each conversion.
    BetweenConversions,

    /// Internal reference off, converter on (default).
    ReferenceOffConverterOn,

    /// Internal reference on, converter off.
    ReferenceOnConverterOff,

    /// Internal reference on, converter on.
    ReferenceOnConverterOn,
}

impl Default for PowerDown {
    fn default() -> Self {
        Self::ReferenceOffConverterOn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command() {
        let cmd = Command::default();
        assert_eq!(cmd.value, 0x84);
        assert_eq!(cmd.mode(), Mode::SingleEnded);
        assert_eq!(cmd.power_down(), PowerDown::ReferenceOffConverterOn);
    }

    #[test]
    fn single_ended_channel_map() {
        let expected = [0x84, 0xc4, 0x94, 0xd4, 0xa4, 0xe4, 0xb4, 0xf4];

        for (channel, byte) in expected.iter().enumerate() {
            let cmd = Command::conversion(Mode::SingleEnded, channel as u8, PowerDown::default());
            assert_eq!(u8::from(cmd), *byte, "channel {channel}");
        }
    }

    #[test]
    fn only_low_three_channel_bits_matter() {
        for channel in 0..=u8::MAX {
            let masked = Command::conversion(Mode::SingleEnded, channel & 0x07, PowerDown::default());
            let raw = Command::conversion(Mode::SingleEnded, channel, PowerDown::default());
            assert_eq!(raw, masked);
        }
    }

    #[test]
    fn modes_differ_only_in_sd_bit() {
        for channel in 0..8 {
            let single: u8 = Command::conversion(Mode::SingleEnded, channel, PowerDown::default()).into();
            let diff: u8 = Command::conversion(Mode::Differential, channel, PowerDown::default()).into();
            assert_eq!(single ^ diff, 0x80);
        }
    }

    #[test]
    fn modify_power_down() {
        let cmd = Command::default().with_power_down(PowerDown::BetweenConversions);
        assert_eq!(cmd.value, 0x80);

        let cmd = Command::default().with_power_down(PowerDown::ReferenceOnConverterOff);
        assert_eq!(cmd.value, 0x88);

        let cmd = Command::default().with_power_down(PowerDown::ReferenceOnConverterOn);
        assert_eq!(cmd.value, 0x8c);
    }

    #[test]
    fn mode_and_power_down_are_reused_across_commands() {
        let mode = Mode::Differential;
        let power_down = PowerDown::ReferenceOnConverterOn;

        let first = Command::conversion(mode, 0, power_down);
        let second = Command::conversion(mode, 1, power_down);

        assert_eq!(first.mode(), mode);
        assert_eq!(second.power_down(), power_down);
        assert_eq!(u8::from(first), 0x0c);
        assert_eq!(u8::from(second), 0x4c);
    }

    #[test]
    fn differential_pair_select() {
        let cmd = Command::conversion(Mode::Differential, 3, PowerDown::default());
        assert_eq!(cmd.value, 0x54);
        assert_eq!(cmd.channel_select().value(), 0b101);
    }
}
