//! Bounded operand types for PL330 instructions
//!
//! Identifiers that the controller encodes in a few bits are validated when
//! they are constructed. The `truncating` constructors keep the controller's
//! own behavior of silently masking out-of-range values, for callers that
//! want it explicitly.

use crate::error::{Result, SpecError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of DMA channel threads
pub const NUM_CHANNELS: u8 = 8;

/// Number of event lines / interrupt outputs
pub const NUM_EVENTS: u8 = 32;

/// Number of peripheral request interfaces
pub const NUM_PERIPHERALS: u8 = 32;

/// Maximum iterations of a single hardware loop
pub const MAX_LOOP_COUNT: u32 = 256;

/// DMA channel thread id (0-7)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct ChannelId(u8);

impl ChannelId {
    pub const fn new(id: u8) -> Result<Self> {
        if id < NUM_CHANNELS {
            Ok(Self(id))
        } else {
            Err(SpecError::InvalidChannel(id))
        }
    }

    /// Keep only the low 3 bits, as the GO encoding does
    pub const fn truncating(id: u8) -> Self {
        Self(id & 0x7)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Event number signalled by `DMASEV` (0-31)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct EventId(u8);

impl EventId {
    pub const fn new(id: u8) -> Result<Self> {
        if id < NUM_EVENTS {
            Ok(Self(id))
        } else {
            Err(SpecError::InvalidEvent(id))
        }
    }

    pub const fn truncating(id: u8) -> Self {
        Self(id & 0x1F)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Peripheral request interface (0-31)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8")]
pub struct PeripheralId(u8);

impl PeripheralId {
    pub const fn new(id: u8) -> Result<Self> {
        if id < NUM_PERIPHERALS {
            Ok(Self(id))
        } else {
            Err(SpecError::InvalidPeripheral(id))
        }
    }

    pub const fn truncating(id: u8) -> Self {
        Self(id & 0x1F)
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }
}

/// Hardware loop counter register (LC0 or LC1)
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopSlot {
    Lc0 = 0,
    Lc1 = 1,
}

impl LoopSlot {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Iteration count of a hardware loop (1-256)
///
/// The controller stores `count - 1` in an 8-bit field, so 256 is the
/// largest count that can be expressed by one `DMALP`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16")]
pub struct LoopCount(u16);

impl LoopCount {
    pub const MAX: Self = Self(MAX_LOOP_COUNT as u16);

    pub const fn new(count: u32) -> Result<Self> {
        if count >= 1 && count <= MAX_LOOP_COUNT {
            Ok(Self(count as u16))
        } else {
            Err(SpecError::InvalidLoopCount(count))
        }
    }

    /// Rebuild a count from its encoded `count - 1` byte
    pub const fn from_encoded(byte: u8) -> Self {
        Self(byte as u16 + 1)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    /// The byte stored in the instruction
    #[inline]
    pub const fn encoded(self) -> u8 {
        (self.0 - 1) as u8
    }
}

// Deserialized operands go through the same range checks as `new`

impl TryFrom<u8> for ChannelId {
    type Error = SpecError;

    fn try_from(id: u8) -> Result<Self> {
        Self::new(id)
    }
}

impl TryFrom<u8> for EventId {
    type Error = SpecError;

    fn try_from(id: u8) -> Result<Self> {
        Self::new(id)
    }
}

impl TryFrom<u8> for PeripheralId {
    type Error = SpecError;

    fn try_from(id: u8) -> Result<Self> {
        Self::new(id)
    }
}

impl TryFrom<u16> for LoopCount {
    type Error = SpecError;

    fn try_from(count: u16) -> Result<Self> {
        Self::new(count as u32)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

impl fmt::Display for LoopSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

impl fmt::Display for LoopCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::value::Error as ValueError;
    use serde::de::IntoDeserializer;

    fn id_from<T: for<'de> Deserialize<'de>>(raw: u8) -> std::result::Result<T, ValueError> {
        T::deserialize(raw.into_deserializer())
    }

    fn count_from(raw: u16) -> std::result::Result<LoopCount, ValueError> {
        LoopCount::deserialize(raw.into_deserializer())
    }

    #[test]
    fn test_channel_bounds() {
        assert_eq!(ChannelId::new(7).unwrap().get(), 7);
        assert_eq!(ChannelId::new(8), Err(SpecError::InvalidChannel(8)));
        assert_eq!(ChannelId::truncating(9).get(), 1);
    }

    #[test]
    fn test_event_and_peripheral_bounds() {
        assert!(EventId::new(31).is_ok());
        assert_eq!(EventId::new(32), Err(SpecError::InvalidEvent(32)));
        assert_eq!(EventId::truncating(33).get(), 1);

        assert!(PeripheralId::new(0).is_ok());
        assert_eq!(PeripheralId::new(40), Err(SpecError::InvalidPeripheral(40)));
        assert_eq!(PeripheralId::truncating(0x3F).get(), 0x1F);
    }

    #[test]
    fn test_loop_count_encoding() {
        assert_eq!(LoopCount::new(1).unwrap().encoded(), 0);
        assert_eq!(LoopCount::new(256).unwrap().encoded(), 255);
        assert_eq!(LoopCount::MAX.get(), 256);
        assert_eq!(LoopCount::from_encoded(255), LoopCount::MAX);
    }

    #[test]
    fn test_loop_count_rejects_out_of_range() {
        assert_eq!(LoopCount::new(0), Err(SpecError::InvalidLoopCount(0)));
        assert_eq!(LoopCount::new(257), Err(SpecError::InvalidLoopCount(257)));
    }

    #[test]
    fn test_deserialize_validates_loop_count() {
        assert_eq!(count_from(1).unwrap().get(), 1);
        assert_eq!(count_from(256).unwrap(), LoopCount::MAX);
        assert!(count_from(0).is_err());
        assert!(count_from(257).is_err());
        assert!(count_from(300).is_err());
    }

    #[test]
    fn test_deserialize_validates_ids() {
        assert_eq!(id_from::<ChannelId>(7).unwrap().get(), 7);
        assert!(id_from::<ChannelId>(9).is_err());
        assert_eq!(id_from::<EventId>(31).unwrap().get(), 31);
        assert!(id_from::<EventId>(40).is_err());
        assert!(id_from::<PeripheralId>(32).is_err());

        let err = id_from::<ChannelId>(9).unwrap_err();
        assert_eq!(err.to_string(), SpecError::InvalidChannel(9).to_string());
    }
}
