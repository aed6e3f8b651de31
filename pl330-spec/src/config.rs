//! # Channel Control Configuration
//!
//! The channel control register (CCR) describes how each burst moves data:
//! address increment, burst geometry, and the protection and cache
//! attributes of the source and destination bus transactions. Programs
//! load it with `DMAMOV CCR, word` before any load or store.
//!
//! ## Bit layout
//!
//! ```text
//! Bits    Field
//! ────────────────────────────
//! 0       SRCINC
//! 3:1     SRCBRSTSIZE (log2 bytes)
//! 7:4     SRCBRSTLEN  (beats - 1)
//! 8       SRCPRI
//! 9       SRCNS
//! 10      SRCIA
//! 13:11   SRCCCTRL
//! 14      DSTINC
//! 17:15   DSTBRSTSIZE
//! 21:18   DSTBRSTLEN
//! 22      DSTPRI
//! 23      DSTNS
//! 24      DSTIA
//! 27:25   DSTCCTRL
//! 30:28   ENDIAN_SWAP
//! ```

use crate::error::SpecError;
use serde::{Deserialize, Serialize};

pub const CC_SRCINC: u32 = 1 << 0;
pub const CC_DSTINC: u32 = 1 << 14;
pub const CC_SRCPRI: u32 = 1 << 8;
pub const CC_DSTPRI: u32 = 1 << 22;
pub const CC_SRCNS: u32 = 1 << 9;
pub const CC_DSTNS: u32 = 1 << 23;
pub const CC_SRCIA: u32 = 1 << 10;
pub const CC_DSTIA: u32 = 1 << 24;
pub const CC_SRCBRSTLEN_SHIFT: u32 = 4;
pub const CC_DSTBRSTLEN_SHIFT: u32 = 18;
pub const CC_SRCBRSTSIZE_SHIFT: u32 = 1;
pub const CC_DSTBRSTSIZE_SHIFT: u32 = 15;
pub const CC_SRCCCTRL_SHIFT: u32 = 11;
pub const CC_DSTCCTRL_SHIFT: u32 = 25;
pub const CC_SWAP_SHIFT: u32 = 28;

/// Bytes per beat
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurstSize {
    Bytes1 = 0,
    Bytes2 = 1,
    Bytes4 = 2,
    Bytes8 = 3,
    Bytes16 = 4,
}

impl BurstSize {
    pub fn from_bytes(bytes: u32) -> Result<Self, SpecError> {
        match bytes {
            1 => Ok(Self::Bytes1),
            2 => Ok(Self::Bytes2),
            4 => Ok(Self::Bytes4),
            8 => Ok(Self::Bytes8),
            16 => Ok(Self::Bytes16),
            _ => Err(SpecError::InvalidBurstSize(bytes)),
        }
    }

    #[inline]
    pub const fn log2(self) -> u32 {
        self as u32
    }

    #[inline]
    pub const fn bytes(self) -> u32 {
        1 << (self as u32)
    }
}

/// Channel control register contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelControl {
    /// Increment SAR after each beat
    pub src_inc: bool,
    /// Increment DAR after each beat
    pub dst_inc: bool,
    /// Beat width, shared by source and destination
    pub burst_size: BurstSize,
    /// Beats per burst (1-16), shared by source and destination
    pub burst_len: u8,
    /// Privileged bus transactions
    pub privileged: bool,
    /// Non-secure bus transactions
    pub non_secure: bool,
    /// Mark transactions as instruction fetches
    pub insn_access: bool,
    /// AXI cache control for reads (3 bits)
    pub src_cache: u8,
    /// AXI cache control for writes (3 bits)
    pub dst_cache: u8,
    /// Endian swap size (3 bits, 0 = none)
    pub swap: u8,
}

impl ChannelControl {
    /// Incrementing copy, one byte per burst, bufferable on both sides
    pub const fn memory_to_memory() -> Self {
        Self {
            src_inc: true,
            dst_inc: true,
            burst_size: BurstSize::Bytes1,
            burst_len: 1,
            privileged: false,
            non_secure: false,
            insn_access: false,
            src_cache: 1,
            dst_cache: 1,
            swap: 0,
        }
    }

    /// Incrementing source into a fixed peripheral data register.
    ///
    /// Peripheral transfers run non-secure on both sides.
    pub const fn memory_to_peripheral() -> Self {
        Self {
            src_inc: true,
            dst_inc: false,
            burst_size: BurstSize::Bytes1,
            burst_len: 1,
            privileged: false,
            non_secure: true,
            insn_access: false,
            src_cache: 1,
            dst_cache: 1,
            swap: 0,
        }
    }

    pub fn with_burst(mut self, size: BurstSize, len: u8) -> Result<Self, SpecError> {
        if !(1..=16).contains(&len) {
            return Err(SpecError::InvalidBurstLength(len));
        }
        self.burst_size = size;
        self.burst_len = len;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), SpecError> {
        if !(1..=16).contains(&self.burst_len) {
            return Err(SpecError::InvalidBurstLength(self.burst_len));
        }
        for field in [self.src_cache, self.dst_cache, self.swap] {
            if field > 0x7 {
                return Err(SpecError::InvalidCacheControl(field));
            }
        }
        Ok(())
    }

    /// Bytes moved by one DMALD/DMAST pair
    #[inline]
    pub fn burst_bytes(&self) -> u32 {
        self.burst_size.bytes() * self.burst_len as u32
    }

    /// Pack into the 32-bit register value
    pub fn word(&self) -> u32 {
        let mut ccr = 0u32;

        if self.src_inc {
            ccr |= CC_SRCINC;
        }
        if self.dst_inc {
            ccr |= CC_DSTINC;
        }

        // Same protection for both sides
        if self.privileged {
            ccr |= CC_SRCPRI | CC_DSTPRI;
        }
        if self.non_secure {
            ccr |= CC_SRCNS | CC_DSTNS;
        }
        if self.insn_access {
            ccr |= CC_SRCIA | CC_DSTIA;
        }

        let len = (self.burst_len.wrapping_sub(1) & 0xF) as u32;
        ccr |= len << CC_SRCBRSTLEN_SHIFT;
        ccr |= len << CC_DSTBRSTLEN_SHIFT;

        ccr |= self.burst_size.log2() << CC_SRCBRSTSIZE_SHIFT;
        ccr |= self.burst_size.log2() << CC_DSTBRSTSIZE_SHIFT;

        ccr |= (self.src_cache as u32 & 0x7) << CC_SRCCCTRL_SHIFT;
        ccr |= (self.dst_cache as u32 & 0x7) << CC_DSTCCTRL_SHIFT;

        ccr |= (self.swap as u32 & 0x7) << CC_SWAP_SHIFT;

        ccr
    }

    /// Unpack a register value
    pub fn from_word(word: u32) -> Self {
        Self {
            src_inc: word & CC_SRCINC != 0,
            dst_inc: word & CC_DSTINC != 0,
            burst_size: match (word >> CC_SRCBRSTSIZE_SHIFT) & 0x7 {
                0 => BurstSize::Bytes1,
                1 => BurstSize::Bytes2,
                2 => BurstSize::Bytes4,
                3 => BurstSize::Bytes8,
                _ => BurstSize::Bytes16,
            },
            burst_len: ((word >> CC_SRCBRSTLEN_SHIFT) & 0xF) as u8 + 1,
            privileged: word & CC_SRCPRI != 0,
            non_secure: word & CC_SRCNS != 0,
            insn_access: word & CC_SRCIA != 0,
            src_cache: ((word >> CC_SRCCCTRL_SHIFT) & 0x7) as u8,
            dst_cache: ((word >> CC_DSTCCTRL_SHIFT) & 0x7) as u8,
            swap: ((word >> CC_SWAP_SHIFT) & 0x7) as u8,
        }
    }
}

impl Default for ChannelControl {
    fn default() -> Self {
        Self::memory_to_memory()
    }
}
