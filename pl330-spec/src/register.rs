//! Channel registers and controller register map

use serde::{Deserialize, Serialize};
use std::fmt;

/// Channel register written by `DMAMOV`
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveTarget {
    /// Source address register
    Sar = 0,
    /// Channel control register
    Ccr = 1,
    /// Destination address register
    Dar = 2,
}

impl MoveTarget {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Sar),
            1 => Some(Self::Ccr),
            2 => Some(Self::Dar),
            _ => None,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Sar => "SAR",
            Self::Ccr => "CCR",
            Self::Dar => "DAR",
        }
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Controller instance used for memory-to-memory transfers
pub const DMA_MEM_BASE: u32 = 0xFA20_0000;

/// Controller instance wired to the peripheral request lines
pub const DMA_PERI_BASE: u32 = 0xE090_0000;

/// Debug command register (offset from controller base)
pub const DBGCMD: u32 = 0xD04;

/// Debug instruction register 0: thread select and first two instruction bytes
pub const DBGINST0: u32 = 0xD08;

/// Debug instruction register 1: instruction bytes 2-5
pub const DBGINST1: u32 = 0xD0C;

/// `DBGCMD` value that executes the instruction held in `DBGINST0/1`
pub const DBGCMD_EXECUTE: u32 = 0;
