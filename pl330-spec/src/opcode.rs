//! # PL330 Opcode Definitions
//!
//! Base opcode bytes for the instructions the microcode generator uses.
//! Mode bits (loop slot, burst condition, security) are OR-ed into the
//! base byte by the encoder; every instruction has a fixed length that does
//! not depend on its operands.
//!
//! ## Lengths
//!
//! - 1 byte: DMAEND, DMALD, DMAST
//! - 2 bytes: DMALP, DMALPEND, DMALDP, DMASTP, DMAFLUSHP, DMAWFP, DMASEV
//! - 6 bytes: DMAMOV, DMAGO

use serde::{Deserialize, Serialize};

/// Instruction opcode (base byte, mode bits clear)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// DMAEND: channel thread stops
    End = 0x00,
    /// DMALD[S|B]: load one burst from SAR into the FIFO
    Ld = 0x04,
    /// DMAST[S|B]: store one burst from the FIFO to DAR
    St = 0x08,
    /// DMALP: load a loop counter
    Lp = 0x20,
    /// DMALDP<S|B>: load gated by a peripheral request
    Ldp = 0x25,
    /// DMALPEND[S|B]: decrement loop counter and jump back
    LpEnd = 0x28,
    /// DMASTP<S|B>: store gated by a peripheral request
    Stp = 0x29,
    /// DMAWFP: wait for a peripheral request
    Wfp = 0x30,
    /// DMASEV: signal an event / interrupt
    Sev = 0x34,
    /// DMAFLUSHP: flush peripheral request state
    FlushP = 0x35,
    /// DMAGO: start a channel thread (debug instruction only)
    Go = 0xA0,
    /// DMAMOV: move a 32-bit immediate into SAR, CCR or DAR
    Mov = 0xBC,
}

impl Opcode {
    /// Encoded length in bytes
    pub const fn size(self) -> usize {
        match self {
            Opcode::End | Opcode::Ld | Opcode::St => 1,
            Opcode::Lp
            | Opcode::LpEnd
            | Opcode::Ldp
            | Opcode::Stp
            | Opcode::FlushP
            | Opcode::Wfp
            | Opcode::Sev => 2,
            Opcode::Mov | Opcode::Go => 6,
        }
    }

    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Controller mnemonic without mode suffixes
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::End => "DMAEND",
            Opcode::Ld => "DMALD",
            Opcode::St => "DMAST",
            Opcode::Lp => "DMALP",
            Opcode::Ldp => "DMALDP",
            Opcode::LpEnd => "DMALPEND",
            Opcode::Stp => "DMASTP",
            Opcode::Wfp => "DMAWFP",
            Opcode::Sev => "DMASEV",
            Opcode::FlushP => "DMAFLUSHP",
            Opcode::Go => "DMAGO",
            Opcode::Mov => "DMAMOV",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values() {
        assert_eq!(Opcode::End.to_u8(), 0x00);
        assert_eq!(Opcode::Mov.to_u8(), 0xBC);
        assert_eq!(Opcode::Go.to_u8(), 0xA0);
        assert_eq!(Opcode::FlushP.to_u8(), 0x35);
    }

    #[test]
    fn test_opcode_sizes() {
        assert_eq!(Opcode::End.size(), 1);
        assert_eq!(Opcode::Ld.size(), 1);
        assert_eq!(Opcode::Lp.size(), 2);
        assert_eq!(Opcode::LpEnd.size(), 2);
        assert_eq!(Opcode::Mov.size(), 6);
        assert_eq!(Opcode::Go.size(), 6);
    }
}
