//! # Compiled Microcode Program
//!
//! The byte stream a channel thread fetches, plus the attributes its
//! `DMAGO` kick needs.

use crate::instruction::Instruction;
use crate::operand::{ChannelId, EventId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A complete, exactly sized microcode program
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Encoded instruction stream
    pub code: Vec<u8>,

    /// Channel thread the program is meant to run on
    pub channel: ChannelId,

    /// Event signalled on completion
    pub event: EventId,

    /// Start the thread in the non-secure state
    pub non_secure: bool,
}

impl Program {
    pub fn new(code: Vec<u8>, channel: ChannelId, event: EventId, non_secure: bool) -> Self {
        Self {
            code,
            channel,
            event,
            non_secure,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    /// The `DMAGO` that starts this program once it sits at `address`
    pub fn kick(&self, address: u32) -> Instruction {
        Instruction::Go {
            channel: self.channel,
            address,
            non_secure: self.non_secure,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "PL330 program: {} bytes, {}, event {}, {}",
            self.code.len(),
            self.channel,
            self.event.get(),
            if self.non_secure { "non-secure" } else { "secure" }
        )?;
        for (row, chunk) in self.code.chunks(16).enumerate() {
            write!(f, "  {:04x}:", row * 16)?;
            for byte in chunk {
                write!(f, " {:02x}", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kick_carries_attributes() {
        let channel = ChannelId::new(3).unwrap();
        let program = Program::new(vec![0x00], channel, EventId::default(), true);
        assert_eq!(
            program.kick(0x2000_0000),
            Instruction::Go {
                channel,
                address: 0x2000_0000,
                non_secure: true,
            }
        );
    }

    #[test]
    fn test_display_hex_dump() {
        let program = Program::new(vec![0x34, 0x00, 0x00], ChannelId::default(), EventId::default(), false);
        let text = program.to_string();
        assert!(text.contains("3 bytes"));
        assert!(text.contains("0000: 34 00 00"));
        assert!(text.contains(", secure"));
        assert!(!text.contains("non-secure"));
    }
}
