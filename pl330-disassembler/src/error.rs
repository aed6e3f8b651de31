//! Disassembler errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisassemblerError {
    #[error("Unknown opcode 0x{byte:02X} at offset {offset:#x}")]
    UnknownOpcode { offset: usize, byte: u8 },

    #[error("Truncated instruction at offset {offset:#x}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Invalid operand 0x{byte:02X} at offset {offset:#x}")]
    InvalidOperand { offset: usize, byte: u8 },
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
