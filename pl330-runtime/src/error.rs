//! Runtime error types

use pl330_disassembler::DisassemblerError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Decode error: {0}")]
    Decode(#[from] DisassemblerError),

    #[error("Step limit exceeded: {limit}")]
    StepLimitExceeded { limit: u64 },

    #[error("FIFO underrun at PC {pc:#x}")]
    FifoUnderrun { pc: usize },

    #[error("PC out of range: {pc:#x}")]
    PcOutOfRange { pc: usize },

    #[error("Unexpected {mnemonic} at PC {pc:#x}")]
    UnexpectedInstruction { pc: usize, mnemonic: &'static str },
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit_display() {
        let err = RuntimeError::StepLimitExceeded { limit: 10 };
        assert_eq!(err.to_string(), "Step limit exceeded: 10");
    }

    #[test]
    fn test_unexpected_instruction_display() {
        let err = RuntimeError::UnexpectedInstruction {
            pc: 0x12,
            mnemonic: "DMAGO",
        };
        assert_eq!(err.to_string(), "Unexpected DMAGO at PC 0x12");
    }

    #[test]
    fn test_decode_error_conversion() {
        let err: RuntimeError = DisassemblerError::UnknownOpcode { offset: 3, byte: 0xFF }.into();
        assert!(matches!(err, RuntimeError::Decode(_)));
        assert!(err.to_string().starts_with("Decode error"));
    }
}
