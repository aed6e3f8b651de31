//! Assembler errors

use crate::builder::TransferKind;
use pl330_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Loop count {count} cannot be encoded (valid range: 1-256)")]
    CounterOverflow { count: u64 },

    #[error("Backward jump of {offset} bytes exceeds 255")]
    JumpOverflow { offset: usize },

    #[error("Buffer too small: {required} bytes required, {available} available")]
    BufferCapacity { required: usize, available: usize },

    #[error("Unsupported transfer kind: {0:?}")]
    UnsupportedTransferKind(TransferKind),

    #[error("Transfer size {size} is not a multiple of the {burst_bytes}-byte burst")]
    MisalignedSize { size: u32, burst_bytes: u32 },

    #[error("Peripheral-gated transfer without a peripheral id")]
    MissingPeripheral,

    #[error("Spec error: {0}")]
    Spec(#[from] SpecError),
}

impl AssemblerError {
    /// Errors that can only come from a generator defect, never from caller input
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AssemblerError::JumpOverflow { .. } | AssemblerError::BufferCapacity { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
