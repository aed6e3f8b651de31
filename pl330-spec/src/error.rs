//! # Error Types for the PL330 instruction set

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("Invalid channel id: {0} (valid range: 0-7)")]
    InvalidChannel(u8),

    #[error("Invalid event id: {0} (valid range: 0-31)")]
    InvalidEvent(u8),

    #[error("Invalid peripheral id: {0} (valid range: 0-31)")]
    InvalidPeripheral(u8),

    #[error("Invalid loop count: {0} (valid range: 1-256)")]
    InvalidLoopCount(u32),

    #[error("Invalid burst length: {0} (valid range: 1-16)")]
    InvalidBurstLength(u8),

    #[error("Invalid burst size: {0} bytes (must be 1, 2, 4, 8 or 16)")]
    InvalidBurstSize(u32),

    #[error("Invalid cache control: {0:#x} (3-bit field)")]
    InvalidCacheControl(u8),
}

pub type Result<T> = std::result::Result<T, SpecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpecError::InvalidChannel(9);
        assert_eq!(err.to_string(), "Invalid channel id: 9 (valid range: 0-7)");

        let err = SpecError::InvalidLoopCount(257);
        assert_eq!(err.to_string(), "Invalid loop count: 257 (valid range: 1-256)");
    }
}
