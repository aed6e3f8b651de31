//! # PL330 DMA Microcode Specification
//!
//! Instruction set definition for the ARM PL330 DMA controller as used by the
//! microcode generator.
//!
//! ## Key Features
//! - Byte-addressed, variable length instructions (1, 2 or 6 bytes)
//! - Two hardware loop counters, 8-bit counts and 8-bit backward jumps
//! - Eight channel threads, 32 events, 32 peripheral request interfaces
//! - Channel control word describing burst geometry and bus attributes

pub mod config;
pub mod error;
pub mod instruction;
pub mod opcode;
pub mod operand;
pub mod program;
pub mod register;

pub use config::{BurstSize, ChannelControl};
pub use error::SpecError;
pub use instruction::{BurstType, Condition, Instruction, WaitKind};
pub use opcode::Opcode;
pub use operand::{ChannelId, EventId, LoopCount, LoopSlot, PeripheralId, MAX_LOOP_COUNT};
pub use program::Program;
pub use register::{MoveTarget, DMA_MEM_BASE, DMA_PERI_BASE};

/// Largest backward jump a DMALPEND can encode
pub const MAX_BACKWARD_JUMP: usize = u8::MAX as usize;
