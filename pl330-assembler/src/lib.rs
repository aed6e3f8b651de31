//! PL330 Microcode Assembler
//!
//! Generate byte-exact DMA channel programs for memory-to-memory and
//! peripheral-gated transfers.
//!
//! ## Example
//!
//! ```rust
//! use pl330_assembler::compile_memory_transfer;
//!
//! let program = compile_memory_transfer(0x1000, 0x2000, 4).unwrap();
//! assert_eq!(program.len(), 27);
//! assert!(!program.non_secure);
//! ```

pub mod error;
pub mod encoder;
pub mod emitter;
pub mod sequencer;
pub mod planner;
pub mod builder;

pub use error::{AssemblerError, Result};
pub use encoder::{encode, encode_all, encode_kick};
pub use emitter::{Emitter, Measure, Writer};
pub use sequencer::TransferUnit;
pub use planner::{plan_all, plan_and_emit, LoopPlan};
pub use builder::{build_transfer, AssemblerConfig, ProgramBuilder, Transfer, TransferKind};

use pl330_spec::{PeripheralId, Program};

/// Compile a secure memory-to-memory copy of `size_bytes`
pub fn compile_memory_transfer(src: u32, dst: u32, size_bytes: u32) -> Result<Program> {
    build_transfer(src, dst, size_bytes, TransferKind::MemToMem, None)
}

/// Compile a non-secure copy from memory into peripheral `peripheral_id`'s
/// data register, one request-gated burst at a time
pub fn compile_peripheral_transfer(
    src: u32,
    dst: u32,
    peripheral_id: u8,
    size_bytes: u32,
) -> Result<Program> {
    let peripheral = PeripheralId::new(peripheral_id)?;
    build_transfer(src, dst, size_bytes, TransferKind::MemToDev, Some(peripheral))
}
