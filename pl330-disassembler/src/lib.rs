//! # PL330 Disassembler
//!
//! Decode PL330 DMA microcode back into instructions and render
//! mnemonic listings.
//!
//! ## Example
//!
//! ```rust
//! use pl330_disassembler::{decode, format};
//!
//! let (instr, len) = decode(&[0x22, 0xFF], 0).unwrap();
//! assert_eq!(len, 2);
//! assert_eq!(format(&instr), "DMALP_1 256");
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DisassemblerError, Result};
pub use decoder::{decode, decode_all};
pub use disassembler::{disassemble, disassemble_bytes};
pub use formatter::format;
