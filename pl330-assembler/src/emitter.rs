//! Size-only and writing instruction sinks
//!
//! Program generation is written once against [`Emitter`] and run twice:
//! first into a [`Measure`] to learn the exact length, then into a
//! [`Writer`] over a buffer of that length. Both sinks advance their offset
//! by `Instruction::size()`, so the two passes agree byte for byte.

use crate::encoder::encode;
use crate::error::{AssemblerError, Result};
use pl330_spec::Instruction;

/// Destination for generated instructions
pub trait Emitter {
    /// Bytes emitted so far
    fn offset(&self) -> usize;

    /// Append one instruction, returning its length
    fn emit(&mut self, instr: Instruction) -> Result<usize>;
}

/// Length accumulator; writes nothing
#[derive(Debug, Default, Clone, Copy)]
pub struct Measure {
    len: usize,
}

impl Measure {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Emitter for Measure {
    #[inline]
    fn offset(&self) -> usize {
        self.len
    }

    #[inline]
    fn emit(&mut self, instr: Instruction) -> Result<usize> {
        let size = instr.size();
        self.len += size;
        Ok(size)
    }
}

/// Encodes into a caller-owned buffer
#[derive(Debug)]
pub struct Writer<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> Writer<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl Emitter for Writer<'_> {
    #[inline]
    fn offset(&self) -> usize {
        self.pos
    }

    fn emit(&mut self, instr: Instruction) -> Result<usize> {
        let required = self.pos + instr.size();
        if required > self.buf.len() {
            return Err(AssemblerError::BufferCapacity {
                required,
                available: self.buf.len(),
            });
        }

        let written = encode(&instr, &mut self.buf[self.pos..])?;
        tracing::trace!(offset = self.pos, instr = ?instr, "emit");
        self.pos += written;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl330_spec::{EventId, MoveTarget};

    #[test]
    fn test_measure_accumulates() {
        let mut m = Measure::new();
        m.emit(Instruction::Mov { target: MoveTarget::Ccr, value: 0 }).unwrap();
        m.emit(Instruction::Sev { event: EventId::default() }).unwrap();
        m.emit(Instruction::End).unwrap();
        assert_eq!(m.offset(), 9);
    }

    #[test]
    fn test_writer_matches_measure() {
        let instrs = [
            Instruction::Mov { target: MoveTarget::Sar, value: 0x1000 },
            Instruction::Sev { event: EventId::new(3).unwrap() },
            Instruction::End,
        ];

        let mut m = Measure::new();
        for instr in instrs {
            m.emit(instr).unwrap();
        }

        let mut buf = vec![0u8; m.offset()];
        let mut w = Writer::new(&mut buf);
        for instr in instrs {
            w.emit(instr).unwrap();
        }
        assert_eq!(w.offset(), m.offset());
        assert_eq!(buf, vec![0xBC, 0x00, 0x00, 0x10, 0x00, 0x00, 0x34, 0x18, 0x00]);
    }

    #[test]
    fn test_writer_overflow() {
        let mut buf = [0u8; 7];
        let mut w = Writer::new(&mut buf);
        w.emit(Instruction::Mov { target: MoveTarget::Dar, value: 1 }).unwrap();
        let err = w.emit(Instruction::Sev { event: EventId::default() }).unwrap_err();
        assert!(matches!(
            err,
            AssemblerError::BufferCapacity { required: 8, available: 7 }
        ));
        assert_eq!(w.offset(), 6);
    }
}
