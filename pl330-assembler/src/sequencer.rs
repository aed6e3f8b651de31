//! Transfer units: the instructions that move one burst

use crate::emitter::Emitter;
use crate::error::Result;
use pl330_spec::{BurstType, Condition, Instruction, PeripheralId, WaitKind};

/// Instruction group that moves one burst for a transfer kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferUnit {
    /// `DMALDA; DMASTA` with no barriers
    MemToMem,
    /// `DMAWFPS p; DMALDA; DMASTPS p; DMAFLUSHP p`
    MemToDev { peripheral: PeripheralId },
}

/// Most instructions in any unit
const MAX_UNIT_LEN: usize = 4;

impl TransferUnit {
    /// The unit's instructions, in emission order.
    ///
    /// Backed by a fixed array, so emitting many cycles never allocates.
    pub fn instructions(&self) -> impl Iterator<Item = Instruction> {
        let lda = Instruction::Ld { cond: Condition::Always };
        let (group, len): ([Instruction; MAX_UNIT_LEN], usize) = match *self {
            TransferUnit::MemToMem => (
                [
                    lda,
                    Instruction::St { cond: Condition::Always },
                    // padding, never yielded
                    Instruction::End,
                    Instruction::End,
                ],
                2,
            ),
            TransferUnit::MemToDev { peripheral } => (
                [
                    Instruction::Wfp {
                        kind: WaitKind::Single,
                        peripheral,
                    },
                    lda,
                    Instruction::Stp {
                        burst: BurstType::Single,
                        peripheral,
                    },
                    Instruction::FlushP { peripheral },
                ],
                4,
            ),
        };
        group.into_iter().take(len)
    }

    /// Encoded length of one unit
    pub fn size(&self) -> usize {
        self.instructions().map(|instr| instr.size()).sum()
    }

    /// Emit one unit
    pub fn emit_unit<E: Emitter>(&self, e: &mut E) -> Result<usize> {
        let mut off = 0;
        for instr in self.instructions() {
            off += e.emit(instr)?;
        }
        Ok(off)
    }

    /// Emit `cycles` back-to-back units
    pub fn emit_cycles<E: Emitter>(&self, e: &mut E, cycles: u32) -> Result<usize> {
        let mut off = 0;
        for _ in 0..cycles {
            off += self.emit_unit(e)?;
        }
        Ok(off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{Measure, Writer};
    use pl330_spec::Opcode;

    #[test]
    fn test_unit_sizes() {
        assert_eq!(TransferUnit::MemToMem.size(), 2);
        let unit = TransferUnit::MemToDev {
            peripheral: PeripheralId::new(1).unwrap(),
        };
        assert_eq!(unit.size(), 7);
    }

    #[test]
    fn test_unit_instructions() {
        let ops: Vec<Opcode> = TransferUnit::MemToMem
            .instructions()
            .map(|instr| instr.opcode())
            .collect();
        assert_eq!(ops, vec![Opcode::Ld, Opcode::St]);

        let unit = TransferUnit::MemToDev {
            peripheral: PeripheralId::new(4).unwrap(),
        };
        let ops: Vec<Opcode> = unit.instructions().map(|instr| instr.opcode()).collect();
        assert_eq!(
            ops,
            vec![Opcode::Wfp, Opcode::Ld, Opcode::Stp, Opcode::FlushP]
        );
    }

    #[test]
    fn test_emit_cycles() {
        let mut m = Measure::new();
        assert_eq!(TransferUnit::MemToMem.emit_cycles(&mut m, 3).unwrap(), 6);

        let mut buf = [0u8; 6];
        let mut w = Writer::new(&mut buf);
        TransferUnit::MemToMem.emit_cycles(&mut w, 3).unwrap();
        assert_eq!(buf, [0x04, 0x08, 0x04, 0x08, 0x04, 0x08]);
    }

    #[test]
    fn test_peripheral_unit_bytes() {
        let unit = TransferUnit::MemToDev {
            peripheral: PeripheralId::new(2).unwrap(),
        };
        let mut buf = [0u8; 7];
        let mut w = Writer::new(&mut buf);
        assert_eq!(unit.emit_unit(&mut w).unwrap(), 7);
        assert_eq!(buf, [0x30, 0x10, 0x04, 0x29, 0x10, 0x35, 0x10]);
    }

    #[test]
    fn test_zero_cycles_emit_nothing() {
        let mut m = Measure::new();
        assert_eq!(TransferUnit::MemToMem.emit_cycles(&mut m, 0).unwrap(), 0);
        assert_eq!(m.offset(), 0);
    }
}
