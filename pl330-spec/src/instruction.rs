//! PL330 Instruction Set
//!
//! The subset of the DMA controller's instruction set needed for
//! memory-to-memory and peripheral-gated transfers.

use crate::opcode::Opcode;
use crate::operand::{ChannelId, EventId, LoopCount, LoopSlot, PeripheralId};
use crate::register::MoveTarget;
use serde::{Deserialize, Serialize};

/// Request condition for DMALD, DMAST and DMALPEND
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Execute only for a single request
    Single,
    /// Execute only for a burst request
    Burst,
    /// Execute unconditionally
    Always,
}

impl Condition {
    /// Low two bits folded into the opcode byte
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            Condition::Single => 0b01,
            Condition::Burst => 0b11,
            Condition::Always => 0b00,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            Condition::Single => 'S',
            Condition::Burst => 'B',
            Condition::Always => 'A',
        }
    }
}

/// Request type for the peripheral load/store instructions
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurstType {
    Single,
    Burst,
}

impl BurstType {
    pub fn suffix(self) -> char {
        match self {
            BurstType::Single => 'S',
            BurstType::Burst => 'B',
        }
    }
}

/// What DMAWFP waits for
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaitKind {
    Single,
    Burst,
    /// Whatever request type the peripheral raises
    Peripheral,
}

impl WaitKind {
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            WaitKind::Single => 0b00,
            WaitKind::Burst => 0b10,
            WaitKind::Peripheral => 0b01,
        }
    }

    pub fn suffix(self) -> char {
        match self {
            WaitKind::Single => 'S',
            WaitKind::Burst => 'B',
            WaitKind::Peripheral => 'P',
        }
    }
}

/// PL330 Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// DMAMOV: target = value
    Mov { target: MoveTarget, value: u32 },

    /// DMALD: load one burst at SAR
    Ld { cond: Condition },

    /// DMAST: store one burst at DAR
    St { cond: Condition },

    /// DMALDP: peripheral-gated load
    Ldp { burst: BurstType, peripheral: PeripheralId },

    /// DMASTP: peripheral-gated store
    Stp { burst: BurstType, peripheral: PeripheralId },

    /// DMALP: slot = count - 1
    Lp { slot: LoopSlot, count: LoopCount },

    /// DMALPEND: if slot != 0 { slot -= 1; pc -= jump }
    ///
    /// `jump` is the byte distance back to the first body instruction.
    /// With `forever` set the counter is ignored and the jump is always taken.
    LpEnd {
        slot: LoopSlot,
        cond: Condition,
        forever: bool,
        jump: u8,
    },

    /// DMAFLUSHP: clear the peripheral's request state
    FlushP { peripheral: PeripheralId },

    /// DMAWFP: stall until the peripheral requests
    Wfp { kind: WaitKind, peripheral: PeripheralId },

    /// DMASEV: signal event / raise interrupt
    Sev { event: EventId },

    /// DMAEND
    End,

    /// DMAGO: start `channel` at `address`
    Go {
        channel: ChannelId,
        address: u32,
        non_secure: bool,
    },
}

impl Instruction {
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Mov { .. } => Opcode::Mov,
            Instruction::Ld { .. } => Opcode::Ld,
            Instruction::St { .. } => Opcode::St,
            Instruction::Ldp { .. } => Opcode::Ldp,
            Instruction::Stp { .. } => Opcode::Stp,
            Instruction::Lp { .. } => Opcode::Lp,
            Instruction::LpEnd { .. } => Opcode::LpEnd,
            Instruction::FlushP { .. } => Opcode::FlushP,
            Instruction::Wfp { .. } => Opcode::Wfp,
            Instruction::Sev { .. } => Opcode::Sev,
            Instruction::End => Opcode::End,
            Instruction::Go { .. } => Opcode::Go,
        }
    }

    /// Encoded length in bytes; never depends on operand values
    #[inline]
    pub fn size(&self) -> usize {
        self.opcode().size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_ignores_operands() {
        let small = Instruction::Mov { target: MoveTarget::Sar, value: 0 };
        let large = Instruction::Mov { target: MoveTarget::Dar, value: u32::MAX };
        assert_eq!(small.size(), large.size());
        assert_eq!(small.size(), 6);

        let lp = Instruction::Lp { slot: LoopSlot::Lc1, count: LoopCount::MAX };
        assert_eq!(lp.size(), 2);
        assert_eq!(Instruction::End.size(), 1);
    }

    #[test]
    fn test_condition_bits() {
        assert_eq!(Condition::Always.bits(), 0);
        assert_eq!(Condition::Single.bits(), 1);
        assert_eq!(Condition::Burst.bits(), 3);
        assert_eq!(WaitKind::Peripheral.bits(), 1);
        assert_eq!(WaitKind::Burst.bits(), 2);
    }
}
