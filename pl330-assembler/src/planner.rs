//! # Loop Planner
//!
//! Expresses a burst count as nested hardware loops.
//!
//! A `DMALP` counts at most 256 iterations and a `DMALPEND` can only jump
//! back 255 bytes, so a transfer is covered by a sequence of loop blocks:
//!
//! ```text
//! DMALP_0 outer          ; only when more than 256 bursts remain
//! DMALP_1 inner
//!   unit x cycles        ; cycles > 1 only for >= 256*256 bursts
//! DMALPEND_1
//! DMALPEND_0
//! ```
//!
//! Each block consumes `outer * inner * cycles` bursts. Blocks are emitted
//! until nothing remains.

use crate::emitter::Emitter;
use crate::error::{AssemblerError, Result};
use crate::sequencer::TransferUnit;
use pl330_spec::{Condition, Instruction, LoopCount, LoopSlot, Opcode, MAX_BACKWARD_JUMP, MAX_LOOP_COUNT};

/// One loop block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopPlan {
    /// Outer loop on LC0, absent for 256 bursts or fewer
    pub outer: Option<LoopCount>,
    /// Inner loop on LC1
    pub inner: LoopCount,
    /// Units unrolled in the inner body
    pub cycles: u32,
}

impl LoopPlan {
    /// Split `bursts` into loop counts, before applying the jump limit
    pub fn decompose(bursts: u32) -> Result<Self> {
        let span = MAX_LOOP_COUNT;

        if bursts >= span * span {
            Ok(Self {
                outer: Some(LoopCount::MAX),
                inner: LoopCount::MAX,
                cycles: bursts / (span * span),
            })
        } else if bursts > span {
            Ok(Self {
                outer: Some(loop_count(bursts / span)?),
                inner: LoopCount::MAX,
                cycles: 1,
            })
        } else {
            Ok(Self {
                outer: None,
                inner: loop_count(bursts)?,
                cycles: 1,
            })
        }
    }

    /// Plan the next block for `bursts` remaining units of `unit_size` bytes
    pub fn for_bursts(bursts: u32, unit_size: usize) -> Result<Self> {
        let mut plan = Self::decompose(bursts)?;
        let cap = plan.cycle_cap(unit_size);
        if cap == 0 {
            return Err(AssemblerError::JumpOverflow {
                offset: plan.overhead() + unit_size,
            });
        }
        plan.cycles = plan.cycles.min(cap as u32);
        Ok(plan)
    }

    /// Bytes of DMALP/DMALPEND around the body
    pub fn overhead(&self) -> usize {
        let pair = Opcode::Lp.size() + Opcode::LpEnd.size();
        if self.outer.is_some() {
            2 * pair
        } else {
            pair
        }
    }

    /// Most units one body can hold while every jump still fits in 8 bits
    pub fn cycle_cap(&self, unit_size: usize) -> usize {
        MAX_BACKWARD_JUMP.saturating_sub(self.overhead()) / unit_size.max(1)
    }

    /// Bursts this block moves
    pub fn bursts(&self) -> u64 {
        let outer = self.outer.map_or(1, |c| c.get() as u64);
        outer * self.inner.get() as u64 * self.cycles as u64
    }

    pub fn emit<E: Emitter>(&self, e: &mut E, unit: &TransferUnit) -> Result<usize> {
        let start = e.offset();

        let outer_body = match self.outer {
            Some(count) => {
                e.emit(Instruction::Lp {
                    slot: LoopSlot::Lc0,
                    count,
                })?;
                Some(e.offset())
            }
            None => None,
        };

        e.emit(Instruction::Lp {
            slot: LoopSlot::Lc1,
            count: self.inner,
        })?;
        let inner_body = e.offset();

        unit.emit_cycles(e, self.cycles)?;
        emit_loop_end(e, LoopSlot::Lc1, Condition::Always, inner_body)?;

        if let Some(body) = outer_body {
            emit_loop_end(e, LoopSlot::Lc0, Condition::Always, body)?;
        }

        Ok(e.offset() - start)
    }
}

/// Plan and emit one loop block, returning `(bytes_emitted, bursts_consumed)`.
///
/// The consumed count can be smaller than `bursts`; callers loop until the
/// remainder reaches zero.
pub fn plan_and_emit<E: Emitter>(
    e: &mut E,
    bursts: u32,
    unit: &TransferUnit,
) -> Result<(usize, u32)> {
    let plan = LoopPlan::for_bursts(bursts, unit.size())?;
    let len = plan.emit(e, unit)?;
    let consumed = plan.bursts();

    tracing::debug!(
        outer = plan.outer.map_or(0, LoopCount::get),
        inner = plan.inner.get(),
        cycles = plan.cycles,
        consumed,
        len,
        "loop block"
    );

    // A block never moves more than was asked for
    Ok((len, consumed as u32))
}

/// Emit loop blocks until all `bursts` are covered
pub fn emit_loops<E: Emitter>(e: &mut E, bursts: u32, unit: &TransferUnit) -> Result<usize> {
    let start = e.offset();
    let mut remaining = bursts;
    while remaining > 0 {
        let (_, consumed) = plan_and_emit(e, remaining, unit)?;
        remaining -= consumed;
    }
    Ok(e.offset() - start)
}

/// All blocks `emit_loops` would produce for `bursts`
pub fn plan_all(bursts: u32, unit: &TransferUnit) -> Result<Vec<LoopPlan>> {
    let unit_size = unit.size();
    let mut plans = Vec::new();
    let mut remaining = bursts;
    while remaining > 0 {
        let plan = LoopPlan::for_bursts(remaining, unit_size)?;
        remaining -= plan.bursts() as u32;
        plans.push(plan);
    }
    Ok(plans)
}

/// A single LC0 loop of `count` units, closed with `end_cond`.
///
/// Used for peripheral-gated transfers, which never need a second level.
pub fn emit_single_loop<E: Emitter>(
    e: &mut E,
    count: u32,
    unit: &TransferUnit,
    end_cond: Condition,
) -> Result<usize> {
    let start = e.offset();
    e.emit(Instruction::Lp {
        slot: LoopSlot::Lc0,
        count: loop_count(count)?,
    })?;
    let body = e.offset();
    unit.emit_unit(e)?;
    emit_loop_end(e, LoopSlot::Lc0, end_cond, body)?;
    Ok(e.offset() - start)
}

/// DMALPEND jumping back to `body`
fn emit_loop_end<E: Emitter>(
    e: &mut E,
    slot: LoopSlot,
    cond: Condition,
    body: usize,
) -> Result<usize> {
    let offset = e.offset() - body;
    let jump = u8::try_from(offset).map_err(|_| AssemblerError::JumpOverflow { offset })?;
    e.emit(Instruction::LpEnd {
        slot,
        cond,
        forever: false,
        jump,
    })
}

fn loop_count(count: u32) -> Result<LoopCount> {
    LoopCount::new(count).map_err(|_| AssemblerError::CounterOverflow {
        count: count as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{Measure, Writer};
    use pl330_spec::PeripheralId;

    const UNIT: TransferUnit = TransferUnit::MemToMem;

    #[test]
    fn test_decompose_small() {
        let plan = LoopPlan::decompose(4).unwrap();
        assert_eq!(plan.outer, None);
        assert_eq!(plan.inner.get(), 4);
        assert_eq!(plan.cycles, 1);
        assert_eq!(plan.overhead(), 4);
    }

    #[test]
    fn test_decompose_exactly_256() {
        let plan = LoopPlan::decompose(256).unwrap();
        assert_eq!(plan.outer, None);
        assert_eq!(plan.inner, LoopCount::MAX);
    }

    #[test]
    fn test_decompose_two_level() {
        let plan = LoopPlan::decompose(257).unwrap();
        assert_eq!(plan.outer.map(LoopCount::get), Some(1));
        assert_eq!(plan.inner, LoopCount::MAX);
        assert_eq!(plan.bursts(), 256);
        assert_eq!(plan.overhead(), 8);

        let plan = LoopPlan::decompose(65535).unwrap();
        assert_eq!(plan.outer.map(LoopCount::get), Some(255));
    }

    #[test]
    fn test_decompose_unrolled() {
        let plan = LoopPlan::decompose(3 * 65536 + 7).unwrap();
        assert_eq!(plan.outer, Some(LoopCount::MAX));
        assert_eq!(plan.cycles, 3);
        assert_eq!(plan.bursts(), 3 * 65536);
    }

    #[test]
    fn test_decompose_zero_is_counter_overflow() {
        assert!(matches!(
            LoopPlan::decompose(0),
            Err(AssemblerError::CounterOverflow { count: 0 })
        ));
    }

    #[test]
    fn test_cycle_cap() {
        // (255 - 8) / 2
        let plan = LoopPlan::for_bursts(u32::MAX, UNIT.size()).unwrap();
        assert_eq!(plan.cycles, 123);

        let plan = LoopPlan::decompose(10).unwrap();
        assert_eq!(plan.cycle_cap(2), 125);
    }

    #[test]
    fn test_single_block_bytes() {
        let mut buf = [0u8; 6];
        let mut w = Writer::new(&mut buf);
        assert_eq!(plan_and_emit(&mut w, 4, &UNIT).unwrap(), (6, 4));
        assert_eq!(buf, [0x22, 0x03, 0x04, 0x08, 0x3C, 0x02]);
    }

    #[test]
    fn test_two_level_block_bytes() {
        let mut buf = [0u8; 10];
        let mut w = Writer::new(&mut buf);
        assert_eq!(plan_and_emit(&mut w, 512, &UNIT).unwrap(), (10, 512));
        assert_eq!(
            buf,
            [0x20, 0x01, 0x22, 0xFF, 0x04, 0x08, 0x3C, 0x02, 0x38, 0x06]
        );
    }

    #[test]
    fn test_70000_bursts() {
        let plans = plan_all(70000, &UNIT).unwrap();
        assert_eq!(plans.len(), 3);
        assert!(plans[0].outer.is_some());
        let total: u64 = plans.iter().map(LoopPlan::bursts).sum();
        assert_eq!(total, 70000);

        let mut m = Measure::new();
        assert_eq!(emit_loops(&mut m, 70000, &UNIT).unwrap(), 10 + 10 + 6);
    }

    #[test]
    fn test_emit_loops_zero() {
        let mut m = Measure::new();
        assert_eq!(emit_loops(&mut m, 0, &UNIT).unwrap(), 0);
    }

    #[test]
    fn test_capped_block_jumps() {
        let bursts = 200 * 65536;
        let plan = LoopPlan::for_bursts(bursts, UNIT.size()).unwrap();
        assert_eq!(plan.cycles, 123);

        let mut m = Measure::new();
        let len = plan.emit(&mut m, &UNIT).unwrap();
        let mut buf = vec![0u8; len];
        plan.emit(&mut Writer::new(&mut buf), &UNIT).unwrap();

        // inner jump covers the unrolled body, outer adds DMALP_1 and DMALPEND_1
        assert_eq!(buf[len - 3], 246);
        assert_eq!(buf[len - 1], 250);
    }

    #[test]
    fn test_single_loop_counter_overflow() {
        let unit = TransferUnit::MemToDev {
            peripheral: PeripheralId::new(1).unwrap(),
        };
        let mut m = Measure::new();
        let result = emit_single_loop(&mut m, 257, &unit, Condition::Single);
        assert!(matches!(
            result,
            Err(AssemblerError::CounterOverflow { count: 257 })
        ));
    }

    #[test]
    fn test_single_loop_bytes() {
        let unit = TransferUnit::MemToDev {
            peripheral: PeripheralId::new(1).unwrap(),
        };
        let mut buf = [0u8; 11];
        let mut w = Writer::new(&mut buf);
        assert_eq!(emit_single_loop(&mut w, 4, &unit, Condition::Single).unwrap(), 11);
        assert_eq!(buf[..2], [0x20, 0x03]);
        assert_eq!(buf[9..], [0x39, 0x07]);
    }
}
