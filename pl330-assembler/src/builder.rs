//! # Program Builder
//!
//! Turns a transfer request into a complete channel program:
//!
//! ```text
//! DMAMOV CCR, control
//! [DMAFLUSHP p]             ; peripheral-gated only
//! DMAMOV SAR, src
//! DMAMOV DAR, dst
//! <loop blocks>
//! DMASEV event
//! DMAEND
//! ```
//!
//! Generation runs twice over the same traversal: once into a `Measure`
//! to size the buffer, once into a `Writer` to fill it.

use crate::emitter::{Emitter, Measure, Writer};
use crate::error::{AssemblerError, Result};
use crate::planner::{emit_loops, emit_single_loop};
use crate::sequencer::TransferUnit;
use pl330_spec::{
    ChannelControl, ChannelId, Condition, EventId, Instruction, MoveTarget, PeripheralId, Program,
};
use serde::{Deserialize, Serialize};

/// Direction and gating of a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransferKind {
    /// Memory to memory without barriers
    MemToMem,
    /// Memory to a peripheral data register, gated by its request line
    MemToDev,
    /// Peripheral to memory
    DevToMem,
    /// Memory to memory with read/write barriers around each burst
    MemToMemBarrier,
}

/// Generator settings shared by every program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblerConfig {
    /// Channel thread the programs run on
    pub channel: ChannelId,
    /// Event signalled when a program completes
    pub event: EventId,
}

/// One transfer request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub kind: TransferKind,
    pub src: u32,
    pub dst: u32,
    pub size_bytes: u32,
    pub peripheral: Option<PeripheralId>,
    pub control: ChannelControl,
}

impl Transfer {
    pub fn memory(src: u32, dst: u32, size_bytes: u32) -> Self {
        Self {
            kind: TransferKind::MemToMem,
            src,
            dst,
            size_bytes,
            peripheral: None,
            control: ChannelControl::memory_to_memory(),
        }
    }

    pub fn to_peripheral(src: u32, dst: u32, peripheral: PeripheralId, size_bytes: u32) -> Self {
        Self {
            kind: TransferKind::MemToDev,
            src,
            dst,
            size_bytes,
            peripheral: Some(peripheral),
            control: ChannelControl::memory_to_peripheral(),
        }
    }

    pub fn with_control(mut self, control: ChannelControl) -> Self {
        self.control = control;
        self
    }

    /// Number of bursts the control word needs to move `size_bytes`
    pub fn bursts(&self) -> Result<u32> {
        self.control.validate()?;
        let burst_bytes = self.control.burst_bytes();
        if self.size_bytes % burst_bytes != 0 {
            return Err(AssemblerError::MisalignedSize {
                size: self.size_bytes,
                burst_bytes,
            });
        }
        Ok(self.size_bytes / burst_bytes)
    }

    /// Peripheral-gated programs must start non-secure
    pub fn non_secure(&self) -> bool {
        self.kind == TransferKind::MemToDev
    }
}

/// Two-pass program generator
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    config: AssemblerConfig,
}

impl ProgramBuilder {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Exact program length for `transfer`
    pub fn measure(&self, transfer: &Transfer) -> Result<usize> {
        let mut m = Measure::new();
        self.generate(transfer, &mut m)?;
        Ok(m.offset())
    }

    /// Build into a caller-owned buffer, returning the program length.
    ///
    /// Nothing is written when `buf` is shorter than the measured length.
    pub fn build_into(&self, transfer: &Transfer, buf: &mut [u8]) -> Result<usize> {
        let len = self.measure(transfer)?;
        if buf.len() < len {
            return Err(AssemblerError::BufferCapacity {
                required: len,
                available: buf.len(),
            });
        }
        self.emit_pass(transfer, &mut buf[..len])?;
        Ok(len)
    }

    /// Build into an exactly sized program
    pub fn build(&self, transfer: &Transfer) -> Result<Program> {
        let len = self.measure(transfer)?;
        let mut code = vec![0u8; len];
        self.emit_pass(transfer, &mut code)?;

        tracing::debug!(
            kind = ?transfer.kind,
            size_bytes = transfer.size_bytes,
            len,
            "compiled program"
        );

        Ok(Program::new(
            code,
            self.config.channel,
            self.config.event,
            transfer.non_secure(),
        ))
    }

    /// Fill `buf`, which must be exactly the measured length
    fn emit_pass(&self, transfer: &Transfer, buf: &mut [u8]) -> Result<()> {
        let expected = buf.len();
        let mut w = Writer::new(buf);
        self.generate(transfer, &mut w)?;
        if w.offset() != expected {
            return Err(AssemblerError::BufferCapacity {
                required: w.offset(),
                available: expected,
            });
        }
        Ok(())
    }

    fn generate<E: Emitter>(&self, transfer: &Transfer, e: &mut E) -> Result<()> {
        match transfer.kind {
            TransferKind::MemToMem => self.generate_memory(transfer, e),
            TransferKind::MemToDev => {
                let peripheral = transfer.peripheral.ok_or(AssemblerError::MissingPeripheral)?;
                self.generate_peripheral(transfer, peripheral, e)
            }
            kind => Err(AssemblerError::UnsupportedTransferKind(kind)),
        }
    }

    fn generate_memory<E: Emitter>(&self, transfer: &Transfer, e: &mut E) -> Result<()> {
        let bursts = transfer.bursts()?;

        e.emit(Instruction::Mov {
            target: MoveTarget::Ccr,
            value: transfer.control.word(),
        })?;
        e.emit(Instruction::Mov {
            target: MoveTarget::Sar,
            value: transfer.src,
        })?;
        e.emit(Instruction::Mov {
            target: MoveTarget::Dar,
            value: transfer.dst,
        })?;

        emit_loops(e, bursts, &TransferUnit::MemToMem)?;

        self.emit_epilogue(e)
    }

    fn generate_peripheral<E: Emitter>(
        &self,
        transfer: &Transfer,
        peripheral: PeripheralId,
        e: &mut E,
    ) -> Result<()> {
        let bursts = transfer.bursts()?;

        e.emit(Instruction::Mov {
            target: MoveTarget::Ccr,
            value: transfer.control.word(),
        })?;
        e.emit(Instruction::FlushP { peripheral })?;
        e.emit(Instruction::Mov {
            target: MoveTarget::Sar,
            value: transfer.src,
        })?;
        e.emit(Instruction::Mov {
            target: MoveTarget::Dar,
            value: transfer.dst,
        })?;

        if bursts > 0 {
            let unit = TransferUnit::MemToDev { peripheral };
            emit_single_loop(e, bursts, &unit, Condition::Single)?;
        }

        self.emit_epilogue(e)
    }

    fn emit_epilogue<E: Emitter>(&self, e: &mut E) -> Result<()> {
        e.emit(Instruction::Sev {
            event: self.config.event,
        })?;
        e.emit(Instruction::End)?;
        Ok(())
    }
}

/// Build a transfer with the default configuration and the control-word
/// preset for `kind`
pub fn build_transfer(
    src: u32,
    dst: u32,
    size_bytes: u32,
    kind: TransferKind,
    peripheral: Option<PeripheralId>,
) -> Result<Program> {
    let control = match kind {
        TransferKind::MemToDev => ChannelControl::memory_to_peripheral(),
        _ => ChannelControl::memory_to_memory(),
    };
    let transfer = Transfer {
        kind,
        src,
        dst,
        size_bytes,
        peripheral,
        control,
    };
    ProgramBuilder::default().build(&transfer)
}
