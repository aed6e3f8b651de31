//! Program dispatch through the debug instruction interface
//!
//! A channel is started by feeding a `DMAGO` to the controller's debug
//! registers: the first two instruction bytes go to `DBGINST0`, the
//! remaining four to `DBGINST1`, and a write to `DBGCMD` executes it.

use crate::bus::RegisterBus;
use pl330_assembler::encode_kick;
use pl330_spec::register::{DBGCMD, DBGCMD_EXECUTE, DBGINST0, DBGINST1};
use pl330_spec::{ChannelId, Program, DMA_MEM_BASE, DMA_PERI_BASE};
use serde::{Deserialize, Serialize};

/// Thread the debug instruction is issued on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DebugThread {
    #[default]
    Manager,
    Channel(ChannelId),
}

impl DebugThread {
    /// Thread-select bits of `DBGINST0`
    fn select_bits(self) -> u32 {
        match self {
            DebugThread::Manager => 0,
            DebugThread::Channel(ch) => 1 | (ch.get() as u32) << 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Controller register base
    pub base: u32,
    pub debug_thread: DebugThread,
}

impl DispatcherConfig {
    /// Controller used for memory-to-memory copies
    pub const fn memory() -> Self {
        Self {
            base: DMA_MEM_BASE,
            debug_thread: DebugThread::Manager,
        }
    }

    /// Controller wired to the peripheral request lines
    pub const fn peripheral() -> Self {
        Self {
            base: DMA_PERI_BASE,
            debug_thread: DebugThread::Manager,
        }
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self::memory()
    }
}

/// Starts channel programs on one controller
#[derive(Debug)]
pub struct Dispatcher<B: RegisterBus> {
    bus: B,
    config: DispatcherConfig,
}

impl<B: RegisterBus> Dispatcher<B> {
    pub fn new(bus: B, config: DispatcherConfig) -> Self {
        Self { bus, config }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Issue `DMAGO` for `channel` with its program at `address`
    pub fn start_program(&mut self, channel: ChannelId, address: u32, non_secure: bool) {
        let insn = encode_kick(channel, address, non_secure);
        tracing::debug!(
            channel = channel.get(),
            address = format_args!("{:#010x}", address),
            non_secure,
            "starting channel program"
        );
        self.execute_debug(&insn);
    }

    /// Start `program`, already placed at `address`, on its own channel
    pub fn dispatch(&mut self, program: &Program, address: u32) {
        self.start_program(program.channel, address, program.non_secure);
    }

    fn execute_debug(&mut self, insn: &[u8; 6]) {
        let inst0 = (insn[0] as u32) << 16
            | (insn[1] as u32) << 24
            | self.config.debug_thread.select_bits();
        let inst1 = u32::from_le_bytes([insn[2], insn[3], insn[4], insn[5]]);

        self.write(DBGINST0, inst0);
        self.write(DBGINST1, inst1);
        self.write(DBGCMD, DBGCMD_EXECUTE);
    }

    fn write(&mut self, offset: u32, value: u32) {
        let address = self.config.base.wrapping_add(offset);
        tracing::debug!(
            address = format_args!("{:#010x}", address),
            value = format_args!("{:#010x}", value),
            "register write"
        );
        self.bus.write_register(value, address);
    }
}
