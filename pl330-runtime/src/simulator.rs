//! Host-side execution of channel microcode

use crate::error::{Result, RuntimeError};
use crate::memory::Memory;
use crate::state::ChannelState;
use pl330_disassembler::{decode, format};
use pl330_spec::{BurstType, Condition, EventId, Instruction, MoveTarget, Opcode, Program};
use serde::{Deserialize, Serialize};

/// Request type the simulated peripheral raises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestType {
    #[default]
    Single,
    Burst,
}

/// Simulator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Instructions executed before giving up
    pub max_steps: u64,

    /// Request type seen by conditional instructions
    pub request: RequestType,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            max_steps: 1_000_000,
            request: RequestType::Single,
        }
    }
}

/// Outcome of running a program to `DMAEND`
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Instructions executed, including `DMAEND`
    pub steps: u64,

    /// Events signalled by `DMASEV`, in order
    pub events: Vec<EventId>,

    /// `DMAWFP` instructions executed
    pub peripheral_waits: u64,

    /// `DMAFLUSHP` instructions executed
    pub flushes: u64,

    pub bytes_loaded: u64,
    pub bytes_stored: u64,

    /// Channel registers at `DMAEND`
    pub state: ChannelState,
}

/// Single-channel PL330 thread over a sparse memory
#[derive(Debug, Clone, Default)]
pub struct Simulator {
    memory: Memory,
    config: SimulatorConfig,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self {
            memory: Memory::new(),
            config,
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.memory
    }

    pub fn run_program(&mut self, program: &Program) -> Result<ExecutionResult> {
        self.run(&program.code)
    }

    /// Execute `code` from offset 0 until `DMAEND`
    pub fn run(&mut self, code: &[u8]) -> Result<ExecutionResult> {
        let mut state = ChannelState::new();
        let mut result = ExecutionResult {
            steps: 0,
            events: Vec::new(),
            peripheral_waits: 0,
            flushes: 0,
            bytes_loaded: 0,
            bytes_stored: 0,
            state: ChannelState::new(),
        };

        loop {
            if result.steps >= self.config.max_steps {
                return Err(RuntimeError::StepLimitExceeded {
                    limit: self.config.max_steps,
                });
            }

            let pc = state.pc;
            if pc >= code.len() {
                return Err(RuntimeError::PcOutOfRange { pc });
            }

            let (instr, len) = decode(code, pc)?;
            tracing::trace!(pc, instr = %format(&instr), "step");
            result.steps += 1;

            let mut next = pc + len;
            match instr {
                Instruction::Mov { target, value } => match target {
                    MoveTarget::Sar => state.sar = value,
                    MoveTarget::Ccr => state.ccr = value,
                    MoveTarget::Dar => state.dar = value,
                },
                Instruction::Ld { cond } => {
                    if self.takes(cond) {
                        result.bytes_loaded += self.load_burst(&mut state);
                    }
                }
                Instruction::St { cond } => {
                    if self.takes(cond) {
                        result.bytes_stored += self.store_burst(&mut state)?;
                    }
                }
                Instruction::Ldp { burst, .. } => {
                    if self.takes_request(burst) {
                        result.bytes_loaded += self.load_burst(&mut state);
                    }
                }
                Instruction::Stp { burst, .. } => {
                    if self.takes_request(burst) {
                        result.bytes_stored += self.store_burst(&mut state)?;
                    }
                }
                Instruction::Lp { slot, count } => {
                    *state.counter_mut(slot) = count.get() - 1;
                }
                Instruction::LpEnd {
                    slot,
                    cond,
                    forever,
                    jump,
                } => {
                    if self.takes(cond) {
                        let counter = state.counter_mut(slot);
                        if forever {
                            next = jump_back(pc, jump)?;
                        } else if *counter != 0 {
                            *counter -= 1;
                            next = jump_back(pc, jump)?;
                        }
                    }
                }
                Instruction::Wfp { .. } => result.peripheral_waits += 1,
                Instruction::FlushP { .. } => result.flushes += 1,
                Instruction::Sev { event } => result.events.push(event),
                Instruction::End => {
                    tracing::debug!(
                        steps = result.steps,
                        loaded = result.bytes_loaded,
                        stored = result.bytes_stored,
                        "channel halted"
                    );
                    result.state = state;
                    return Ok(result);
                }
                Instruction::Go { .. } => {
                    return Err(RuntimeError::UnexpectedInstruction {
                        pc,
                        mnemonic: Opcode::Go.mnemonic(),
                    });
                }
            }
            state.pc = next;
        }
    }

    fn takes(&self, cond: Condition) -> bool {
        match cond {
            Condition::Always => true,
            Condition::Single => self.config.request == RequestType::Single,
            Condition::Burst => self.config.request == RequestType::Burst,
        }
    }

    fn takes_request(&self, burst: BurstType) -> bool {
        match burst {
            BurstType::Single => self.takes(Condition::Single),
            BurstType::Burst => self.takes(Condition::Burst),
        }
    }

    /// Read one burst at SAR into the FIFO
    fn load_burst(&mut self, state: &mut ChannelState) -> u64 {
        let control = state.control();
        let total = control.burst_bytes();
        let beat = control.burst_size.bytes();

        for i in 0..total {
            let offset = if control.src_inc { i } else { i % beat };
            let byte = self.memory.read_byte(state.sar.wrapping_add(offset));
            state.fifo.push_back(byte);
        }
        if control.src_inc {
            state.sar = state.sar.wrapping_add(total);
        }
        total as u64
    }

    /// Drain one burst from the FIFO to DAR
    fn store_burst(&mut self, state: &mut ChannelState) -> Result<u64> {
        let control = state.control();
        let total = control.burst_bytes();
        let beat = control.burst_size.bytes();

        if state.fifo.len() < total as usize {
            return Err(RuntimeError::FifoUnderrun { pc: state.pc });
        }
        for i in 0..total {
            let offset = if control.dst_inc { i } else { i % beat };
            if let Some(byte) = state.fifo.pop_front() {
                self.memory.write_byte(state.dar.wrapping_add(offset), byte);
            }
        }
        if control.dst_inc {
            state.dar = state.dar.wrapping_add(total);
        }
        Ok(total as u64)
    }
}

fn jump_back(pc: usize, jump: u8) -> Result<usize> {
    pc.checked_sub(jump as usize)
        .ok_or(RuntimeError::PcOutOfRange { pc })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl330_disassembler::DisassemblerError;

    // MOV CCR 0x02004801; MOV SAR 0x1000; MOV DAR 0x2000;
    // LP_1 4; LDA; STA; LPENDA_1 2; SEV 0; END
    const COPY_FOUR: [u8; 27] = [
        0xBC, 0x01, 0x01, 0x48, 0x00, 0x02, 0xBC, 0x00, 0x00, 0x10, 0x00, 0x00, 0xBC, 0x02,
        0x00, 0x20, 0x00, 0x00, 0x22, 0x03, 0x04, 0x08, 0x3C, 0x02, 0x34, 0x00, 0x00,
    ];

    #[test]
    fn test_copy_four_bytes() {
        let mut sim = Simulator::default();
        sim.memory_mut().load(0x1000, &[1, 2, 3, 4]);

        let result = sim.run(&COPY_FOUR).unwrap();
        assert_eq!(sim.memory().read_range(0x2000, 4), vec![1, 2, 3, 4]);
        assert_eq!(result.bytes_loaded, 4);
        assert_eq!(result.bytes_stored, 4);
        assert_eq!(result.events, vec![EventId::default()]);
        assert_eq!(result.state.sar, 0x1004);
        assert_eq!(result.state.dar, 0x2004);
        // 3 MOVs + LP + 4 x (LD, ST, LPEND) + SEV + END
        assert_eq!(result.steps, 3 + 1 + 12 + 2);
    }

    #[test]
    fn test_end_only() {
        let result = Simulator::default().run(&[0x00]).unwrap();
        assert_eq!(result.steps, 1);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_store_without_load_underruns() {
        let err = Simulator::default().run(&[0x08, 0x00]).unwrap_err();
        assert_eq!(err, RuntimeError::FifoUnderrun { pc: 0 });
    }

    #[test]
    fn test_missing_end() {
        let err = Simulator::default().run(&[0x04]).unwrap_err();
        assert_eq!(err, RuntimeError::PcOutOfRange { pc: 1 });
    }

    #[test]
    fn test_loop_forever_hits_step_limit() {
        let config = SimulatorConfig {
            max_steps: 100,
            ..SimulatorConfig::default()
        };
        // LDA; LPFEA_0 back to LDA
        let err = Simulator::new(config).run(&[0x04, 0x28, 0x01]).unwrap_err();
        assert_eq!(err, RuntimeError::StepLimitExceeded { limit: 100 });
    }

    #[test]
    fn test_go_is_rejected() {
        let err = Simulator::default()
            .run(&[0xA0, 0x00, 0x00, 0x00, 0x00, 0x00])
            .unwrap_err();
        assert!(matches!(err, RuntimeError::UnexpectedInstruction { pc: 0, .. }));
    }

    #[test]
    fn test_decode_errors_propagate() {
        let err = Simulator::default().run(&[0xFF]).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::Decode(DisassemblerError::UnknownOpcode { offset: 0, byte: 0xFF })
        );
    }

    #[test]
    fn test_burst_conditions_skip_under_single_requests() {
        // LDB; STB; END: both skipped, so no underrun
        let result = Simulator::default().run(&[0x07, 0x0B, 0x00]).unwrap();
        assert_eq!(result.bytes_loaded, 0);
        assert_eq!(result.bytes_stored, 0);

        let config = SimulatorConfig {
            request: RequestType::Burst,
            ..SimulatorConfig::default()
        };
        let result = Simulator::new(config).run(&[0x07, 0x0B, 0x00]).unwrap();
        assert_eq!(result.bytes_stored, 1);
    }

    #[test]
    fn test_jump_before_program_start() {
        // LPENDA_0 with a counter of zero falls through; LP first to force a jump
        let err = Simulator::default()
            .run(&[0x20, 0x01, 0x38, 0x05, 0x00])
            .unwrap_err();
        assert_eq!(err, RuntimeError::PcOutOfRange { pc: 2 });
    }
}
