//! Instruction encoding to PL330 byte layout
//!
//! Byte 0 is the opcode with mode bits folded in, operands follow.
//! Multi-byte immediates are little-endian.

use crate::error::{AssemblerError, Result};
use pl330_spec::{BurstType, ChannelId, Instruction, Opcode, PeripheralId};

/// Encode `instr` at the start of `buf`, returning the bytes written.
///
/// The count always equals `instr.size()`; a buffer shorter than that is
/// rejected before anything is written.
pub fn encode(instr: &Instruction, buf: &mut [u8]) -> Result<usize> {
    let size = instr.size();
    let available = buf.len();
    let Some(out) = buf.get_mut(..size) else {
        return Err(AssemblerError::BufferCapacity {
            required: size,
            available,
        });
    };

    match *instr {
        Instruction::Mov { target, value } => {
            out[0] = Opcode::Mov.to_u8();
            out[1] = target.to_u8();
            out[2..6].copy_from_slice(&value.to_le_bytes());
        }

        Instruction::Ld { cond } => out[0] = Opcode::Ld.to_u8() | cond.bits(),
        Instruction::St { cond } => out[0] = Opcode::St.to_u8() | cond.bits(),

        Instruction::Ldp { burst, peripheral } => {
            out[0] = Opcode::Ldp.to_u8() | burst_bit(burst);
            out[1] = peripheral_byte(peripheral);
        }
        Instruction::Stp { burst, peripheral } => {
            out[0] = Opcode::Stp.to_u8() | burst_bit(burst);
            out[1] = peripheral_byte(peripheral);
        }

        Instruction::Lp { slot, count } => {
            out[0] = Opcode::Lp.to_u8() | (slot as u8) << 1;
            // DMAC increments by 1 internally
            out[1] = count.encoded();
        }

        Instruction::LpEnd {
            slot,
            cond,
            forever,
            jump,
        } => {
            let mut op = Opcode::LpEnd.to_u8() | (slot as u8) << 2 | cond.bits();
            if !forever {
                op |= 1 << 4;
            }
            out[0] = op;
            out[1] = jump;
        }

        Instruction::FlushP { peripheral } => {
            out[0] = Opcode::FlushP.to_u8();
            out[1] = peripheral_byte(peripheral);
        }

        Instruction::Wfp { kind, peripheral } => {
            out[0] = Opcode::Wfp.to_u8() | kind.bits();
            out[1] = peripheral_byte(peripheral);
        }

        Instruction::Sev { event } => {
            out[0] = Opcode::Sev.to_u8();
            out[1] = (event.get() & 0x1F) << 3;
        }

        Instruction::End => out[0] = Opcode::End.to_u8(),

        Instruction::Go {
            channel,
            address,
            non_secure,
        } => out.copy_from_slice(&encode_kick(channel, address, non_secure)),
    }

    Ok(size)
}

/// Encode the `DMAGO` kick handed to the debug instruction registers
pub fn encode_kick(channel: ChannelId, address: u32, non_secure: bool) -> [u8; 6] {
    let mut insn = [0u8; 6];
    insn[0] = Opcode::Go.to_u8() | (non_secure as u8) << 1;
    insn[1] = channel.get() & 0x7;
    insn[2..6].copy_from_slice(&address.to_le_bytes());
    insn
}

/// Encode a sequence of instructions into a fresh vector
pub fn encode_all(instrs: &[Instruction]) -> Result<Vec<u8>> {
    let len = instrs.iter().map(Instruction::size).sum();
    let mut code = vec![0u8; len];
    let mut off = 0;
    for instr in instrs {
        off += encode(instr, &mut code[off..])?;
    }
    Ok(code)
}

#[inline]
fn burst_bit(burst: BurstType) -> u8 {
    match burst {
        BurstType::Single => 0,
        BurstType::Burst => 1 << 1,
    }
}

/// Peripheral number in bits 7:3
#[inline]
fn peripheral_byte(peripheral: PeripheralId) -> u8 {
    (peripheral.get() & 0x1F) << 3
}
