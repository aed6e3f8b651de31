//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use pl330_spec::{
    BurstType, ChannelId, Condition, EventId, Instruction, LoopCount, LoopSlot, MoveTarget, Opcode,
    PeripheralId, WaitKind,
};

/// Decode the instruction at `offset`, returning it and its length
pub fn decode(code: &[u8], offset: usize) -> Result<(Instruction, usize)> {
    let op = *code.get(offset).ok_or(DisassemblerError::Truncated {
        offset,
        needed: 1,
        available: 0,
    })?;
    let opcode = classify(op).ok_or(DisassemblerError::UnknownOpcode { offset, byte: op })?;

    let size = opcode.size();
    let bytes = code
        .get(offset..offset + size)
        .ok_or(DisassemblerError::Truncated {
            offset,
            needed: size,
            available: code.len() - offset,
        })?;

    let instr = match opcode {
        Opcode::End => Instruction::End,
        Opcode::Ld => Instruction::Ld {
            cond: decode_condition(op, offset)?,
        },
        Opcode::St => Instruction::St {
            cond: decode_condition(op, offset)?,
        },
        Opcode::Ldp => Instruction::Ldp {
            burst: decode_burst(op),
            peripheral: decode_peripheral(bytes[1], offset + 1)?,
        },
        Opcode::Stp => Instruction::Stp {
            burst: decode_burst(op),
            peripheral: decode_peripheral(bytes[1], offset + 1)?,
        },
        Opcode::Lp => Instruction::Lp {
            slot: if op & 0x02 != 0 { LoopSlot::Lc1 } else { LoopSlot::Lc0 },
            count: LoopCount::from_encoded(bytes[1]),
        },
        Opcode::LpEnd => Instruction::LpEnd {
            slot: if op & 0x04 != 0 { LoopSlot::Lc1 } else { LoopSlot::Lc0 },
            cond: decode_condition(op, offset)?,
            forever: op & 0x10 == 0,
            jump: bytes[1],
        },
        Opcode::Wfp => Instruction::Wfp {
            kind: match op & 0x03 {
                0b00 => WaitKind::Single,
                0b10 => WaitKind::Burst,
                _ => WaitKind::Peripheral,
            },
            peripheral: decode_peripheral(bytes[1], offset + 1)?,
        },
        Opcode::Sev => {
            let byte = bytes[1];
            if byte & 0x07 != 0 {
                return Err(DisassemblerError::InvalidOperand {
                    offset: offset + 1,
                    byte,
                });
            }
            Instruction::Sev {
                event: EventId::truncating(byte >> 3),
            }
        }
        Opcode::FlushP => Instruction::FlushP {
            peripheral: decode_peripheral(bytes[1], offset + 1)?,
        },
        Opcode::Mov => Instruction::Mov {
            target: MoveTarget::from_u8(bytes[1]).ok_or(DisassemblerError::InvalidOperand {
                offset: offset + 1,
                byte: bytes[1],
            })?,
            value: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
        },
        Opcode::Go => Instruction::Go {
            channel: ChannelId::new(bytes[1]).map_err(|_| DisassemblerError::InvalidOperand {
                offset: offset + 1,
                byte: bytes[1],
            })?,
            address: u32::from_le_bytes([bytes[2], bytes[3], bytes[4], bytes[5]]),
            non_secure: op & 0x02 != 0,
        },
    };

    Ok((instr, size))
}

/// Decode a whole instruction stream
pub fn decode_all(code: &[u8]) -> Result<Vec<(usize, Instruction)>> {
    let mut out = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        let (instr, size) = decode(code, offset)?;
        out.push((offset, instr));
        offset += size;
    }
    Ok(out)
}

/// Map an opcode byte to its instruction.
///
/// `DMALPFE` on LC0 with a single or burst condition shares its byte with
/// `DMASTP`; the generator never emits it, so those bytes decode as `DMASTP`.
fn classify(op: u8) -> Option<Opcode> {
    match op {
        0x00 => Some(Opcode::End),
        0x04 | 0x05 | 0x07 => Some(Opcode::Ld),
        0x08 | 0x09 | 0x0B => Some(Opcode::St),
        0x20 | 0x22 => Some(Opcode::Lp),
        0x25 | 0x27 => Some(Opcode::Ldp),
        0x29 | 0x2B => Some(Opcode::Stp),
        0x30..=0x32 => Some(Opcode::Wfp),
        0x34 => Some(Opcode::Sev),
        0x35 => Some(Opcode::FlushP),
        0xA0 | 0xA2 => Some(Opcode::Go),
        0xBC => Some(Opcode::Mov),
        // 001n_1lcc
        op if op & 0xE8 == 0x28 && op & 0x03 != 0x02 => Some(Opcode::LpEnd),
        _ => None,
    }
}

fn decode_condition(op: u8, offset: usize) -> Result<Condition> {
    match op & 0x03 {
        0b00 => Ok(Condition::Always),
        0b01 => Ok(Condition::Single),
        0b11 => Ok(Condition::Burst),
        _ => Err(DisassemblerError::InvalidOperand { offset, byte: op }),
    }
}

fn decode_burst(op: u8) -> BurstType {
    if op & 0x02 != 0 {
        BurstType::Burst
    } else {
        BurstType::Single
    }
}

fn decode_peripheral(byte: u8, offset: usize) -> Result<PeripheralId> {
    if byte & 0x07 != 0 {
        return Err(DisassemblerError::InvalidOperand { offset, byte });
    }
    Ok(PeripheralId::truncating(byte >> 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_end() {
        assert_eq!(decode(&[0x00], 0).unwrap(), (Instruction::End, 1));
    }

    #[test]
    fn test_decode_mov() {
        let code = [0xBC, 0x01, 0x01, 0x48, 0x00, 0x02];
        assert_eq!(
            decode(&code, 0).unwrap(),
            (
                Instruction::Mov {
                    target: MoveTarget::Ccr,
                    value: 0x0200_4801,
                },
                6
            )
        );
    }

    #[test]
    fn test_decode_lpend() {
        let (instr, _) = decode(&[0x3C, 0x02], 0).unwrap();
        assert_eq!(
            instr,
            Instruction::LpEnd {
                slot: LoopSlot::Lc1,
                cond: Condition::Always,
                forever: false,
                jump: 2,
            }
        );
    }

    #[test]
    fn test_decode_at_offset() {
        let code = [0x04, 0x08, 0x34, 0x18];
        let (instr, size) = decode(&code, 2).unwrap();
        assert_eq!(size, 2);
        assert_eq!(
            instr,
            Instruction::Sev {
                event: EventId::new(3).unwrap()
            }
        );
    }

    #[test]
    fn test_unknown_opcode() {
        assert_eq!(
            decode(&[0xFF], 0),
            Err(DisassemblerError::UnknownOpcode { offset: 0, byte: 0xFF })
        );
        // DMALD with the reserved condition encoding
        assert!(decode(&[0x06], 0).is_err());
    }

    #[test]
    fn test_truncated() {
        assert_eq!(
            decode(&[0xBC, 0x00, 0x00], 0),
            Err(DisassemblerError::Truncated {
                offset: 0,
                needed: 6,
                available: 3
            })
        );
        assert!(decode(&[], 0).is_err());
    }

    #[test]
    fn test_invalid_operands() {
        assert_eq!(
            decode(&[0x35, 0x09], 0),
            Err(DisassemblerError::InvalidOperand { offset: 1, byte: 0x09 })
        );
        assert!(decode(&[0xBC, 0x03, 0, 0, 0, 0], 0).is_err());
        assert!(decode(&[0xA0, 0x08, 0, 0, 0, 0], 0).is_err());
    }

    #[test]
    fn test_decode_all() {
        let code = [0x22, 0x03, 0x04, 0x08, 0x3C, 0x02, 0x00];
        let instrs = decode_all(&code).unwrap();
        let offsets: Vec<usize> = instrs.iter().map(|(off, _)| *off).collect();
        assert_eq!(offsets, vec![0, 2, 3, 4, 6]);
    }
}
