//! Instruction formatting to PL330 mnemonic text

use pl330_spec::Instruction;

/// Format instruction as assembly text
pub fn format(instr: &Instruction) -> String {
    let mnemonic = instr.opcode().mnemonic();
    match instr {
        Instruction::End => mnemonic.to_string(),

        // ========== Data movement ==========
        Instruction::Mov { target, value } => format!("{} {} {:#010x}", mnemonic, target, value),
        Instruction::Ld { cond } | Instruction::St { cond } => {
            format!("{}{}", mnemonic, cond.suffix())
        }
        Instruction::Ldp { burst, peripheral } | Instruction::Stp { burst, peripheral } => {
            format!("{}{} {}", mnemonic, burst.suffix(), peripheral.get())
        }

        // ========== Loops ==========
        Instruction::Lp { slot, count } => format!("{}_{} {}", mnemonic, slot, count),
        Instruction::LpEnd {
            slot,
            cond,
            forever,
            jump,
        } => {
            let base = if *forever { "DMALPFE" } else { mnemonic };
            format!("{}{}_{} bjmpto_{:x}", base, cond.suffix(), slot, jump)
        }

        // ========== Peripheral handshake ==========
        Instruction::Wfp { kind, peripheral } => {
            format!("{}{} {}", mnemonic, kind.suffix(), peripheral.get())
        }
        Instruction::FlushP { peripheral } => format!("{} {}", mnemonic, peripheral.get()),
        Instruction::Sev { event } => format!("{} {}", mnemonic, event.get()),

        // ========== Manager ==========
        Instruction::Go {
            channel,
            address,
            non_secure,
        } => {
            let ns = if *non_secure { " ns" } else { "" };
            format!("{} {} {:#010x}{}", mnemonic, channel, address, ns)
        }
    }
}
