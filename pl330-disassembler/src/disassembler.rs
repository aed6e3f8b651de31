//! Program listings

use crate::decoder::decode;
use crate::error::Result;
use crate::formatter::format;
use pl330_spec::Program;

// Widest instruction is six bytes: "xx " * 6
const HEX_COLUMN: usize = 18;

/// Disassemble a program into an annotated listing
pub fn disassemble(program: &Program) -> Result<String> {
    let body = disassemble_bytes(&program.code)?;

    let mut output = String::new();
    output.push_str("; PL330 Disassembly\n");
    output.push_str(&format!(
        "; Channel: {} ({}), event {}\n",
        program.channel,
        if program.non_secure { "non-secure" } else { "secure" },
        program.event.get()
    ));
    output.push_str(&format!(
        "; Code size: {} bytes ({} instructions)\n",
        program.len(),
        body.lines().count()
    ));
    output.push('\n');
    output.push_str(&body);
    Ok(output)
}

/// Disassemble a raw instruction stream, one line per instruction
pub fn disassemble_bytes(code: &[u8]) -> Result<String> {
    let mut output = String::new();
    let mut offset = 0;

    while offset < code.len() {
        let (instr, size) = decode(code, offset)?;

        let mut hex = String::with_capacity(HEX_COLUMN);
        for byte in &code[offset..offset + size] {
            hex.push_str(&format!("{:02x} ", byte));
        }
        output.push_str(&format!(
            "0x{:04x}:  {:<width$}{}\n",
            offset,
            hex,
            format(&instr),
            width = HEX_COLUMN
        ));

        offset += size;
    }

    Ok(output)
}
