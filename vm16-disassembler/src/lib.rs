//! # VM16 Disassembler
//!
//! Decode VM16 machine words back into [`Instruction`](vm16_isa::Instruction)s
//! and render them as assembly text.
//!
//! ## Example
//!
//! ```rust
//! use vm16_disassembler::{decode, format};
//!
//! // add r1, 0x0002
//! let instr = decode(&[0x11, 1, 2]).unwrap();
//! assert_eq!(format(&instr), "add r1, 0x0002");
//! ```

pub mod error;
pub mod decoder;
pub mod formatter;
pub mod disassembler;

pub use error::{DecodeError, DisassemblerError, Result};
pub use disassembler::disassemble;
pub use decoder::{decode, decode_at};
pub use formatter::format;

#[cfg(test)]
mod tests {
    use super::*;
    use vm16_isa::{Instruction, MemoryImage, Opcode, Register};

    #[test]
    fn test_decode_function() {
        let instr = decode(&[Opcode::Lfl.to_word(), 4]).unwrap();
        assert_eq!(instr, Instruction::LoadFlags { dst: Register::R4 });
    }

    #[test]
    fn test_disassemble_function() {
        let output = disassemble(&MemoryImage::zeroed(), 0, 1);
        assert!(output.contains("VM16 Disassembly"));
        assert!(output.contains("nop"));
    }

    #[test]
    fn test_error_address() {
        let err = decode(&[0x7F]).unwrap_err();
        assert_eq!(err.address(), Some(0));
        assert!(err.to_string().contains("Reserved opcode 0x7F"));
    }
}
