//! Instruction formatting to VM16 assembly text
//!
//! The output is accepted back by the assembler.

use vm16_isa::{Instruction, Operand, Register};

/// Format instruction as assembly text
pub fn format(instr: &Instruction) -> String {
    let m = instr.mnemonic();
    match instr {
        // ========== Data movement ==========
        Instruction::Nop => m.to_string(),
        Instruction::Mov { dst, src } => format!("{} {}, {}", m, dst, src),
        Instruction::Load { dst, addr } => format!("{} {}, {}", m, dst, format_addr(*addr)),
        Instruction::Store { addr, src } => format!("{} {}, {}", m, format_addr(*addr), src),
        Instruction::LoadImm { dst, value } => format!("{} {}, {}", m, dst, format_imm(*value)),
        Instruction::StoreImm { addr, value } => {
            format!("{} {}, {}", m, format_addr(*addr), format_imm(*value))
        }
        Instruction::Exchange { a, b } => format!("{} {}, {}", m, a, b),
        Instruction::LoadFlags { dst } => format_unary(m, *dst),
        Instruction::StoreFlags { src } => format_unary(m, *src),

        // ========== Arithmetic / Logic ==========
        Instruction::Add { dst, src }
        | Instruction::Adc { dst, src }
        | Instruction::Sub { dst, src }
        | Instruction::Sbb { dst, src }
        | Instruction::And { dst, src }
        | Instruction::Or { dst, src }
        | Instruction::Xor { dst, src } => format_binary(m, *dst, src),
        Instruction::Cmp { lhs, rhs } | Instruction::Test { lhs, rhs } => {
            format_binary(m, *lhs, rhs)
        }
        Instruction::Inc { dst }
        | Instruction::Dec { dst }
        | Instruction::Neg { dst }
        | Instruction::Not { dst } => format_unary(m, *dst),
        Instruction::AddAcc { src }
        | Instruction::SubAcc { src }
        | Instruction::AndAcc { src }
        | Instruction::OrAcc { src }
        | Instruction::XorAcc { src } => format_unary(m, *src),
        Instruction::Mul { dst, src } | Instruction::Imul { dst, src } => {
            format!("{} {}, {}", m, dst, src)
        }
        Instruction::Div { dst, den } | Instruction::Idiv { dst, den } => {
            format!("{} {}, {}", m, dst, den)
        }

        // ========== Shift/rotate ==========
        Instruction::Shift { dst, count, .. } => format!("{} {}, {}", m, dst, count),

        // ========== Control flow ==========
        Instruction::Jump { target, .. } => format!("{} {}", m, format_operand(target)),

        // ========== Processor control ==========
        Instruction::Stc
        | Instruction::Clc
        | Instruction::Sto
        | Instruction::Clo
        | Instruction::Stz
        | Instruction::Clz
        | Instruction::Stdz
        | Instruction::Cldz => m.to_string(),
        Instruction::Halt { result } => format!("{} {}", m, format_operand(result)),
    }
}

fn format_unary(mnemonic: &str, reg: Register) -> String {
    format!("{} {}", mnemonic, reg)
}

fn format_binary(mnemonic: &str, dst: Register, src: &Operand) -> String {
    format!("{} {}, {}", mnemonic, dst, format_operand(src))
}

fn format_operand(operand: &Operand) -> String {
    match operand {
        Operand::Reg(reg) => reg.to_string(),
        Operand::Imm(value) => format_imm(*value),
    }
}

fn format_imm(value: u16) -> String {
    format!("0x{:04X}", value)
}

fn format_addr(addr: u16) -> String {
    format!("[0x{:04X}]", addr)
}
