//! Instruction encoding to VM16 machine words
//!
//! One opcode word, then one word per operand in the order given by
//! [`Opcode::operands`](vm16_isa::Opcode::operands).

use vm16_isa::{Instruction, Operand, Register, Word};

/// Encode instruction to its machine words
pub fn encode(instr: &Instruction) -> Vec<Word> {
    let mut words = Vec::with_capacity(instr.width());
    words.push(instr.opcode().to_word());

    match instr {
        Instruction::Nop
        | Instruction::Stc
        | Instruction::Clc
        | Instruction::Sto
        | Instruction::Clo
        | Instruction::Stz
        | Instruction::Clz
        | Instruction::Stdz
        | Instruction::Cldz => {}

        Instruction::Mov { dst, src }
        | Instruction::Mul { dst, src }
        | Instruction::Imul { dst, src }
        | Instruction::Div { dst, den: src }
        | Instruction::Idiv { dst, den: src } => {
            words.extend([reg(*dst), reg(*src)]);
        }
        Instruction::Exchange { a, b } => words.extend([reg(*a), reg(*b)]),
        Instruction::Load { dst, addr } => words.extend([reg(*dst), *addr]),
        Instruction::Store { addr, src } => words.extend([*addr, reg(*src)]),
        Instruction::LoadImm { dst, value } => words.extend([reg(*dst), *value]),
        Instruction::StoreImm { addr, value } => words.extend([*addr, *value]),

        Instruction::LoadFlags { dst: r }
        | Instruction::StoreFlags { src: r }
        | Instruction::Inc { dst: r }
        | Instruction::Dec { dst: r }
        | Instruction::Neg { dst: r }
        | Instruction::Not { dst: r }
        | Instruction::AddAcc { src: r }
        | Instruction::SubAcc { src: r }
        | Instruction::AndAcc { src: r }
        | Instruction::OrAcc { src: r }
        | Instruction::XorAcc { src: r } => words.push(reg(*r)),

        Instruction::Add { dst, src }
        | Instruction::Adc { dst, src }
        | Instruction::Sub { dst, src }
        | Instruction::Sbb { dst, src }
        | Instruction::And { dst, src }
        | Instruction::Or { dst, src }
        | Instruction::Xor { dst, src }
        | Instruction::Cmp { lhs: dst, rhs: src }
        | Instruction::Test { lhs: dst, rhs: src } => {
            words.extend([reg(*dst), operand(src)]);
        }

        Instruction::Shift { dst, count, .. } => words.extend([reg(*dst), *count]),

        Instruction::Jump { target, .. } => words.push(operand(target)),
        Instruction::Halt { result } => words.push(operand(result)),
    }

    words
}

#[inline]
fn reg(r: Register) -> Word {
    r.to_word()
}

#[inline]
fn operand(op: &Operand) -> Word {
    match op {
        Operand::Reg(r) => r.to_word(),
        Operand::Imm(value) => *value,
    }
}
