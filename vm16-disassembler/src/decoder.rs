//! Instruction decoder

use crate::error::{DecodeError, DisassemblerError, Result};
use vm16_isa::encoding::split_jump_opcode;
use vm16_isa::{
    Address, Condition, Instruction, IsaError, Opcode, Operand, Register, ShiftOp, Word,
};

/// Decode the instruction whose opcode word is at `addr`.
///
/// Operand words are fetched from the following addresses, wrapping at the
/// top of memory.
pub fn decode_at<F>(addr: Address, fetch: F) -> std::result::Result<Instruction, DecodeError>
where
    F: Fn(Address) -> Word,
{
    let word = fetch(addr);
    let opcode = Opcode::from_word(word).map_err(|err| match err {
        IsaError::ReservedOpcode(opcode) => DecodeError::ReservedOpcode { address: addr, opcode },
        _ => DecodeError::UnknownOpcode { address: addr, word },
    })?;

    let operand = |index: u16| fetch(addr.wrapping_add(1 + index));
    let reg = |index: u16| -> std::result::Result<Register, DecodeError> {
        let id = operand(index);
        Register::from_word(id).map_err(|_| DecodeError::InvalidRegister { address: addr, id })
    };
    let src_reg = |index: u16| -> std::result::Result<Operand, DecodeError> {
        Ok(Operand::Reg(reg(index)?))
    };
    let src_imm = |index: u16| Operand::Imm(operand(index));

    let instr = match opcode {
        // ========== Data movement ==========
        Opcode::Nop => Instruction::Nop,
        Opcode::Mov => Instruction::Mov { dst: reg(0)?, src: reg(1)? },
        Opcode::Ld => Instruction::Load { dst: reg(0)?, addr: operand(1) },
        Opcode::St => Instruction::Store { addr: operand(0), src: reg(1)? },
        Opcode::Ldi => Instruction::LoadImm { dst: reg(0)?, value: operand(1) },
        Opcode::Sti => Instruction::StoreImm { addr: operand(0), value: operand(1) },
        Opcode::Xchg => Instruction::Exchange { a: reg(0)?, b: reg(1)? },
        Opcode::Lfl => Instruction::LoadFlags { dst: reg(0)? },
        Opcode::Sfl => Instruction::StoreFlags { src: reg(0)? },

        // ========== Arithmetic ==========
        Opcode::Add => Instruction::Add { dst: reg(0)?, src: src_reg(1)? },
        Opcode::AddImm => Instruction::Add { dst: reg(0)?, src: src_imm(1) },
        Opcode::Adc => Instruction::Adc { dst: reg(0)?, src: src_reg(1)? },
        Opcode::AdcImm => Instruction::Adc { dst: reg(0)?, src: src_imm(1) },
        Opcode::Sub => Instruction::Sub { dst: reg(0)?, src: src_reg(1)? },
        Opcode::SubImm => Instruction::Sub { dst: reg(0)?, src: src_imm(1) },
        Opcode::Sbb => Instruction::Sbb { dst: reg(0)?, src: src_reg(1)? },
        Opcode::SbbImm => Instruction::Sbb { dst: reg(0)?, src: src_imm(1) },
        Opcode::Cmp => Instruction::Cmp { lhs: reg(0)?, rhs: src_reg(1)? },
        Opcode::CmpImm => Instruction::Cmp { lhs: reg(0)?, rhs: src_imm(1) },
        Opcode::Inc => Instruction::Inc { dst: reg(0)? },
        Opcode::Dec => Instruction::Dec { dst: reg(0)? },
        Opcode::Neg => Instruction::Neg { dst: reg(0)? },
        Opcode::Mul => Instruction::Mul { dst: reg(0)?, src: reg(1)? },
        Opcode::Imul => Instruction::Imul { dst: reg(0)?, src: reg(1)? },
        Opcode::Div => Instruction::Div { dst: reg(0)?, den: reg(1)? },
        Opcode::Idiv => Instruction::Idiv { dst: reg(0)?, den: reg(1)? },
        Opcode::AddAcc => Instruction::AddAcc { src: reg(0)? },
        Opcode::SubAcc => Instruction::SubAcc { src: reg(0)? },

        // ========== Logic ==========
        Opcode::And => Instruction::And { dst: reg(0)?, src: src_reg(1)? },
        Opcode::AndImm => Instruction::And { dst: reg(0)?, src: src_imm(1) },
        Opcode::Or => Instruction::Or { dst: reg(0)?, src: src_reg(1)? },
        Opcode::OrImm => Instruction::Or { dst: reg(0)?, src: src_imm(1) },
        Opcode::Xor => Instruction::Xor { dst: reg(0)?, src: src_reg(1)? },
        Opcode::XorImm => Instruction::Xor { dst: reg(0)?, src: src_imm(1) },
        Opcode::Not => Instruction::Not { dst: reg(0)? },
        Opcode::Test => Instruction::Test { lhs: reg(0)?, rhs: src_reg(1)? },
        Opcode::TestImm => Instruction::Test { lhs: reg(0)?, rhs: src_imm(1) },
        Opcode::AndAcc => Instruction::AndAcc { src: reg(0)? },
        Opcode::OrAcc => Instruction::OrAcc { src: reg(0)? },
        Opcode::XorAcc => Instruction::XorAcc { src: reg(0)? },

        // ========== Processor control ==========
        Opcode::Stc => Instruction::Stc,
        Opcode::Clc => Instruction::Clc,
        Opcode::Sto => Instruction::Sto,
        Opcode::Clo => Instruction::Clo,
        Opcode::Stz => Instruction::Stz,
        Opcode::Clz => Instruction::Clz,
        Opcode::Stdz => Instruction::Stdz,
        Opcode::Cldz => Instruction::Cldz,
        Opcode::Halt => Instruction::Halt { result: src_reg(0)? },
        Opcode::HaltImm => Instruction::Halt { result: src_imm(0) },

        // ========== Shifts and jumps ==========
        other => {
            if let Some(op) = ShiftOp::from_opcode(other) {
                Instruction::Shift { op, dst: reg(0)?, count: operand(1) }
            } else {
                let (index, immediate) = split_jump_opcode(other.to_u8())
                    .ok_or(DecodeError::UnknownOpcode { address: addr, word })?;
                let cond = Condition::from_index(index)
                    .ok_or(DecodeError::UnknownOpcode { address: addr, word })?;
                let target = if immediate { src_imm(0) } else { src_reg(0)? };
                Instruction::Jump { cond, target }
            }
        }
    };

    Ok(instr)
}

/// Decode one instruction from the start of `words`
pub fn decode(words: &[Word]) -> Result<Instruction> {
    let first = *words.first().ok_or(DisassemblerError::Truncated { needed: 1, found: 0 })?;
    if let Ok(opcode) = Opcode::from_word(first) {
        if words.len() < opcode.width() {
            return Err(DisassemblerError::Truncated { needed: opcode.width(), found: words.len() });
        }
    }
    Ok(decode_at(0, |addr| words.get(addr as usize).copied().unwrap_or(0))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nop() {
        assert_eq!(decode(&[0x00]).unwrap(), Instruction::Nop);
    }

    #[test]
    fn test_decode_register_and_immediate_forms() {
        assert_eq!(
            decode(&[0x10, 1, 2]).unwrap(),
            Instruction::Add { dst: Register::R1, src: Operand::Reg(Register::R2) }
        );
        assert_eq!(
            decode(&[0x11, 1, 0xFFFF]).unwrap(),
            Instruction::Add { dst: Register::R1, src: Operand::Imm(0xFFFF) }
        );
    }

    #[test]
    fn test_decode_accumulator_forms() {
        assert_eq!(decode(&[0x21, 7]).unwrap(), Instruction::AddAcc { src: Register::R7 });
        assert_eq!(decode(&[0x22, 0]).unwrap(), Instruction::SubAcc { src: Register::R0 });
        assert_eq!(decode(&[0x31, 17]).unwrap(), Instruction::AndAcc { src: Register::Rp });
        assert_eq!(decode(&[0x32, 2]).unwrap(), Instruction::OrAcc { src: Register::R2 });
        assert_eq!(decode(&[0x33, 15]).unwrap(), Instruction::XorAcc { src: Register::R15 });
        assert_eq!(
            decode(&[0x33]).unwrap_err(),
            DisassemblerError::Truncated { needed: 2, found: 1 }
        );
    }

    #[test]
    fn test_decode_jumps() {
        assert_eq!(
            decode(&[0x51, 0x0010]).unwrap(),
            Instruction::Jump { cond: Condition::Always, target: Operand::Imm(0x0010) }
        );
        assert_eq!(
            decode(&[0x64, 16]).unwrap(),
            Instruction::Jump {
                cond: Condition::NotDivideByZero,
                target: Operand::Reg(Register::Rip)
            }
        );
    }

    #[test]
    fn test_decode_shift() {
        assert_eq!(
            decode(&[0x45, 3, 4]).unwrap(),
            Instruction::Shift { op: ShiftOp::Rcls, dst: Register::R3, count: 4 }
        );
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            decode(&[0x0100]).unwrap_err(),
            DisassemblerError::from(DecodeError::UnknownOpcode { address: 0, word: 0x0100 })
        );
        assert_eq!(
            decode(&[0x09]).unwrap_err(),
            DisassemblerError::from(DecodeError::ReservedOpcode { address: 0, opcode: 0x09 })
        );
        assert_eq!(
            decode(&[0x01, 0, 18]).unwrap_err(),
            DisassemblerError::from(DecodeError::InvalidRegister { address: 0, id: 18 })
        );
        assert_eq!(
            decode(&[0x10, 1]).unwrap_err(),
            DisassemblerError::Truncated { needed: 3, found: 2 }
        );
    }

    #[test]
    fn test_decode_at_wraps_operands() {
        let fetch = |addr: Address| match addr {
            0xFFFF => Opcode::Inc.to_word(),
            0x0000 => 5,
            _ => 0,
        };
        assert_eq!(decode_at(0xFFFF, fetch).unwrap(), Instruction::Inc { dst: Register::R5 });
    }
}
