//! VM16 Instruction Set
//!
//! ## Operand Shapes
//! - `op`: NOP, flag set/clear
//! - `op reg`: INC, DEC, NEG, NOT, LFL, SFL, register jumps, HALT, accumulator forms
//! - `op reg, reg`: MOV, XCHG, ALU register forms, MUL/IMUL/DIV/IDIV
//! - `op reg, imm`: LDI, ALU immediate forms, shifts (count)
//! - `op reg, [addr]`: LD
//! - `op [addr], reg|imm`: ST, STI
//! - `op addr`: immediate jumps

use crate::encoding;
use crate::flags::Flags;
use crate::opcode::Opcode;
use crate::register::Register;
use crate::{Address, Word};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Second operand of instructions that accept a register or a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operand {
    Reg(Register),
    Imm(Word),
}

impl Operand {
    #[inline]
    pub fn is_immediate(self) -> bool {
        matches!(self, Operand::Imm(_))
    }
}

impl From<Register> for Operand {
    fn from(reg: Register) -> Self {
        Operand::Reg(reg)
    }
}

impl From<Word> for Operand {
    fn from(value: Word) -> Self {
        Operand::Imm(value)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "{}", reg),
            Operand::Imm(value) => write!(f, "{:#06x}", value),
        }
    }
}

/// Jump condition, evaluated against the flags register
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Always = 0,
    Zero = 1,
    NotZero = 2,
    Sign = 3,
    NotSign = 4,
    Carry = 5,
    NotCarry = 6,
    Overflow = 7,
    NotOverflow = 8,
    DivideByZero = 9,
    NotDivideByZero = 10,
}

impl Condition {
    pub const ALL: [Condition; 11] = [
        Condition::Always,
        Condition::Zero,
        Condition::NotZero,
        Condition::Sign,
        Condition::NotSign,
        Condition::Carry,
        Condition::NotCarry,
        Condition::Overflow,
        Condition::NotOverflow,
        Condition::DivideByZero,
        Condition::NotDivideByZero,
    ];

    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// Whether a jump with this condition is taken
    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Condition::Always => true,
            Condition::Zero => flags.zero(),
            Condition::NotZero => !flags.zero(),
            Condition::Sign => flags.sign(),
            Condition::NotSign => !flags.sign(),
            Condition::Carry => flags.carry(),
            Condition::NotCarry => !flags.carry(),
            Condition::Overflow => flags.overflow(),
            Condition::NotOverflow => !flags.overflow(),
            Condition::DivideByZero => flags.divide_by_zero(),
            Condition::NotDivideByZero => !flags.divide_by_zero(),
        }
    }

    pub fn mnemonic(self) -> &'static str {
        self.opcode(false).mnemonic()
    }

    /// Jump opcode for this condition and target kind
    pub fn opcode(self, immediate: bool) -> Opcode {
        let value = encoding::jump_opcode(self.index(), immediate);
        // Every condition index maps into the assigned part of the jump range.
        Opcode::from_u8(value).unwrap_or(Opcode::Jmp)
    }
}

/// Shift and rotate operations
///
/// Signed variants keep bit 15 in place and operate on the low 15 bits.
/// The `*c` shift forms fill vacated bits from the carry flag; `rc*` rotates
/// thread the carry flag through the rotation as an extra bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftOp {
    Shl,
    Sal,
    Shr,
    Sar,
    Rol,
    Rols,
    Ror,
    Rors,
    Shlc,
    Salc,
    Shrc,
    Sarc,
    Rcl,
    Rcls,
    Rcr,
    Rcrs,
}

impl ShiftOp {
    pub const ALL: [ShiftOp; 16] = [
        ShiftOp::Shl,
        ShiftOp::Sal,
        ShiftOp::Shr,
        ShiftOp::Sar,
        ShiftOp::Rol,
        ShiftOp::Rols,
        ShiftOp::Ror,
        ShiftOp::Rors,
        ShiftOp::Shlc,
        ShiftOp::Salc,
        ShiftOp::Shrc,
        ShiftOp::Sarc,
        ShiftOp::Rcl,
        ShiftOp::Rcls,
        ShiftOp::Rcr,
        ShiftOp::Rcrs,
    ];

    pub fn opcode(self) -> Opcode {
        match self {
            ShiftOp::Shl => Opcode::Shl,
            ShiftOp::Sal => Opcode::Sal,
            ShiftOp::Shr => Opcode::Shr,
            ShiftOp::Sar => Opcode::Sar,
            ShiftOp::Rol => Opcode::Rol,
            ShiftOp::Rols => Opcode::Rols,
            ShiftOp::Ror => Opcode::Ror,
            ShiftOp::Rors => Opcode::Rors,
            ShiftOp::Shlc => Opcode::Shlc,
            ShiftOp::Salc => Opcode::Salc,
            ShiftOp::Shrc => Opcode::Shrc,
            ShiftOp::Sarc => Opcode::Sarc,
            ShiftOp::Rcl => Opcode::Rcl,
            ShiftOp::Rcls => Opcode::Rcls,
            ShiftOp::Rcr => Opcode::Rcr,
            ShiftOp::Rcrs => Opcode::Rcrs,
        }
    }

    pub fn from_opcode(opcode: Opcode) -> Option<Self> {
        Self::ALL.iter().copied().find(|op| op.opcode() == opcode)
    }

    #[inline]
    pub fn is_left(self) -> bool {
        matches!(
            self,
            ShiftOp::Shl
                | ShiftOp::Sal
                | ShiftOp::Rol
                | ShiftOp::Rols
                | ShiftOp::Shlc
                | ShiftOp::Salc
                | ShiftOp::Rcl
                | ShiftOp::Rcls
        )
    }

    #[inline]
    pub fn is_rotate(self) -> bool {
        matches!(
            self,
            ShiftOp::Rol
                | ShiftOp::Rols
                | ShiftOp::Ror
                | ShiftOp::Rors
                | ShiftOp::Rcl
                | ShiftOp::Rcls
                | ShiftOp::Rcr
                | ShiftOp::Rcrs
        )
    }

    #[inline]
    pub fn is_signed(self) -> bool {
        matches!(
            self,
            ShiftOp::Sal
                | ShiftOp::Sar
                | ShiftOp::Rols
                | ShiftOp::Rors
                | ShiftOp::Salc
                | ShiftOp::Sarc
                | ShiftOp::Rcls
                | ShiftOp::Rcrs
        )
    }

    /// Whether the incoming carry flag takes part in the operation
    #[inline]
    pub fn uses_carry(self) -> bool {
        matches!(
            self,
            ShiftOp::Shlc
                | ShiftOp::Salc
                | ShiftOp::Shrc
                | ShiftOp::Sarc
                | ShiftOp::Rcl
                | ShiftOp::Rcls
                | ShiftOp::Rcr
                | ShiftOp::Rcrs
        )
    }

    pub fn mnemonic(self) -> &'static str {
        self.opcode().mnemonic()
    }
}

/// VM16 Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    // ========== Data movement ==========
    /// NOP
    Nop,

    /// MOV: dst = src
    Mov { dst: Register, src: Register },

    /// LD: dst = mem[addr]
    Load { dst: Register, addr: Address },

    /// ST: mem[addr] = src
    Store { addr: Address, src: Register },

    /// LDI: dst = value
    LoadImm { dst: Register, value: Word },

    /// STI: mem[addr] = value
    StoreImm { addr: Address, value: Word },

    /// XCHG: swap a and b
    Exchange { a: Register, b: Register },

    /// LFL: dst = flags
    LoadFlags { dst: Register },

    /// SFL: flags = src (reserved bits dropped)
    StoreFlags { src: Register },

    // ========== Arithmetic ==========
    /// ADD: dst = dst + src
    Add { dst: Register, src: Operand },

    /// ADC: dst = dst + src + carry
    Adc { dst: Register, src: Operand },

    /// SUB: dst = dst - src
    Sub { dst: Register, src: Operand },

    /// SBB: dst = dst - src - carry
    Sbb { dst: Register, src: Operand },

    /// CMP: flags of lhs - rhs, nothing written back
    Cmp { lhs: Register, rhs: Operand },

    /// INC: dst = dst + 1
    Inc { dst: Register },

    /// DEC: dst = dst - 1
    Dec { dst: Register },

    /// NEG: dst = 0 - dst
    Neg { dst: Register },

    /// MUL: src:dst = dst * src (unsigned)
    Mul { dst: Register, src: Register },

    /// IMUL: src:dst = dst * src (signed)
    Imul { dst: Register, src: Register },

    /// DIV: dst = dst / den, den = dst % den (unsigned)
    Div { dst: Register, den: Register },

    /// IDIV: dst = dst / den, den = dst % den (signed, truncating)
    Idiv { dst: Register, den: Register },

    /// ADDA: r0 = r0 + src
    AddAcc { src: Register },

    /// SUBA: r0 = r0 - src
    SubAcc { src: Register },

    // ========== Logic ==========
    /// AND: dst = dst & src
    And { dst: Register, src: Operand },

    /// OR: dst = dst | src
    Or { dst: Register, src: Operand },

    /// XOR: dst = dst ^ src
    Xor { dst: Register, src: Operand },

    /// NOT: dst = !dst
    Not { dst: Register },

    /// TEST: flags of lhs & rhs, nothing written back
    Test { lhs: Register, rhs: Operand },

    /// ANDA: r0 = r0 & src
    AndAcc { src: Register },

    /// ORA: r0 = r0 | src
    OrAcc { src: Register },

    /// XORA: r0 = r0 ^ src
    XorAcc { src: Register },

    // ========== Shift/rotate ==========
    /// Shift or rotate dst by (count & 0x1F)
    Shift { op: ShiftOp, dst: Register, count: Word },

    // ========== Control flow ==========
    /// if cond holds: rip = target
    Jump { cond: Condition, target: Operand },

    // ========== Processor control ==========
    /// Set carry
    Stc,
    /// Clear carry
    Clc,
    /// Set overflow
    Sto,
    /// Clear overflow
    Clo,
    /// Set zero
    Stz,
    /// Clear zero
    Clz,
    /// Set divide-by-zero
    Stdz,
    /// Clear divide-by-zero
    Cldz,

    /// HALT: stop, yielding the operand as the result word
    Halt { result: Operand },
}

impl Instruction {
    /// Opcode this instruction encodes to
    pub fn opcode(&self) -> Opcode {
        let pick = |operand: &Operand, reg: Opcode, imm: Opcode| {
            if operand.is_immediate() {
                imm
            } else {
                reg
            }
        };

        match self {
            Instruction::Nop => Opcode::Nop,
            Instruction::Mov { .. } => Opcode::Mov,
            Instruction::Load { .. } => Opcode::Ld,
            Instruction::Store { .. } => Opcode::St,
            Instruction::LoadImm { .. } => Opcode::Ldi,
            Instruction::StoreImm { .. } => Opcode::Sti,
            Instruction::Exchange { .. } => Opcode::Xchg,
            Instruction::LoadFlags { .. } => Opcode::Lfl,
            Instruction::StoreFlags { .. } => Opcode::Sfl,
            Instruction::Add { src, .. } => pick(src, Opcode::Add, Opcode::AddImm),
            Instruction::Adc { src, .. } => pick(src, Opcode::Adc, Opcode::AdcImm),
            Instruction::Sub { src, .. } => pick(src, Opcode::Sub, Opcode::SubImm),
            Instruction::Sbb { src, .. } => pick(src, Opcode::Sbb, Opcode::SbbImm),
            Instruction::Cmp { rhs, .. } => pick(rhs, Opcode::Cmp, Opcode::CmpImm),
            Instruction::Inc { .. } => Opcode::Inc,
            Instruction::Dec { .. } => Opcode::Dec,
            Instruction::Neg { .. } => Opcode::Neg,
            Instruction::Mul { .. } => Opcode::Mul,
            Instruction::Imul { .. } => Opcode::Imul,
            Instruction::Div { .. } => Opcode::Div,
            Instruction::Idiv { .. } => Opcode::Idiv,
            Instruction::AddAcc { .. } => Opcode::AddAcc,
            Instruction::SubAcc { .. } => Opcode::SubAcc,
            Instruction::And { src, .. } => pick(src, Opcode::And, Opcode::AndImm),
            Instruction::Or { src, .. } => pick(src, Opcode::Or, Opcode::OrImm),
            Instruction::Xor { src, .. } => pick(src, Opcode::Xor, Opcode::XorImm),
            Instruction::Not { .. } => Opcode::Not,
            Instruction::Test { rhs, .. } => pick(rhs, Opcode::Test, Opcode::TestImm),
            Instruction::AndAcc { .. } => Opcode::AndAcc,
            Instruction::OrAcc { .. } => Opcode::OrAcc,
            Instruction::XorAcc { .. } => Opcode::XorAcc,
            Instruction::Shift { op, .. } => op.opcode(),
            Instruction::Jump { cond, target } => cond.opcode(target.is_immediate()),
            Instruction::Stc => Opcode::Stc,
            Instruction::Clc => Opcode::Clc,
            Instruction::Sto => Opcode::Sto,
            Instruction::Clo => Opcode::Clo,
            Instruction::Stz => Opcode::Stz,
            Instruction::Clz => Opcode::Clz,
            Instruction::Stdz => Opcode::Stdz,
            Instruction::Cldz => Opcode::Cldz,
            Instruction::Halt { result } => pick(result, Opcode::Halt, Opcode::HaltImm),
        }
    }

    /// Get instruction mnemonic
    pub fn mnemonic(&self) -> &'static str {
        self.opcode().mnemonic()
    }

    /// Encoded size in words
    pub fn width(&self) -> usize {
        self.opcode().width()
    }

    /// Whether the instruction can redirect `rip` by itself
    pub fn is_control_flow(&self) -> bool {
        matches!(self, Instruction::Jump { .. })
    }

    /// Whether executing the instruction rewrites the flags register
    pub fn affects_flags(&self) -> bool {
        match self {
            Instruction::StoreFlags { .. }
            | Instruction::Stc
            | Instruction::Clc
            | Instruction::Sto
            | Instruction::Clo
            | Instruction::Stz
            | Instruction::Clz
            | Instruction::Stdz
            | Instruction::Cldz => true,
            _ => self.opcode().family().affects_flags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_selection_by_operand() {
        let reg = Instruction::Add { dst: Register::R0, src: Operand::Reg(Register::R1) };
        let imm = Instruction::Add { dst: Register::R0, src: Operand::Imm(7) };
        assert_eq!(reg.opcode(), Opcode::Add);
        assert_eq!(imm.opcode(), Opcode::AddImm);
        assert_eq!(reg.width(), 3);

        let acc = Instruction::SubAcc { src: Register::R3 };
        assert_eq!(acc.opcode(), Opcode::SubAcc);
        assert_eq!(acc.mnemonic(), "suba");
        assert_eq!(acc.width(), 2);
    }

    #[test]
    fn test_jump_opcodes() {
        for cond in Condition::ALL {
            let reg = cond.opcode(false);
            let imm = cond.opcode(true);
            assert_eq!(reg.to_u8(), 0x50 + 2 * cond.index());
            assert_eq!(imm.to_u8(), reg.to_u8() + 1);
            assert!(reg.is_jump());
        }
        assert_eq!(Condition::NotDivideByZero.mnemonic(), "jndz");
    }

    #[test]
    fn test_condition_evaluation() {
        let mut flags = Flags::EMPTY;
        assert!(Condition::Always.holds(flags));
        assert!(Condition::NotZero.holds(flags));
        assert!(!Condition::Zero.holds(flags));

        flags.set(crate::Flag::DivideByZero, true);
        assert!(Condition::DivideByZero.holds(flags));
        assert!(!Condition::NotDivideByZero.holds(flags));
    }

    #[test]
    fn test_shift_op_properties() {
        assert!(ShiftOp::Rcls.is_left());
        assert!(ShiftOp::Rcls.is_rotate());
        assert!(ShiftOp::Rcls.is_signed());
        assert!(ShiftOp::Rcls.uses_carry());
        assert!(!ShiftOp::Shr.is_left());
        assert!(!ShiftOp::Shr.uses_carry());
        for op in ShiftOp::ALL {
            assert_eq!(ShiftOp::from_opcode(op.opcode()), Some(op));
        }
    }

    #[test]
    fn test_flag_effects() {
        assert!(Instruction::Cmp { lhs: Register::R0, rhs: Operand::Imm(0) }.affects_flags());
        assert!(Instruction::Stc.affects_flags());
        assert!(Instruction::OrAcc { src: Register::R1 }.affects_flags());
        assert!(!Instruction::Mov { dst: Register::R0, src: Register::R1 }.affects_flags());
        assert!(!Instruction::Jump { cond: Condition::Always, target: Operand::Imm(0) }
            .affects_flags());
    }
}
