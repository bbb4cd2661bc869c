//! Instruction execution for VM16
//!
//! Handlers never advance `rip`; the execution loop has already moved it past
//! the instruction. Jumps and any handler whose destination is `rip`
//! overwrite it.

use crate::memory::Memory;
use crate::shift::shift;
use crate::state::VMState;
use tracing::debug;
use vm16_isa::{AluResult, Flag, Flags, Instruction, Operand, Register, SWord, Word};

/// Value of a register-or-immediate operand
#[inline]
fn operand(state: &VMState, op: Operand) -> Word {
    match op {
        Operand::Reg(reg) => state.regs.read(reg),
        Operand::Imm(value) => value,
    }
}

/// Write `result` to `dst` and derive the flags from it
#[inline]
fn write_result(state: &mut VMState, dst: Register, result: AluResult) {
    *state.regs.get(dst) = result.value;
    state.flags = Flags::from_result(&result);
}

/// Execute single instruction
pub fn execute(instr: &Instruction, state: &mut VMState, memory: &mut Memory) {
    match *instr {
        // ========== Data movement ==========
        Instruction::Nop => {}

        Instruction::Mov { dst, src } => {
            let value = state.regs.read(src);
            state.regs.write(dst, value);
        }

        Instruction::Load { dst, addr } => state.regs.write(dst, memory.read(addr)),

        Instruction::Store { addr, src } => memory.write(addr, state.regs.read(src)),

        Instruction::LoadImm { dst, value } => state.regs.write(dst, value),

        Instruction::StoreImm { addr, value } => memory.write(addr, value),

        Instruction::Exchange { a, b } => {
            let (va, vb) = (state.regs.read(a), state.regs.read(b));
            state.regs.write(a, vb);
            state.regs.write(b, va);
        }

        Instruction::LoadFlags { dst } => state.regs.write(dst, state.flags.bits()),

        Instruction::StoreFlags { src } => {
            state.flags = Flags::from_bits_truncate(state.regs.read(src));
        }

        // ========== Arithmetic ==========
        Instruction::Add { dst, src } => {
            let r = AluResult::add(state.regs.read(dst), operand(state, src), false);
            write_result(state, dst, r);
        }

        Instruction::Adc { dst, src } => {
            let r = AluResult::add(state.regs.read(dst), operand(state, src), state.flags.carry());
            write_result(state, dst, r);
        }

        Instruction::Sub { dst, src } => {
            let r = AluResult::sub(state.regs.read(dst), operand(state, src), false);
            write_result(state, dst, r);
        }

        Instruction::Sbb { dst, src } => {
            let r = AluResult::sub(state.regs.read(dst), operand(state, src), state.flags.carry());
            write_result(state, dst, r);
        }

        Instruction::Cmp { lhs, rhs } => {
            let r = AluResult::sub(state.regs.read(lhs), operand(state, rhs), false);
            state.flags = Flags::from_result(&r);
        }

        Instruction::Inc { dst } => {
            let r = AluResult::add(state.regs.read(dst), 1, false);
            write_result(state, dst, r);
        }

        Instruction::Dec { dst } => {
            let r = AluResult::sub(state.regs.read(dst), 1, false);
            write_result(state, dst, r);
        }

        Instruction::Neg { dst } => {
            let r = AluResult::sub(0, state.regs.read(dst), false);
            write_result(state, dst, r);
        }

        Instruction::Mul { dst, src } => {
            let product = state.regs.read(dst) as u32 * state.regs.read(src) as u32;
            state.regs.write(dst, product as Word);
            state.regs.write(src, (product >> Word::BITS) as Word);
            state.flags = Flags::from_result(&AluResult::unsigned_product(product));
        }

        Instruction::Imul { dst, src } => {
            let a = state.regs.read(dst) as SWord as i32;
            let b = state.regs.read(src) as SWord as i32;
            let product = a * b;
            state.regs.write(dst, product as Word);
            state.regs.write(src, (product >> Word::BITS) as Word);
            state.flags = Flags::from_result(&AluResult::signed(product as i64));
        }

        Instruction::Div { dst, den } => {
            let (a, b) = (state.regs.read(dst), state.regs.read(den));
            if b == 0 {
                divide_by_zero(state);
                return;
            }
            let (quotient, remainder) = (a / b, a % b);
            state.regs.write(dst, quotient);
            state.regs.write(den, remainder);
            state.flags = Flags::from_result(&AluResult::bitwise(quotient));
        }

        Instruction::Idiv { dst, den } => {
            let a = state.regs.read(dst) as SWord as i32;
            let b = state.regs.read(den) as SWord as i32;
            if b == 0 {
                divide_by_zero(state);
                return;
            }
            // i32 division truncates toward zero; -32768 / -1 leaves i16 range
            let (quotient, remainder) = (a / b, a % b);
            state.regs.write(dst, quotient as Word);
            state.regs.write(den, remainder as Word);
            state.flags = Flags::from_result(&AluResult::signed(quotient as i64));
        }

        Instruction::AddAcc { src } => {
            let r = AluResult::add(state.regs.read(Register::R0), state.regs.read(src), false);
            write_result(state, Register::R0, r);
        }

        Instruction::SubAcc { src } => {
            let r = AluResult::sub(state.regs.read(Register::R0), state.regs.read(src), false);
            write_result(state, Register::R0, r);
        }

        // ========== Logic ==========
        Instruction::And { dst, src } => {
            let r = AluResult::bitwise(state.regs.read(dst) & operand(state, src));
            write_result(state, dst, r);
        }

        Instruction::Or { dst, src } => {
            let r = AluResult::bitwise(state.regs.read(dst) | operand(state, src));
            write_result(state, dst, r);
        }

        Instruction::Xor { dst, src } => {
            let r = AluResult::bitwise(state.regs.read(dst) ^ operand(state, src));
            write_result(state, dst, r);
        }

        Instruction::Not { dst } => {
            let r = AluResult::bitwise(!state.regs.read(dst));
            write_result(state, dst, r);
        }

        Instruction::Test { lhs, rhs } => {
            let r = AluResult::bitwise(state.regs.read(lhs) & operand(state, rhs));
            state.flags = Flags::from_result(&r);
        }

        Instruction::AndAcc { src } => {
            let r = AluResult::bitwise(state.regs.read(Register::R0) & state.regs.read(src));
            write_result(state, Register::R0, r);
        }

        Instruction::OrAcc { src } => {
            let r = AluResult::bitwise(state.regs.read(Register::R0) | state.regs.read(src));
            write_result(state, Register::R0, r);
        }

        Instruction::XorAcc { src } => {
            let r = AluResult::bitwise(state.regs.read(Register::R0) ^ state.regs.read(src));
            write_result(state, Register::R0, r);
        }

        // ========== Shift/rotate ==========
        Instruction::Shift { op, dst, count } => {
            let r = shift(op, state.regs.read(dst), count, state.flags.carry());
            write_result(state, dst, r);
        }

        // ========== Control flow ==========
        Instruction::Jump { cond, target } => {
            if cond.holds(state.flags) {
                let target = operand(state, target);
                state.regs.write(Register::Rip, target);
            }
        }

        // ========== Processor control ==========
        Instruction::Stc => state.flags.set(Flag::Carry, true),
        Instruction::Clc => state.flags.set(Flag::Carry, false),
        Instruction::Sto => state.flags.set(Flag::Overflow, true),
        Instruction::Clo => state.flags.set(Flag::Overflow, false),
        Instruction::Stz => state.flags.set(Flag::Zero, true),
        Instruction::Clz => state.flags.set(Flag::Zero, false),
        Instruction::Stdz => state.flags.set(Flag::DivideByZero, true),
        Instruction::Cldz => state.flags.set(Flag::DivideByZero, false),

        Instruction::Halt { result } => {
            let result = operand(state, result);
            debug!(result, steps = state.steps + 1, "halt");
            state.halt(result);
        }
    }
}

/// Division by zero sets the flag and touches nothing else
fn divide_by_zero(state: &mut VMState) {
    debug!(rip = state.regs.rip(), "division by zero");
    state.flags.set(Flag::DivideByZero, true);
}
