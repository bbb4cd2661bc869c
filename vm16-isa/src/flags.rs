//! # Flags Register
//!
//! ```text
//! +--------------------------+----+----+----+----+----+
//! |        reserved          | DZ | OF | SF | ZF | CF |
//! +--------------------------+----+----+----+----+----+
//!   15                    5    4    3    2    1    0
//! ```
//!
//! Arithmetic and logic handlers build an [`AluResult`] in an accumulator
//! wider than a word and hand it to [`Flags::from_result`], which replaces the
//! whole flags value.

use crate::{SWord, Word, SIGN_BIT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Carry out of / borrow into the most significant bit
pub const CARRY: Word = 1 << 0;
/// Result is zero
pub const ZERO: Word = 1 << 1;
/// Most significant bit of the result
pub const SIGN: Word = 1 << 2;
/// Signed result not representable in a word
pub const OVERFLOW: Word = 1 << 3;
/// Last division had a zero denominator
pub const DIVIDE_BY_ZERO: Word = 1 << 4;
/// All architecturally defined flag bits
pub const FLAGS_MASK: Word = CARRY | ZERO | SIGN | OVERFLOW | DIVIDE_BY_ZERO;

/// Individual condition flag
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Flag {
    Carry,
    Zero,
    Sign,
    Overflow,
    DivideByZero,
}

impl Flag {
    #[inline]
    pub const fn bit(self) -> Word {
        match self {
            Flag::Carry => CARRY,
            Flag::Zero => ZERO,
            Flag::Sign => SIGN,
            Flag::Overflow => OVERFLOW,
            Flag::DivideByZero => DIVIDE_BY_ZERO,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Flag::Carry => "carry",
            Flag::Zero => "zero",
            Flag::Sign => "sign",
            Flag::Overflow => "overflow",
            Flag::DivideByZero => "divide-by-zero",
        }
    }
}

/// Flags register value
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Flags(Word);

impl Flags {
    pub const EMPTY: Self = Self(0);

    /// Build from a raw word, dropping reserved bits
    #[inline]
    pub const fn from_bits_truncate(bits: Word) -> Self {
        Self(bits & FLAGS_MASK)
    }

    #[inline]
    pub const fn bits(self) -> Word {
        self.0
    }

    #[inline]
    pub const fn get(self, flag: Flag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[inline]
    pub fn set(&mut self, flag: Flag, value: bool) {
        if value {
            self.0 |= flag.bit();
        } else {
            self.0 &= !flag.bit();
        }
    }

    #[inline]
    pub const fn carry(self) -> bool {
        self.get(Flag::Carry)
    }

    #[inline]
    pub const fn zero(self) -> bool {
        self.get(Flag::Zero)
    }

    #[inline]
    pub const fn sign(self) -> bool {
        self.get(Flag::Sign)
    }

    #[inline]
    pub const fn overflow(self) -> bool {
        self.get(Flag::Overflow)
    }

    #[inline]
    pub const fn divide_by_zero(self) -> bool {
        self.get(Flag::DivideByZero)
    }

    /// Flags for the result of a flag-affecting operation.
    ///
    /// Divide-by-zero is always cleared here; only the divide handlers set it.
    pub fn from_result(result: &AluResult) -> Self {
        let mut flags = Flags::EMPTY;
        flags.set(Flag::Carry, result.carry);
        flags.set(Flag::Zero, result.value == 0);
        flags.set(Flag::Sign, result.value & SIGN_BIT != 0);
        flags.set(Flag::Overflow, result.overflow);
        flags
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = |flag: Flag, c: char| if self.get(flag) { c } else { '-' };
        write!(
            f,
            "{}{}{}{}{}",
            letter(Flag::DivideByZero, 'D'),
            letter(Flag::Overflow, 'O'),
            letter(Flag::Sign, 'S'),
            letter(Flag::Zero, 'Z'),
            letter(Flag::Carry, 'C'),
        )
    }
}

/// Outcome of an ALU operation evaluated in an extended-width accumulator
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AluResult {
    /// Result truncated to a word
    pub value: Word,
    /// Unsigned carry/borrow out of the word
    pub carry: bool,
    /// Signed result outside the `i16` range
    pub overflow: bool,
}

impl AluResult {
    /// Bit of the unsigned accumulator that receives the carry out of a word
    const CARRY_OUT: u32 = 1 << Word::BITS;

    pub const fn new(value: Word, carry: bool, overflow: bool) -> Self {
        Self { value, carry, overflow }
    }

    /// `a + b + carry_in`
    pub fn add(a: Word, b: Word, carry_in: bool) -> Self {
        let wide = a as u32 + b as u32 + carry_in as u32;
        let signed = a as SWord as i32 + b as SWord as i32 + carry_in as i32;
        Self {
            value: wide as Word,
            carry: wide & Self::CARRY_OUT != 0,
            overflow: !fits_signed(signed as i64),
        }
    }

    /// `a - b - borrow_in`
    pub fn sub(a: Word, b: Word, borrow_in: bool) -> Self {
        let wide = (a as u32).wrapping_sub(b as u32 + borrow_in as u32);
        let signed = a as SWord as i32 - b as SWord as i32 - borrow_in as i32;
        Self {
            value: wide as Word,
            carry: wide & Self::CARRY_OUT != 0,
            overflow: !fits_signed(signed as i64),
        }
    }

    /// Result of a bitwise operation: no carry, no overflow
    pub const fn bitwise(value: Word) -> Self {
        Self::new(value, false, false)
    }

    /// Full unsigned product; out of range when the high half is non-zero
    pub fn unsigned_product(product: u32) -> Self {
        let out_of_range = product > Word::MAX as u32;
        Self::new(product as Word, out_of_range, out_of_range)
    }

    /// Exact signed value (product or quotient) truncated to a word
    pub fn signed(value: i64) -> Self {
        let out_of_range = !fits_signed(value);
        Self::new(value as Word, out_of_range, out_of_range)
    }
}

#[inline]
fn fits_signed(value: i64) -> bool {
    (SWord::MIN as i64..=SWord::MAX as i64).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_bits() {
        assert_eq!(Flag::Carry.bit(), 0b00001);
        assert_eq!(Flag::Zero.bit(), 0b00010);
        assert_eq!(Flag::Sign.bit(), 0b00100);
        assert_eq!(Flag::Overflow.bit(), 0b01000);
        assert_eq!(Flag::DivideByZero.bit(), 0b10000);
    }

    #[test]
    fn test_truncate_drops_reserved_bits() {
        assert_eq!(Flags::from_bits_truncate(0xFFFF).bits(), 0x1F);
    }

    #[test]
    fn test_add_carry_and_overflow() {
        let r = AluResult::add(0xFFFF, 1, false);
        assert_eq!(r.value, 0);
        assert!(r.carry);
        assert!(!r.overflow);

        let r = AluResult::add(0x7FFF, 1, false);
        assert_eq!(r.value, 0x8000);
        assert!(!r.carry);
        assert!(r.overflow);

        let r = AluResult::add(0xFFFF, 0xFFFF, true);
        assert_eq!(r.value, 0xFFFF);
        assert!(r.carry);
    }

    #[test]
    fn test_sub_borrow_and_overflow() {
        let r = AluResult::sub(3, 5, false);
        assert_eq!(r.value, 0xFFFE);
        assert!(r.carry);
        assert!(!r.overflow);

        let r = AluResult::sub(0x8000, 1, false);
        assert_eq!(r.value, 0x7FFF);
        assert!(!r.carry);
        assert!(r.overflow);

        let r = AluResult::sub(5, 5, true);
        assert_eq!(r.value, 0xFFFF);
        assert!(r.carry);
    }

    #[test]
    fn test_products() {
        let r = AluResult::unsigned_product(0x1_0000);
        assert_eq!(r.value, 0);
        assert!(r.carry && r.overflow);

        let r = AluResult::signed(-6);
        assert_eq!(r.value, 0xFFFA);
        assert!(!r.carry && !r.overflow);

        let r = AluResult::signed(32768);
        assert_eq!(r.value, 0x8000);
        assert!(r.overflow);
    }

    #[test]
    fn test_from_result_sets_whole_register() {
        let flags = Flags::from_result(&AluResult::add(0x8000, 0x8000, false));
        assert!(flags.zero());
        assert!(flags.carry());
        assert!(flags.overflow());
        assert!(!flags.sign());
        assert!(!flags.divide_by_zero());

        let flags = Flags::from_result(&AluResult::bitwise(0x8001));
        assert!(flags.sign());
        assert!(!flags.zero());
        assert_eq!(flags.bits(), SIGN);
    }

    #[test]
    fn test_display() {
        let mut flags = Flags::EMPTY;
        flags.set(Flag::Zero, true);
        flags.set(Flag::DivideByZero, true);
        assert_eq!(flags.to_string(), "D--Z-");
    }
}
