//! Shift and rotate unit
//!
//! Every operation is the count-fold repetition of a one-bit step over a
//! field: all 16 bits for unsigned variants, bits 0-14 for signed ones (bit 15
//! stays put). The count is taken modulo 32.

use vm16_isa::{AluResult, ShiftOp, Word, SIGN_BIT};

/// Bits of the count operand that are used
pub const COUNT_MASK: Word = 0x1F;

/// Apply `op` to `value`.
///
/// `carry_in` is the current carry flag; it only takes part in the
/// with-carry forms.
pub fn shift(op: ShiftOp, value: Word, count: Word, carry_in: bool) -> AluResult {
    let (mask, top) = if op.is_signed() { (0x7FFF, 14) } else { (0xFFFF, 15) };
    let sign = value & SIGN_BIT;
    let sign_bit = (sign != 0) as Word;

    let mut field = value & mask;
    let mut carry = op.uses_carry() && carry_in;
    let mut overflow = false;

    for _ in 0..(count & COUNT_MASK) {
        if op.is_left() {
            let out = (field >> top) & 1;
            let fill = match (op.is_rotate(), op.uses_carry()) {
                (true, true) => carry as Word,
                (true, false) => out,
                (false, true) => carry as Word,
                (false, false) => 0,
            };
            field = ((field << 1) | fill) & mask;
            if op.is_signed() && !op.is_rotate() && out != sign_bit {
                overflow = true;
            }
            carry = out != 0;
        } else {
            let out = field & 1;
            let fill = match (op.is_rotate(), op.uses_carry()) {
                (true, true) => carry as Word,
                (true, false) => out,
                (false, true) => carry as Word,
                (false, false) if op.is_signed() => sign_bit,
                (false, false) => 0,
            };
            field = (field >> 1) | (fill << top);
            carry = out != 0;
        }
    }

    let value = if op.is_signed() { sign | field } else { field };
    AluResult::new(value, carry, overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shl_carry_out() {
        let r = shift(ShiftOp::Shl, 0x8001, 1, false);
        assert_eq!(r.value, 0x0002);
        assert!(r.carry);
        assert!(!r.overflow);
    }

    #[test]
    fn test_shr_fills_zero() {
        let r = shift(ShiftOp::Shr, 0x8003, 2, true);
        assert_eq!(r.value, 0x2000);
        assert!(r.carry);
    }

    #[test]
    fn test_sal_keeps_sign_and_detects_overflow() {
        // 0xC000: sign set, bit 14 set; shifting out a 1 matches the sign
        let r = shift(ShiftOp::Sal, 0xC000, 1, false);
        assert_eq!(r.value, 0x8000);
        assert!(r.carry);
        assert!(!r.overflow);

        // 0x4000 is positive; shifting out bit 14 loses magnitude
        let r = shift(ShiftOp::Sal, 0x4000, 1, false);
        assert_eq!(r.value, 0x0000);
        assert!(r.carry);
        assert!(r.overflow);
    }

    #[test]
    fn test_sar_fills_with_sign() {
        let r = shift(ShiftOp::Sar, 0x8004, 2, false);
        assert_eq!(r.value, 0xE001);
        assert!(!r.carry);

        let r = shift(ShiftOp::Sar, 0x0004, 3, false);
        assert_eq!(r.value, 0x0000);
        assert!(r.carry);
    }

    #[test]
    fn test_with_carry_shifts_fill_from_carry() {
        let r = shift(ShiftOp::Shlc, 0x0000, 1, true);
        assert_eq!(r.value, 0x0001);
        assert!(!r.carry);

        let r = shift(ShiftOp::Shrc, 0x0001, 1, true);
        assert_eq!(r.value, 0x8000);
        assert!(r.carry);

        let r = shift(ShiftOp::Sarc, 0x0000, 1, true);
        assert_eq!(r.value, 0x4000);
    }

    #[test]
    fn test_salc_fills_from_carry_below_sign() {
        assert_eq!(shift(ShiftOp::Salc, 0x0000, 1, true), AluResult::new(0x0001, false, false));
        assert_eq!(shift(ShiftOp::Salc, 0xC000, 1, true), AluResult::new(0x8001, true, false));

        // Bit 14 leaving a positive value, or a clear bit 14 leaving a negative one
        assert_eq!(shift(ShiftOp::Salc, 0x4000, 1, false), AluResult::new(0x0000, true, true));
        assert_eq!(shift(ShiftOp::Salc, 0x8000, 1, false), AluResult::new(0x8000, false, true));
    }

    #[test]
    fn test_sarc_on_negative_values() {
        // Carry lands in bit 14, the sign bit is not copied down
        assert_eq!(shift(ShiftOp::Sarc, 0x8000, 1, true), AluResult::new(0xC000, false, false));
        assert_eq!(shift(ShiftOp::Sarc, 0x8000, 1, false), AluResult::new(0x8000, false, false));
        assert_eq!(shift(ShiftOp::Sarc, 0x8001, 1, false), AluResult::new(0x8000, true, false));
        assert_eq!(shift(ShiftOp::Sarc, 0x0003, 2, true), AluResult::new(0x6000, true, false));
    }

    #[test]
    fn test_rotates() {
        assert_eq!(shift(ShiftOp::Rol, 0x8001, 1, false).value, 0x0003);
        assert_eq!(shift(ShiftOp::Ror, 0x8001, 1, false).value, 0xC000);
        assert_eq!(shift(ShiftOp::Rol, 0x1234, 16, false).value, 0x1234);

        // Signed rotates cycle the low 15 bits
        assert_eq!(shift(ShiftOp::Rols, 0xC000, 1, false).value, 0x8001);
        assert_eq!(shift(ShiftOp::Rors, 0x0001, 1, false).value, 0x4000);
        assert_eq!(shift(ShiftOp::Rols, 0x9234, 15, false).value, 0x9234);
    }

    #[test]
    fn test_rotate_through_carry() {
        let r = shift(ShiftOp::Rcl, 0x8000, 1, false);
        assert_eq!(r.value, 0x0000);
        assert!(r.carry);

        let r = shift(ShiftOp::Rcl, 0x8000, 2, false);
        assert_eq!(r.value, 0x0001);
        assert!(!r.carry);

        let r = shift(ShiftOp::Rcr, 0x0001, 1, true);
        assert_eq!(r.value, 0x8000);
        assert!(r.carry);

        // 17-bit ring for unsigned
        assert_eq!(shift(ShiftOp::Rcl, 0xA5A5, 17, true), AluResult::new(0xA5A5, true, false));
    }

    #[test]
    fn test_signed_rotate_through_carry() {
        // Bit 14 goes to carry, bit 15 never moves
        assert_eq!(shift(ShiftOp::Rcls, 0x4000, 1, false), AluResult::new(0x0000, true, false));
        assert_eq!(shift(ShiftOp::Rcls, 0x4000, 2, false), AluResult::new(0x0001, false, false));
        assert_eq!(shift(ShiftOp::Rcls, 0x8001, 1, true), AluResult::new(0x8003, false, false));

        assert_eq!(shift(ShiftOp::Rcrs, 0x0001, 1, false), AluResult::new(0x0000, true, false));
        assert_eq!(shift(ShiftOp::Rcrs, 0x8000, 1, true), AluResult::new(0xC000, false, false));
        assert_eq!(shift(ShiftOp::Rcrs, 0x8001, 2, false), AluResult::new(0xC000, false, false));

        // 16-bit ring for signed
        assert_eq!(shift(ShiftOp::Rcls, 0x1234, 16, true), AluResult::new(0x1234, true, false));
    }

    #[test]
    fn test_count_zero_and_masking() {
        let r = shift(ShiftOp::Shl, 0x8000, 0, true);
        assert_eq!(r.value, 0x8000);
        assert!(!r.carry);

        let r = shift(ShiftOp::Rcr, 0x1234, 0, true);
        assert_eq!(r.value, 0x1234);
        assert!(r.carry);

        // 0x21 & 0x1F == 1
        assert_eq!(shift(ShiftOp::Shl, 1, 0x21, false).value, 2);
        assert_eq!(shift(ShiftOp::Shl, 1, 0x20, false).value, 1);
    }
}
