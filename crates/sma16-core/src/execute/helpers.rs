//! Arithmetic helpers for instruction execution.

use crate::state::{data_field, preserve_field, DATA_MASK, PRESERVE_MASK};

/// Shift direction for `LSHFT`/`RSHFT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDirection {
    /// Towards the preserve field.
    Left,
    /// Towards bit 0.
    Right,
}

/// Shifts the accumulator as `LSHFT`/`RSHFT` do.
///
/// Bit 0 of the operand is the keep flag and the remaining bits are the
/// amount. With keep set, the preserve field is taken out before the shift
/// and put back afterwards. Without it the whole word shifts, so a left
/// shift can carry data bits into the preserve field. Amounts of 16 or more
/// shift every bit out.
#[must_use]
pub fn shift_accumulator(accumulator: u16, operand: u16, direction: ShiftDirection) -> u16 {
    let amount = u32::from(data_field(operand) >> 1);
    let keep = operand & 1 == 1;

    let saved = preserve_field(accumulator);
    let value = if keep { data_field(accumulator) } else { accumulator };

    let shifted = match direction {
        ShiftDirection::Left => value.checked_shl(amount),
        ShiftDirection::Right => value.checked_shr(amount),
    }
    .unwrap_or(0);

    if keep {
        (shifted & DATA_MASK) | saved
    } else {
        shifted
    }
}

/// Adds `operand` into the accumulator's data field, keeping the preserve field.
#[must_use]
pub const fn add_to_data_field(accumulator: u16, operand: u16) -> u16 {
    let sum = data_field(accumulator).wrapping_add(data_field(operand));
    preserve_field(accumulator) | (sum & DATA_MASK)
}

/// Mask used by `AND`: the operand widened with a set preserve field.
#[must_use]
pub const fn and_mask(operand: u16) -> u16 {
    data_field(operand) | PRESERVE_MASK
}

#[cfg(test)]
mod tests {
    use super::{add_to_data_field, and_mask, shift_accumulator, ShiftDirection};

    #[test]
    fn left_shift_without_keep_leaks_into_preserve_field() {
        // amount 4, keep 0
        assert_eq!(shift_accumulator(0x0ABC, 4 << 1, ShiftDirection::Left), 0xABC0);
    }

    #[test]
    fn left_shift_with_keep_restores_preserve_field() {
        assert_eq!(
            shift_accumulator(0x5ABC, (4 << 1) | 1, ShiftDirection::Left),
            0x5BC0
        );
    }

    #[test]
    fn right_shift_without_keep_moves_preserve_bits_down() {
        assert_eq!(shift_accumulator(0xF000, 4 << 1, ShiftDirection::Right), 0x0F00);
    }

    #[test]
    fn right_shift_with_keep_only_touches_data_field() {
        assert_eq!(
            shift_accumulator(0xF0F0, (4 << 1) | 1, ShiftDirection::Right),
            0xF00F
        );
    }

    #[test]
    fn oversized_amounts_clear_the_shifted_value() {
        assert_eq!(shift_accumulator(0xFFFF, 16 << 1, ShiftDirection::Left), 0);
        assert_eq!(shift_accumulator(0xFFFF, 0x7FF << 1, ShiftDirection::Right), 0);
        assert_eq!(
            shift_accumulator(0xAFFF, (20 << 1) | 1, ShiftDirection::Left),
            0xA000
        );
    }

    #[test]
    fn zero_amount_is_identity() {
        assert_eq!(shift_accumulator(0x1234, 0, ShiftDirection::Left), 0x1234);
        assert_eq!(shift_accumulator(0x1234, 1, ShiftDirection::Right), 0x1234);
    }

    #[test]
    fn add_wraps_within_data_field() {
        assert_eq!(add_to_data_field(0x3FFF, 0x001), 0x3000);
        assert_eq!(add_to_data_field(0x0100, 0x023), 0x0123);
    }

    #[test]
    fn and_mask_always_sets_preserve_bits() {
        assert_eq!(and_mask(0x000), 0xF000);
        assert_eq!(and_mask(0xFFF), 0xFFFF);
    }
}
