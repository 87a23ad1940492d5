//! Safe arithmetic: integer operations that return `Result` instead of panicking or silently
//! wrapping on overflow, underflow or division by zero.
//!
//! Consensus balances and epoch arithmetic must never panic and must never silently wrap: both
//! are forms of the exact same bug from the chain's perspective, just with different symptoms.
//! `SafeArith` makes every checked operation exactly as easy to reach for as its un-checked
//! counterpart.

mod iter;

pub use iter::SafeArithIter;

use std::fmt::Debug;

/// An error returned by a failed arithmetic operation.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ArithError {
    Overflow,
    DivisionByZero,
    InvalidEpoch,
    InvalidSlot,
}

pub type Result<T> = std::result::Result<T, ArithError>;

/// Trait providing checked arithmetic operations that return a `Result` rather than an `Option`,
/// for easy use with `?`.
pub trait SafeArith<Rhs = Self>: Sized + Copy {
    const ZERO: Self;
    const ONE: Self;

    fn safe_add(&self, other: Rhs) -> Result<Self>;
    fn safe_sub(&self, other: Rhs) -> Result<Self>;
    fn safe_mul(&self, other: Rhs) -> Result<Self>;
    fn safe_div(&self, other: Rhs) -> Result<Self>;
    fn safe_rem(&self, other: Rhs) -> Result<Self>;
    fn safe_shl(&self, other: u32) -> Result<Self>;
    fn safe_shr(&self, other: u32) -> Result<Self>;

    /// Subtract, saturating at the type's minimum value instead of erroring.
    fn saturating_sub(&self, other: Rhs) -> Self;
}

macro_rules! impl_safe_arith {
    ($typ:ty) => {
        impl SafeArith for $typ {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            fn safe_add(&self, other: Self) -> Result<Self> {
                self.checked_add(other).ok_or(ArithError::Overflow)
            }

            fn safe_sub(&self, other: Self) -> Result<Self> {
                self.checked_sub(other).ok_or(ArithError::Overflow)
            }

            fn safe_mul(&self, other: Self) -> Result<Self> {
                self.checked_mul(other).ok_or(ArithError::Overflow)
            }

            fn safe_div(&self, other: Self) -> Result<Self> {
                self.checked_div(other).ok_or(ArithError::DivisionByZero)
            }

            fn safe_rem(&self, other: Self) -> Result<Self> {
                self.checked_rem(other).ok_or(ArithError::DivisionByZero)
            }

            fn safe_shl(&self, other: u32) -> Result<Self> {
                self.checked_shl(other).ok_or(ArithError::Overflow)
            }

            fn safe_shr(&self, other: u32) -> Result<Self> {
                self.checked_shr(other).ok_or(ArithError::Overflow)
            }

            fn saturating_sub(&self, other: Self) -> Self {
                <$typ>::saturating_sub(*self, other)
            }
        }
    };
}

impl_safe_arith!(u8);
impl_safe_arith!(u16);
impl_safe_arith!(u32);
impl_safe_arith!(u64);
impl_safe_arith!(u128);
impl_safe_arith!(usize);
impl_safe_arith!(i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_overflow() {
        assert_eq!(u64::MAX.safe_add(1), Err(ArithError::Overflow));
    }

    #[test]
    fn sub_overflow() {
        assert_eq!(0u64.safe_sub(1), Err(ArithError::Overflow));
        assert_eq!(0u64.saturating_sub(1), 0);
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(1u64.safe_div(0), Err(ArithError::DivisionByZero));
    }

    #[test]
    fn rem_by_zero() {
        assert_eq!(1u64.safe_rem(0), Err(ArithError::DivisionByZero));
    }

    #[test]
    fn mul_overflow() {
        assert_eq!(u64::MAX.safe_mul(2), Err(ArithError::Overflow));
    }

    #[test]
    fn truncating_division() {
        assert_eq!(7u64.safe_div(2), Ok(3));
        assert_eq!(6u64.safe_div(2), Ok(3));
    }

    #[test]
    fn u128_intermediate_products_do_not_overflow_u64() {
        let a = u64::MAX as u128;
        let b = u64::MAX as u128;
        assert_eq!(a.safe_mul(b).unwrap().safe_div(a).unwrap(), b);
    }
}
