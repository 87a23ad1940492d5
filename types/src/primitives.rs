//! Primitive newtypes shared across the beacon state: `Slot`, `Epoch` and the index/balance
//! aliases used throughout epoch processing.

use safe_arith::{ArithError, SafeArith};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A 32-byte hash. Real digests are produced by `ethereum_hashing`; this crate only moves them
/// around.
pub type Hash256 = ethereum_types::H256;

/// Index into `validator_registry` / `validator_balances`.
pub type ValidatorIndex = u64;

/// A balance, denominated in Gwei.
pub type Gwei = u64;

/// A shard identifier, in `[0, SHARD_COUNT)`.
pub type Shard = u64;

macro_rules! impl_common {
    ($type:ident) => {
        impl $type {
            pub const fn new(slot: u64) -> Self {
                Self(slot)
            }

            pub const fn as_u64(&self) -> u64 {
                self.0
            }

            pub fn as_usize(&self) -> usize {
                self.0 as usize
            }
        }

        impl From<u64> for $type {
            fn from(x: u64) -> Self {
                Self(x)
            }
        }

        impl From<$type> for u64 {
            fn from(x: $type) -> Self {
                x.0
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl SafeArith<u64> for $type {
            const ZERO: Self = Self(0);
            const ONE: Self = Self(1);

            fn safe_add(&self, other: u64) -> safe_arith::Result<Self> {
                self.0.safe_add(other).map(Self)
            }

            fn safe_sub(&self, other: u64) -> safe_arith::Result<Self> {
                self.0.safe_sub(other).map(Self)
            }

            fn safe_mul(&self, other: u64) -> safe_arith::Result<Self> {
                self.0.safe_mul(other).map(Self)
            }

            fn safe_div(&self, other: u64) -> safe_arith::Result<Self> {
                self.0.safe_div(other).map(Self)
            }

            fn safe_rem(&self, other: u64) -> safe_arith::Result<Self> {
                self.0.safe_rem(other).map(Self)
            }

            fn safe_shl(&self, other: u32) -> safe_arith::Result<Self> {
                self.0.safe_shl(other).map(Self)
            }

            fn safe_shr(&self, other: u32) -> safe_arith::Result<Self> {
                self.0.safe_shr(other).map(Self)
            }

            fn saturating_sub(&self, other: u64) -> Self {
                Self(self.0.saturating_sub(other))
            }
        }

        impl Add<u64> for $type {
            type Output = Self;
            fn add(self, other: u64) -> Self {
                Self(self.0 + other)
            }
        }

        impl Sub<u64> for $type {
            type Output = Self;
            fn sub(self, other: u64) -> Self {
                Self(self.0 - other)
            }
        }
    };
}

/// A slot number: the atomic unit of beacon-chain time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot(u64);

/// An epoch number: `SLOTS_PER_EPOCH` slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Epoch(u64);

impl_common!(Slot);
impl_common!(Epoch);

impl Slot {
    /// `slot / slots_per_epoch`, per the `slot_to_epoch` external interface.
    pub fn epoch(&self, slots_per_epoch: u64) -> Epoch {
        Epoch::new(self.0 / slots_per_epoch)
    }
}

impl Epoch {
    /// `epoch * slots_per_epoch`, per the `epoch_start_slot` external interface.
    pub fn start_slot(&self, slots_per_epoch: u64) -> Slot {
        Slot::new(self.0 * slots_per_epoch)
    }

    /// Saturating predecessor; `Epoch(0).saturating_sub_one() == Epoch(0)`.
    pub fn saturating_sub_one(&self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// Returns `true` if this epoch is a positive power of two away from `other`
    /// (`self - other` is a power of two greater than zero).
    pub fn is_power_of_two_ahead_of(&self, other: Epoch) -> bool {
        self.0 > other.0 && (self.0 - other.0).is_power_of_two()
    }
}

impl TryFrom<Epoch> for usize {
    type Error = ArithError;

    fn try_from(epoch: Epoch) -> Result<Self, Self::Error> {
        Ok(epoch.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_to_epoch_floors() {
        assert_eq!(Slot::new(0).epoch(8), Epoch::new(0));
        assert_eq!(Slot::new(7).epoch(8), Epoch::new(0));
        assert_eq!(Slot::new(8).epoch(8), Epoch::new(1));
        assert_eq!(Slot::new(23).epoch(8), Epoch::new(2));
    }

    #[test]
    fn epoch_start_slot_round_trips_through_epoch() {
        let slots_per_epoch = 8;
        for e in 0..10u64 {
            let epoch = Epoch::new(e);
            assert_eq!(epoch.start_slot(slots_per_epoch).epoch(slots_per_epoch), epoch);
        }
    }

    #[test]
    fn saturating_sub_one_floors_at_zero() {
        assert_eq!(Epoch::new(0).saturating_sub_one(), Epoch::new(0));
        assert_eq!(Epoch::new(1).saturating_sub_one(), Epoch::new(0));
        assert_eq!(Epoch::new(5).saturating_sub_one(), Epoch::new(4));
    }

    #[test]
    fn is_power_of_two_ahead_of_requires_strictly_later_power_of_two_gap() {
        let base = Epoch::new(10);
        assert!(Epoch::new(11).is_power_of_two_ahead_of(base));
        assert!(Epoch::new(12).is_power_of_two_ahead_of(base));
        assert!(Epoch::new(14).is_power_of_two_ahead_of(base));
        assert!(Epoch::new(18).is_power_of_two_ahead_of(base));

        // Not a power of two away.
        assert!(!Epoch::new(13).is_power_of_two_ahead_of(base));
        // Not strictly later.
        assert!(!base.is_power_of_two_ahead_of(base));
        assert!(!Epoch::new(9).is_power_of_two_ahead_of(base));
    }

    #[test]
    fn safe_arith_matches_underlying_u64() {
        assert_eq!(Slot::new(5).safe_add(3).unwrap(), Slot::new(8));
        assert_eq!(Slot::new(5).safe_sub(3).unwrap(), Slot::new(2));
        assert!(Slot::new(0).safe_sub(1).is_err());
    }
}
