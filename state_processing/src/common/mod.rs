//! Small helpers shared by more than one epoch-processing sub-phase: balance mutation and the
//! base-reward calculation all six reward/penalty components scale against.

use integer_sqrt::IntegerSquareRoot;
use safe_arith::SafeArith;
use types::{BeaconState, BeaconStateError, ChainSpec};

/// Increase the balance of a validator in the `BeaconState`.
pub fn increase_balance(state: &mut BeaconState, index: usize, delta: u64) -> Result<(), BeaconStateError> {
    let balance = state.get_balance_mut(index)?;
    *balance = balance.safe_add(delta)?;
    Ok(())
}

/// Decrease the balance of a validator in the `BeaconState`, saturating at zero.
pub fn decrease_balance(state: &mut BeaconState, index: usize, delta: u64) -> Result<(), BeaconStateError> {
    let balance = state.get_balance_mut(index)?;
    *balance = balance.saturating_sub(delta);
    Ok(())
}

/// This type exists to avoid confusing `total_balance` with `sqrt_total_balance`, since they are
/// used in close proximity and have the same underlying type (`u64`).
#[derive(Copy, Clone)]
pub struct SqrtTotalBalance(u64);

impl SqrtTotalBalance {
    pub fn new(total_balance: u64) -> Self {
        Self(total_balance.integer_sqrt())
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// `base_reward(i) = effective_balance(i) / (BASE_REWARD_QUOTIENT * integer_sqrt(T) / 2)`,
/// truncating at every division as the spec demands.
pub fn get_base_reward(
    effective_balance: u64,
    sqrt_total_balance: SqrtTotalBalance,
    spec: &ChainSpec,
) -> Result<u64, safe_arith::ArithError> {
    let denominator = spec
        .base_reward_quotient
        .safe_mul(sqrt_total_balance.as_u64())?
        .safe_div(2)?;
    effective_balance.safe_div(denominator)
}
