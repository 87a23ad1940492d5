//! Justification and finalization (§4.5): FFG bookkeeping driven by a 64-bit bitfield and four
//! priority-ordered finalization rules.

use super::attester_sets::epoch_boundary_attesting_balances;
use super::errors::EpochProcessingError as Error;
use safe_arith::SafeArith;
use types::{BeaconState, ChainSpec, Epoch};

/// The new values for the four fields justification/finalization owns. Computed from `state` but
/// not applied to it — the caller commits them, matching the "snapshot then apply" discipline the
/// rest of this crate's sub-phases use.
pub struct JustificationAndFinalization {
    pub previous_justified_epoch: Epoch,
    pub justified_epoch: Epoch,
    pub finalized_epoch: Epoch,
    pub justification_bitfield: u64,
}

pub fn process_justification_and_finalization(
    state: &BeaconState,
    spec: &ChainSpec,
) -> Result<JustificationAndFinalization, Error> {
    let previous_epoch = state.previous_epoch(spec);
    let current_epoch = state.current_epoch(spec);

    let (previous_boundary_balance, current_boundary_balance) =
        epoch_boundary_attesting_balances(state, spec)?;

    let previous_total_balance =
        state.get_total_balance(&state.get_active_validator_indices(previous_epoch), spec)?;
    let current_total_balance =
        state.get_total_balance(&state.get_active_validator_indices(current_epoch), spec)?;

    let previous_epoch_justifiable =
        (previous_boundary_balance as u128).saturating_mul(3) >= (previous_total_balance as u128).saturating_mul(2);
    let current_epoch_justifiable =
        (current_boundary_balance as u128).saturating_mul(3) >= (current_total_balance as u128).saturating_mul(2);

    let bits = match (previous_epoch_justifiable, current_epoch_justifiable) {
        (true, true) => 0b11,
        (true, false) => 0b10,
        (false, true) => 0b01,
        (false, false) => 0b00,
    };
    let justification_bitfield = state.justification_bitfield.safe_shl(1)? | bits;

    let new_justified_epoch = if current_epoch_justifiable {
        current_epoch
    } else if previous_epoch_justifiable {
        previous_epoch
    } else {
        state.justified_epoch
    };

    let mut finalized_epoch = state.finalized_epoch;

    // Rules checked in priority order 4, 3, 2, 1: a higher-numbered rule, once satisfied, binds
    // regardless of whether a lower-numbered rule would also match.
    if justification_bitfield & 0b11 == 0b11 && state.justified_epoch == previous_epoch {
        // Rule 4.
        finalized_epoch = state.justified_epoch;
    } else if justification_bitfield & 0b111 == 0b111
        && state.justified_epoch == previous_epoch.saturating_sub_one()
    {
        // Rule 3.
        finalized_epoch = state.justified_epoch;
    } else if justification_bitfield.safe_shr(1)? & 0b11 == 0b11
        && state.previous_justified_epoch == previous_epoch.saturating_sub_one()
    {
        // Rule 2.
        finalized_epoch = state.previous_justified_epoch;
    } else if justification_bitfield.safe_shr(1)? & 0b111 == 0b111
        && state.previous_justified_epoch
            == Epoch::new(previous_epoch.as_u64().saturating_sub(2))
    {
        // Rule 1.
        finalized_epoch = state.previous_justified_epoch;
    }

    Ok(JustificationAndFinalization {
        previous_justified_epoch: state.justified_epoch,
        justified_epoch: new_justified_epoch,
        finalized_epoch,
        justification_bitfield,
    })
}

impl JustificationAndFinalization {
    pub fn apply_to(self, state: &mut BeaconState) {
        state.previous_justified_epoch = self.previous_justified_epoch;
        state.justified_epoch = self.justified_epoch;
        state.finalized_epoch = self.finalized_epoch;
        state.justification_bitfield = self.justification_bitfield;
    }
}
