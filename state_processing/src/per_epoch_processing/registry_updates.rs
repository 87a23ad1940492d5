//! Registry and seed rotation (§4.8). Rotates `previous_shuffling` from `current_shuffling`
//! unconditionally, then either triggers a registry update (deferring to the external
//! `update_validator_registry` collaborator) or, failing that, advances just the shuffling seed
//! on a power-of-two cadence.
//!
//! The three sub-updates are staged sequentially — each one reads the `current_shuffling.epoch`
//! the previous step just wrote.

use super::errors::EpochProcessingError as Error;
use safe_arith::SafeArith;
use types::{BeaconState, ChainSpec};

/// Activation/exit/deposit-driven registry maintenance. Out of scope for this crate (per its
/// non-goals around validator lifecycle); the reference implementation carries the same "TODO"
/// shell rather than a real implementation, so this stays a deliberate no-op.
fn update_validator_registry(_state: &mut BeaconState) -> Result<(), Error> {
    Ok(())
}

fn registry_update_triggered(state: &BeaconState, spec: &ChainSpec) -> Result<bool, Error> {
    if state.finalized_epoch <= state.validator_registry_update_epoch {
        return Ok(false);
    }

    let committee_count = state.get_current_epoch_committee_count(spec)?;
    for i in 0..committee_count {
        let shard = state
            .current_shuffling
            .start_shard
            .safe_add(i)?
            .safe_rem(spec.shard_count)?;
        if state.get_crosslink(shard as usize)?.epoch <= state.validator_registry_update_epoch {
            return Ok(false);
        }
    }
    Ok(true)
}

pub fn process_registry_updates(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    state.previous_shuffling = state.current_shuffling;

    let next_epoch = state.next_epoch(spec)?;

    if registry_update_triggered(state, spec)? {
        update_validator_registry(state)?;

        let num_shards_in_committees = state.get_current_epoch_committee_count(spec)?;
        state.current_shuffling.epoch = next_epoch;
        state.current_shuffling.start_shard = state
            .current_shuffling
            .start_shard
            .safe_add(num_shards_in_committees)?
            .safe_rem(spec.shard_count)?;
        state.current_shuffling.seed = state.generate_seed(state.current_shuffling.epoch, spec)?;
    } else {
        let current_epoch = state.current_epoch(spec);
        if current_epoch.is_power_of_two_ahead_of(state.validator_registry_update_epoch) {
            state.current_shuffling.epoch = next_epoch;
            state.current_shuffling.seed = state.generate_seed(state.current_shuffling.epoch, spec)?;
        }
    }

    Ok(())
}
