//! Final updates (§4.9): rotate the per-epoch ring buffers and prune `latest_attestations` down
//! to what the next epoch's "previous epoch" selectors will need.

use super::errors::EpochProcessingError as Error;
use ethereum_hashing::hash_fixed;
use int_to_bytes::int_to_bytes8;
use safe_arith::SafeArith;
use types::{BeaconState, ChainSpec, Hash256};

pub fn process_final_updates(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    let current_epoch = state.current_epoch(spec);
    let next_epoch = state.next_epoch(spec)?;

    // Active-index root: hash the concatenation of the (little-endian, 8-byte) indices active
    // `ACTIVATION_EXIT_DELAY` epochs past `next_epoch`.
    let index_root_epoch = next_epoch.as_u64().safe_add(spec.activation_exit_delay)?;
    let active = state.get_active_validator_indices(types::Epoch::new(index_root_epoch));
    let mut concatenated = Vec::with_capacity(active.len().safe_mul(8)?);
    for index in &active {
        concatenated.extend_from_slice(&int_to_bytes8(*index));
    }
    let active_index_root = Hash256::from(hash_fixed(&concatenated));
    let index_root_slot = index_root_epoch.safe_rem(spec.latest_active_index_roots_length)? as usize;
    state.set_active_index_root_at(index_root_slot, active_index_root)?;

    // Slashed-balance carry-over.
    let next_slot = next_epoch.as_u64().safe_rem(spec.latest_slashed_exit_length)? as usize;
    let current_slot = current_epoch.as_u64().safe_rem(spec.latest_slashed_exit_length)? as usize;
    state.set_slashed_balance_at(next_slot, state.get_slashed_balance_at(current_slot)?)?;

    // Randao mix carry-over. The reference implementation indexes this ring write with
    // `next_epoch % LATEST_SLASHED_EXIT_LENGTH` rather than `LATEST_RANDAO_MIXES_LENGTH` — almost
    // certainly a copy-paste artifact from the line above, but the two lengths are equal in the
    // canonical config, and reproducing it rather than silently "fixing" it is what the upstream
    // spec behavior actually calls for (see DESIGN.md).
    let randao_mix = state.get_randao_mix(current_epoch, spec)?;
    let randao_slot = next_epoch.as_u64().safe_rem(spec.latest_slashed_exit_length)? as usize;
    state.set_randao_mix_at(randao_slot, randao_mix)?;

    // Attestation pruning: keep only attestations whose epoch is >= current_epoch (these become
    // next round's "previous epoch" attestations).
    state
        .latest_attestations
        .retain(|a| a.data.slot_epoch(spec.slots_per_epoch) >= current_epoch);

    Ok(())
}
