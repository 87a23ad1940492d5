//! Per-epoch state transition: the five sub-phases of §4, run in the fixed order the FFG
//! bookkeeping and reward accounting depend on.
//!
//! Each sub-phase either computes a snapshot that the caller commits (justification and
//! finalization) or mutates `state` directly (crosslinks, rewards and penalties, registry
//! updates, final updates) — whichever the reference algorithm's own dependency shape calls for.
//! No sub-phase reads a field that a later sub-phase in this list also writes, so running them in
//! this order is the only thing that makes each one's inputs well-defined.

use crate::metrics;
use types::{BeaconState, ChainSpec};

pub mod attester_sets;
pub mod crosslinks;
pub mod errors;
pub mod final_updates;
pub mod justification_and_finalization;
pub mod registry_updates;
pub mod rewards_and_penalties;
pub mod winning_root;

pub use errors::EpochProcessingError as Error;

/// Advances `state` by one epoch in place.
///
/// # Errors
///
/// Returns an `Error` if any sub-phase observes an inconsistency in `state` (a validator index out
/// of range, a zero active-balance denominator, or similar). A sub-phase failing to find a winning
/// crosslink root for a given shard is not such an error — that is the expected, common case and is
/// handled locally within `crosslinks` and `rewards_and_penalties`.
pub fn process_epoch(state: &mut BeaconState, spec: &ChainSpec) -> Result<(), Error> {
    let _timer = metrics::start_timer(&metrics::PROCESS_EPOCH_TIME);

    if state.validator_registry.len() != state.validator_balances.len() {
        return Err(Error::RegistryBalanceMismatch);
    }

    let justification_and_finalization =
        justification_and_finalization::process_justification_and_finalization(state, spec)?;
    justification_and_finalization.apply_to(state);

    crosslinks::process_crosslinks(state, spec)?;
    rewards_and_penalties::process_rewards_and_penalties(state, spec)?;
    registry_updates::process_registry_updates(state, spec)?;
    final_updates::process_final_updates(state, spec)?;

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_utils::*;
    use super::*;
    use types::{Epoch, Hash256};

    /// P1: `|validator_registry| == |validator_balances|` is preserved across `process_epoch`.
    #[test]
    fn preserves_registry_and_balance_lengths() {
        let spec = test_spec();
        let mut state = new_state(4, 3, &spec);
        state.justified_epoch = Epoch::new(2);
        state.previous_justified_epoch = Epoch::new(1);
        state.finalized_epoch = Epoch::new(2);

        process_epoch(&mut state, &spec).unwrap();

        assert_eq!(state.validator_registry.len(), state.validator_balances.len());
        assert_eq!(state.validator_registry.len(), 4);
    }

    /// P8: every ring buffer keeps its configured length.
    #[test]
    fn preserves_ring_buffer_lengths() {
        let spec = test_spec();
        let mut state = new_state(4, 3, &spec);
        state.justified_epoch = Epoch::new(2);
        state.previous_justified_epoch = Epoch::new(1);
        state.finalized_epoch = Epoch::new(2);

        process_epoch(&mut state, &spec).unwrap();

        assert_eq!(state.latest_block_roots.len(), spec.latest_block_roots_length as usize);
        assert_eq!(state.latest_randao_mixes.len(), spec.latest_randao_mixes_length as usize);
        assert_eq!(
            state.latest_active_index_roots.len(),
            spec.latest_active_index_roots_length as usize
        );
        assert_eq!(state.latest_slashed_balances.len(), spec.latest_slashed_exit_length as usize);
        assert_eq!(state.latest_crosslinks.len(), spec.shard_count as usize);
    }

    /// P6: no attestation surviving final updates has an epoch older than `current_epoch`.
    #[test]
    fn prunes_attestations_older_than_current_epoch() {
        let spec = test_spec();
        let mut state = new_state(4, 3, &spec);
        state.justified_epoch = Epoch::new(2);
        state.previous_justified_epoch = Epoch::new(1);
        state.finalized_epoch = Epoch::new(2);

        let previous_epoch = state.previous_epoch(&spec);
        let attestations = full_epoch_attestations(
            &state,
            previous_epoch,
            state.previous_justified_epoch,
            block_root_for_slot(previous_epoch.start_slot(spec.slots_per_epoch).as_u64()),
            Hash256::repeat_byte(0xab),
            1,
            &spec,
        );
        state.latest_attestations.extend(attestations);

        let current_epoch = state.current_epoch(&spec);
        process_epoch(&mut state, &spec).unwrap();

        for a in &state.latest_attestations {
            assert!(a.data.slot_epoch(spec.slots_per_epoch) >= current_epoch);
        }
    }

    /// P10: running `process_epoch` twice from two clones of the same input state produces
    /// bitwise-identical output — the transition is a deterministic, pure function of its input.
    #[test]
    fn is_deterministic() {
        let spec = test_spec();
        let mut state_a = new_state(4, 3, &spec);
        state_a.justified_epoch = Epoch::new(2);
        state_a.previous_justified_epoch = Epoch::new(1);
        state_a.finalized_epoch = Epoch::new(2);

        let previous_epoch = state_a.previous_epoch(&spec);
        let attestations = full_epoch_attestations(
            &state_a,
            previous_epoch,
            state_a.previous_justified_epoch,
            block_root_for_slot(previous_epoch.start_slot(spec.slots_per_epoch).as_u64()),
            Hash256::repeat_byte(0xcd),
            1,
            &spec,
        );
        state_a.latest_attestations.extend(attestations);
        let mut state_b = state_a.clone();

        process_epoch(&mut state_a, &spec).unwrap();
        process_epoch(&mut state_b, &spec).unwrap();

        assert_eq!(state_a, state_b);
    }
}
