//! Epoch-attestation selectors (filters over `state.latest_attestations`) and the attester-set
//! aggregation built on top of them.
//!
//! The reference implementation expresses these as lazy generator decorators that deduplicate
//! into a set; here the same "filter, expand, take set union" contract is explicit: a selector
//! returns references into `latest_attestations`, and aggregation expands each attestation's
//! aggregation bitfield into participant indices before folding them into a `BTreeSet` (ascending,
//! deduplicated — committees can and do overlap across attestations for the same shard).

use super::errors::EpochProcessingError as Error;
use std::collections::BTreeSet;
use types::{BeaconState, ChainSpec, Epoch, Hash256, PendingAttestation, Shard, Slot, ValidatorIndex};

/// Attestations whose `data.slot` falls in the current epoch.
pub fn current_epoch_attestations<'a>(
    state: &'a BeaconState,
    spec: &ChainSpec,
) -> Vec<&'a PendingAttestation> {
    let current_epoch = state.current_epoch(spec);
    state
        .latest_attestations
        .iter()
        .filter(|a| a.data.slot_epoch(spec.slots_per_epoch) == current_epoch)
        .collect()
}

/// Attestations whose `data.slot` falls in the previous epoch.
pub fn previous_epoch_attestations<'a>(
    state: &'a BeaconState,
    spec: &ChainSpec,
) -> Vec<&'a PendingAttestation> {
    let previous_epoch = state.previous_epoch(spec);
    state
        .latest_attestations
        .iter()
        .filter(|a| a.data.slot_epoch(spec.slots_per_epoch) == previous_epoch)
        .collect()
}

/// The previous-epoch subset whose `data.justified_epoch == state.previous_justified_epoch`.
pub fn previous_epoch_justified_attestations<'a>(
    state: &'a BeaconState,
    spec: &ChainSpec,
) -> Vec<&'a PendingAttestation> {
    previous_epoch_attestations(state, spec)
        .into_iter()
        .filter(|a| a.data.justified_epoch == state.previous_justified_epoch)
        .collect()
}

/// The previous-epoch-justified subset whose `data.epoch_boundary_root` matches the block root
/// at the start of the previous epoch.
pub fn previous_epoch_boundary_attestations<'a>(
    state: &'a BeaconState,
    spec: &ChainSpec,
) -> Result<Vec<&'a PendingAttestation>, Error> {
    let boundary_root =
        state.get_block_root(state.previous_epoch(spec).start_slot(spec.slots_per_epoch), spec)?;
    Ok(previous_epoch_justified_attestations(state, spec)
        .into_iter()
        .filter(|a| a.data.epoch_boundary_root == boundary_root)
        .collect())
}

/// The previous-epoch subset whose `data.beacon_block_root` matches the canonical block root at
/// `data.slot` (i.e. the attester correctly identified the head).
pub fn previous_epoch_head_attestations<'a>(
    state: &'a BeaconState,
    spec: &ChainSpec,
) -> Result<Vec<&'a PendingAttestation>, Error> {
    previous_epoch_attestations(state, spec)
        .into_iter()
        .filter_map(|a| match state.get_block_root(a.data.slot, spec) {
            Ok(root) if root == a.data.beacon_block_root => Some(Ok(a)),
            Ok(_) => None,
            Err(e) => Some(Err(e.into())),
        })
        .collect()
}

/// Expands each attestation into its participating validator indices and folds them into a
/// single ascending, deduplicated set.
pub fn attesting_indices(
    state: &BeaconState,
    attestations: &[&PendingAttestation],
    spec: &ChainSpec,
) -> Result<BTreeSet<ValidatorIndex>, Error> {
    let mut indices = BTreeSet::new();
    for a in attestations {
        for i in state.get_attestation_participants(&a.data, &a.aggregation_bitfield, spec)? {
            indices.insert(i);
        }
    }
    Ok(indices)
}

/// Filters to attestations with the given `shard` and `shard_block_root`, then expands+unions.
pub fn shard_block_root_attester_indices(
    state: &BeaconState,
    attestations: &[&PendingAttestation],
    shard: Shard,
    shard_block_root: Hash256,
    spec: &ChainSpec,
) -> Result<BTreeSet<ValidatorIndex>, Error> {
    let filtered: Vec<&PendingAttestation> = attestations
        .iter()
        .copied()
        .filter(|a| a.data.shard == shard && a.data.shard_block_root == shard_block_root)
        .collect();
    attesting_indices(state, &filtered, spec)
}

/// Filters to attestations with `data.justified_epoch == target_epoch` and the given
/// `epoch_boundary_root`, then expands+unions.
pub fn boundary_attester_indices(
    state: &BeaconState,
    attestations: &[&PendingAttestation],
    target_epoch: Epoch,
    epoch_boundary_root: Hash256,
    spec: &ChainSpec,
) -> Result<BTreeSet<ValidatorIndex>, Error> {
    let filtered: Vec<&PendingAttestation> = attestations
        .iter()
        .copied()
        .filter(|a| a.data.justified_epoch == target_epoch && a.data.epoch_boundary_root == epoch_boundary_root)
        .collect();
    attesting_indices(state, &filtered, spec)
}

/// Per-validator earliest inclusion distance and inclusion slot, derived from
/// `previous_epoch_attestations`. `D[i] = S[i] - data.slot`; when a validator appears in more
/// than one attestation, the earliest `slot_included` wins.
pub fn inclusion_data(
    state: &BeaconState,
    attestations: &[&PendingAttestation],
    spec: &ChainSpec,
) -> Result<std::collections::BTreeMap<ValidatorIndex, (u64, Slot)>, Error> {
    use safe_arith::SafeArith;

    let mut map: std::collections::BTreeMap<ValidatorIndex, (u64, Slot)> =
        std::collections::BTreeMap::new();

    for a in attestations {
        let distance = a.slot_included.as_u64().safe_sub(a.data.slot.as_u64())?;
        for i in state.get_attestation_participants(&a.data, &a.aggregation_bitfield, spec)? {
            map.entry(i)
                .and_modify(|(d, s)| {
                    if a.slot_included < *s {
                        *d = distance;
                        *s = a.slot_included;
                    }
                })
                .or_insert((distance, a.slot_included));
        }
    }

    Ok(map)
}

/// `(previous_epoch_boundary_balance, current_epoch_boundary_balance)`, per §4.4.
pub fn epoch_boundary_attesting_balances(state: &BeaconState, spec: &ChainSpec) -> Result<(u64, u64), Error> {
    let previous_epoch = state.previous_epoch(spec);
    let current_epoch = state.current_epoch(spec);

    let previous_boundary_root = state.get_block_root(previous_epoch.start_slot(spec.slots_per_epoch), spec)?;
    let current_boundary_root = state.get_block_root(current_epoch.start_slot(spec.slots_per_epoch), spec)?;

    let combined: Vec<&PendingAttestation> = current_epoch_attestations(state, spec)
        .into_iter()
        .chain(previous_epoch_attestations(state, spec))
        .collect();

    let previous_attesters =
        boundary_attester_indices(state, &combined, state.previous_justified_epoch, previous_boundary_root, spec)?;
    let previous_balance = state.get_total_balance(
        &previous_attesters.into_iter().collect::<Vec<_>>(),
        spec,
    )?;

    let current_only = current_epoch_attestations(state, spec);
    let current_attesters =
        boundary_attester_indices(state, &current_only, state.justified_epoch, current_boundary_root, spec)?;
    let current_balance = state.get_total_balance(&current_attesters.into_iter().collect::<Vec<_>>(), spec)?;

    Ok((previous_balance, current_balance))
}
