//! Committee shuffling and seed generation.
//!
//! `process_epoch` treats these as opaque external collaborators (the spec this crate implements
//! explicitly scopes shuffling computation and hashing primitives out of the core), but something
//! in the workspace has to provide them — this is that something, built directly on the
//! `swap_or_not_shuffle` and `ethereum_hashing` crates rather than reimplemented ad hoc.

use crate::{BeaconStateError as Error, ChainSpec, Epoch, Hash256, Shard, Slot, ValidatorIndex};
use ethereum_hashing::hash_fixed;
use int_to_bytes::int_to_bytes8;
use safe_arith::SafeArith;
use swap_or_not_shuffle::shuffle_list;

/// Number of rounds used by the swap-or-not shuffle. Fixed by the shuffling algorithm, not a
/// network parameter.
const SHUFFLE_ROUND_COUNT: u8 = 90;

/// The number of committees active validators are split into for one epoch.
pub fn get_epoch_committee_count(active_validator_count: usize, spec: &ChainSpec) -> Result<u64, Error> {
    let active_validator_count = active_validator_count as u64;
    let committees_per_slot_max = spec.shard_count.safe_div(spec.slots_per_epoch)?;
    let count_per_slot = active_validator_count
        .safe_div(spec.slots_per_epoch)?
        .safe_div(spec.target_committee_size)?;
    let committees_per_slot = count_per_slot.clamp(1, committees_per_slot_max);
    committees_per_slot.safe_mul(spec.slots_per_epoch).map_err(Error::from)
}

/// Shuffles `active_validator_indices` and splits the result into
/// `get_epoch_committee_count` near-equal chunks.
pub fn get_shuffling(
    seed: Hash256,
    active_validator_indices: &[ValidatorIndex],
    spec: &ChainSpec,
) -> Result<Vec<Vec<ValidatorIndex>>, Error> {
    let committee_count = get_epoch_committee_count(active_validator_indices.len(), spec)? as usize;

    let input: Vec<usize> = active_validator_indices.iter().map(|&i| i as usize).collect();
    let shuffled = shuffle_list(input, SHUFFLE_ROUND_COUNT, seed.as_bytes(), true)
        .ok_or(Error::EpochOutOfBounds)?;

    Ok(split_into(&shuffled, committee_count)
        .into_iter()
        .map(|chunk| chunk.iter().map(|&i| i as ValidatorIndex).collect())
        .collect())
}

/// Splits `list` into `n` chunks of sizes differing by at most one, preserving order.
fn split_into<T: Clone>(list: &[T], n: usize) -> Vec<Vec<T>> {
    if n == 0 {
        return vec![];
    }
    let len = list.len();
    (0..n)
        .map(|i| {
            let start = len * i / n;
            let end = len * (i + 1) / n;
            list[start..end].to_vec()
        })
        .collect()
}

/// Committees (and their assigned shards) active at `slot`, given the shuffling seed, start
/// shard and active validator set that apply to `slot`'s epoch.
pub fn get_crosslink_committees_at_slot(
    slot: Slot,
    seed: Hash256,
    start_shard: Shard,
    active_validator_indices: &[ValidatorIndex],
    spec: &ChainSpec,
) -> Result<Vec<(Vec<ValidatorIndex>, Shard)>, Error> {
    let committees = get_shuffling(seed, active_validator_indices, spec)?;
    let committees_per_epoch = committees.len() as u64;
    let committees_per_slot = committees_per_epoch.safe_div(spec.slots_per_epoch)?;

    let offset = slot.as_u64().safe_rem(spec.slots_per_epoch)?;
    let slot_start_index = committees_per_slot.safe_mul(offset)? as usize;

    (0..committees_per_slot)
        .map(|i| {
            let committee = committees
                .get(slot_start_index + i as usize)
                .cloned()
                .ok_or(Error::EpochOutOfBounds)?;
            let shard = start_shard
                .safe_add(committees_per_slot.safe_mul(offset)?)?
                .safe_add(i)?
                .safe_rem(spec.shard_count)?;
            Ok((committee, shard))
        })
        .collect()
}

/// The proposer for `slot`: the member of the slot's first committee at index `slot %
/// committee.len()`.
pub fn get_beacon_proposer_index(
    slot: Slot,
    seed: Hash256,
    start_shard: Shard,
    active_validator_indices: &[ValidatorIndex],
    spec: &ChainSpec,
) -> Result<ValidatorIndex, Error> {
    let committees =
        get_crosslink_committees_at_slot(slot, seed, start_shard, active_validator_indices, spec)?;
    let (first_committee, _shard) = committees.first().ok_or(Error::EpochOutOfBounds)?;
    if first_committee.is_empty() {
        return Err(Error::EpochOutOfBounds);
    }
    let index = slot.as_u64().safe_rem(first_committee.len() as u64)? as usize;
    Ok(first_committee[index])
}

/// Derives the shuffling seed for `epoch` from the randao mix `MIN_SEED_LOOKAHEAD` epochs prior,
/// the active-index root and the epoch itself.
pub fn generate_seed(
    randao_mix: Hash256,
    active_index_root: Hash256,
    epoch: Epoch,
) -> Hash256 {
    let mut input = Vec::with_capacity(32 + 32 + 8);
    input.extend_from_slice(randao_mix.as_bytes());
    input.extend_from_slice(active_index_root.as_bytes());
    input.extend_from_slice(&int_to_bytes8(epoch.as_u64()));
    Hash256::from(hash_fixed(&input))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `target_committee_size=4, shard_count=64, slots_per_epoch=8` so
    /// `committees_per_slot_max == 8`, large enough to observe both clamp bounds.
    fn wide_spec() -> ChainSpec {
        ChainSpec {
            shard_count: 64,
            slots_per_epoch: 8,
            target_committee_size: 4,
            ..ChainSpec::minimal()
        }
    }

    #[test]
    fn committee_count_clamps_to_one_per_slot_when_active_set_is_small() {
        let spec = wide_spec();
        // 16 / 8 / 4 == 0, clamped up to 1 committee per slot.
        assert_eq!(get_epoch_committee_count(16, &spec).unwrap(), spec.slots_per_epoch);
    }

    #[test]
    fn committee_count_clamps_to_shard_bound_when_active_set_is_large() {
        let spec = wide_spec();
        // 2048 / 8 / 4 == 64, clamped down to shard_count / slots_per_epoch == 8.
        let count = get_epoch_committee_count(2048, &spec).unwrap();
        assert_eq!(count, spec.shard_count);
    }

    #[test]
    fn committee_count_matches_unclamped_formula_in_between() {
        let spec = wide_spec();
        // 256 / 8 / 4 == 8, exactly at the clamp ceiling.
        let count = get_epoch_committee_count(256, &spec).unwrap();
        assert_eq!(count, 8 * spec.slots_per_epoch);
    }

    #[test]
    fn split_into_chunk_sizes_differ_by_at_most_one() {
        let list: Vec<u64> = (0..10).collect();
        let chunks = split_into(&list, 3);
        assert_eq!(chunks.iter().map(Vec::len).sum::<usize>(), 10);
        let lens: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![3, 3, 4]);
    }

    #[test]
    fn split_into_preserves_order() {
        let list: Vec<u64> = (0..9).collect();
        let chunks = split_into(&list, 3);
        let flattened: Vec<u64> = chunks.into_iter().flatten().collect();
        assert_eq!(flattened, list);
    }

    #[test]
    fn crosslink_committees_are_deterministic_given_the_same_seed() {
        let spec = wide_spec();
        let seed = Hash256::repeat_byte(3);
        let active: Vec<ValidatorIndex> = (0..32).collect();

        let a = get_crosslink_committees_at_slot(Slot::new(0), seed, 0, &active, &spec).unwrap();
        let b = get_crosslink_committees_at_slot(Slot::new(0), seed, 0, &active, &spec).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn crosslink_committees_cover_every_active_validator_exactly_once_per_epoch() {
        let spec = wide_spec();
        let seed = Hash256::repeat_byte(11);
        let active: Vec<ValidatorIndex> = (0..32).collect();

        let mut seen = Vec::new();
        for slot in 0..spec.slots_per_epoch {
            for (committee, _shard) in
                get_crosslink_committees_at_slot(Slot::new(slot), seed, 0, &active, &spec).unwrap()
            {
                seen.extend(committee);
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, active);
    }

    #[test]
    fn beacon_proposer_index_is_a_member_of_the_first_committee() {
        let spec = wide_spec();
        let seed = Hash256::repeat_byte(5);
        let active: Vec<ValidatorIndex> = (0..32).collect();

        let committees = get_crosslink_committees_at_slot(Slot::new(2), seed, 0, &active, &spec).unwrap();
        let (first_committee, _shard) = &committees[0];

        let proposer = get_beacon_proposer_index(Slot::new(2), seed, 0, &active, &spec).unwrap();
        assert!(first_committee.contains(&proposer));
    }

    #[test]
    fn generate_seed_is_a_pure_function_of_its_inputs() {
        let randao_mix = Hash256::repeat_byte(1);
        let active_index_root = Hash256::repeat_byte(2);

        let a = generate_seed(randao_mix, active_index_root, Epoch::new(5));
        let b = generate_seed(randao_mix, active_index_root, Epoch::new(5));
        let c = generate_seed(randao_mix, active_index_root, Epoch::new(6));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
