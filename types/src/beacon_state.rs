use crate::{
    committee, AttestationData, Bitfield, ChainSpec, Crosslink, Epoch, Hash256,
    PendingAttestation, Shard, ShufflingData, Slot, Validator, ValidatorIndex,
};
use crate::errors::BeaconStateError as Error;
use safe_arith::SafeArith;

/// The full consensus-critical state of the beacon chain.
///
/// This is the aggregate `process_epoch` reads and writes. Fields not touched by epoch processing
/// (deposits in flight, the current slot's block root accumulator, etc.) are out of scope for
/// this crate and are not modelled here.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconState {
    pub slot: Slot,

    pub validator_registry: Vec<Validator>,
    pub validator_balances: Vec<u64>,

    pub latest_attestations: Vec<PendingAttestation>,
    pub latest_crosslinks: Vec<Crosslink>,

    /// Ring buffer, length `latest_block_roots_length`.
    pub latest_block_roots: Vec<Hash256>,
    /// Ring buffer, length `latest_randao_mixes_length`.
    pub latest_randao_mixes: Vec<Hash256>,
    /// Ring buffer, length `latest_active_index_roots_length`.
    pub latest_active_index_roots: Vec<Hash256>,
    /// Ring buffer, length `latest_slashed_exit_length`.
    pub latest_slashed_balances: Vec<u64>,

    pub justification_bitfield: u64,
    pub previous_justified_epoch: Epoch,
    pub justified_epoch: Epoch,
    pub finalized_epoch: Epoch,

    pub previous_shuffling: ShufflingData,
    pub current_shuffling: ShufflingData,

    pub validator_registry_update_epoch: Epoch,
}

impl BeaconState {
    /// A state with empty ring buffers of the sizes `spec` demands and no validators. Useful as
    /// a base for tests; not a substitute for genesis construction (out of scope here).
    pub fn new(spec: &ChainSpec) -> Self {
        Self {
            slot: Slot::new(0),
            validator_registry: vec![],
            validator_balances: vec![],
            latest_attestations: vec![],
            latest_crosslinks: vec![Crosslink::default(); spec.shard_count as usize],
            latest_block_roots: vec![Hash256::zero(); spec.latest_block_roots_length as usize],
            latest_randao_mixes: vec![Hash256::zero(); spec.latest_randao_mixes_length as usize],
            latest_active_index_roots: vec![
                Hash256::zero();
                spec.latest_active_index_roots_length as usize
            ],
            latest_slashed_balances: vec![0; spec.latest_slashed_exit_length as usize],
            justification_bitfield: 0,
            previous_justified_epoch: spec.genesis_epoch,
            justified_epoch: spec.genesis_epoch,
            finalized_epoch: spec.genesis_epoch,
            previous_shuffling: ShufflingData::default(),
            current_shuffling: ShufflingData::default(),
            validator_registry_update_epoch: spec.genesis_epoch,
        }
    }

    // -- epoch arithmetic ---------------------------------------------------

    pub fn current_epoch(&self, spec: &ChainSpec) -> Epoch {
        self.slot.epoch(spec.slots_per_epoch)
    }

    pub fn previous_epoch(&self, spec: &ChainSpec) -> Epoch {
        let current = self.current_epoch(spec);
        if current == spec.genesis_epoch {
            spec.genesis_epoch
        } else {
            current.saturating_sub_one()
        }
    }

    pub fn next_epoch(&self, spec: &ChainSpec) -> Result<Epoch, Error> {
        Ok(self.current_epoch(spec).safe_add(1)?)
    }

    // -- balances -------------------------------------------------------------

    pub fn get_balance(&self, index: usize) -> Result<u64, Error> {
        self.validator_balances
            .get(index)
            .copied()
            .ok_or(Error::UnknownValidator(index))
    }

    pub fn get_balance_mut(&mut self, index: usize) -> Result<&mut u64, Error> {
        self.validator_balances
            .get_mut(index)
            .ok_or(Error::UnknownValidator(index))
    }

    pub fn set_balance(&mut self, index: usize, balance: u64) -> Result<(), Error> {
        *self.get_balance_mut(index)? = balance;
        Ok(())
    }

    /// `min(balance(i), MAX_DEPOSIT_AMOUNT)`.
    pub fn get_effective_balance(&self, index: usize, spec: &ChainSpec) -> Result<u64, Error> {
        Ok(self.get_balance(index)?.min(spec.max_deposit_amount))
    }

    /// Sum of effective balances over `indices`.
    pub fn get_total_balance(
        &self,
        indices: &[ValidatorIndex],
        spec: &ChainSpec,
    ) -> Result<u64, Error> {
        indices.iter().try_fold(0u64, |total, &i| {
            Ok(total.safe_add(self.get_effective_balance(i as usize, spec)?)?)
        })
    }

    // -- validator set --------------------------------------------------------

    pub fn get_validator(&self, index: usize) -> Result<&Validator, Error> {
        self.validator_registry
            .get(index)
            .ok_or(Error::UnknownValidator(index))
    }

    /// Sorted ascending indices of validators active at `epoch`.
    pub fn get_active_validator_indices(&self, epoch: Epoch) -> Vec<ValidatorIndex> {
        self.validator_registry
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_active_at(epoch))
            .map(|(i, _)| i as ValidatorIndex)
            .collect()
    }

    // -- crosslinks -------------------------------------------------------------

    pub fn get_crosslink(&self, shard: usize) -> Result<&Crosslink, Error> {
        self.latest_crosslinks
            .get(shard)
            .ok_or(Error::ShardOutOfBounds(shard as u64))
    }

    pub fn set_crosslink(&mut self, shard: usize, crosslink: Crosslink) -> Result<(), Error> {
        *self
            .latest_crosslinks
            .get_mut(shard)
            .ok_or(Error::ShardOutOfBounds(shard as u64))? = crosslink;
        Ok(())
    }

    // -- ring buffer reads ------------------------------------------------------

    pub fn get_block_root(&self, slot: Slot, spec: &ChainSpec) -> Result<Hash256, Error> {
        let current = self.slot;
        let too_old = slot
            .as_u64()
            .safe_add(spec.latest_block_roots_length)
            .map(|bound| bound <= current.as_u64())
            .unwrap_or(false);
        if slot >= current || too_old {
            return Err(Error::SlotOutOfBounds);
        }
        let i = slot.as_u64().safe_rem(spec.latest_block_roots_length)? as usize;
        self.latest_block_roots
            .get(i)
            .copied()
            .ok_or(Error::SlotOutOfBounds)
    }

    pub fn get_randao_mix(&self, epoch: Epoch, spec: &ChainSpec) -> Result<Hash256, Error> {
        let i = epoch.as_u64().safe_rem(spec.latest_randao_mixes_length)? as usize;
        self.latest_randao_mixes
            .get(i)
            .copied()
            .ok_or(Error::EpochOutOfBounds)
    }

    pub fn get_active_index_root(&self, epoch: Epoch, spec: &ChainSpec) -> Result<Hash256, Error> {
        let i = epoch.as_u64().safe_rem(spec.latest_active_index_roots_length)? as usize;
        self.latest_active_index_roots
            .get(i)
            .copied()
            .ok_or(Error::EpochOutOfBounds)
    }

    // -- ring buffer writes -----------------------------------------------------

    pub fn set_active_index_root_at(&mut self, index: usize, root: Hash256) -> Result<(), Error> {
        *self
            .latest_active_index_roots
            .get_mut(index)
            .ok_or(Error::EpochOutOfBounds)? = root;
        Ok(())
    }

    pub fn get_slashed_balance_at(&self, index: usize) -> Result<u64, Error> {
        self.latest_slashed_balances
            .get(index)
            .copied()
            .ok_or(Error::EpochOutOfBounds)
    }

    pub fn set_slashed_balance_at(&mut self, index: usize, balance: u64) -> Result<(), Error> {
        *self
            .latest_slashed_balances
            .get_mut(index)
            .ok_or(Error::EpochOutOfBounds)? = balance;
        Ok(())
    }

    pub fn set_randao_mix_at(&mut self, index: usize, mix: Hash256) -> Result<(), Error> {
        *self
            .latest_randao_mixes
            .get_mut(index)
            .ok_or(Error::EpochOutOfBounds)? = mix;
        Ok(())
    }

    // -- committees, proposer, seed ------------------------------------------

    /// The shuffling data that applies to `epoch` (current or previous; this crate's state
    /// never needs to reach further back).
    fn shuffling_for_epoch(&self, epoch: Epoch, spec: &ChainSpec) -> (&ShufflingData, Epoch) {
        if epoch == self.current_shuffling.epoch || epoch == self.current_epoch(spec) {
            (&self.current_shuffling, epoch)
        } else {
            (&self.previous_shuffling, epoch)
        }
    }

    pub fn get_crosslink_committees_at_slot(
        &self,
        slot: Slot,
        spec: &ChainSpec,
    ) -> Result<Vec<(Vec<ValidatorIndex>, Shard)>, Error> {
        let epoch = slot.epoch(spec.slots_per_epoch);
        let (shuffling, epoch) = self.shuffling_for_epoch(epoch, spec);
        let active = self.get_active_validator_indices(epoch);
        committee::get_crosslink_committees_at_slot(
            slot,
            shuffling.seed,
            shuffling.start_shard,
            &active,
            spec,
        )
    }

    pub fn get_beacon_proposer_index(&self, slot: Slot, spec: &ChainSpec) -> Result<ValidatorIndex, Error> {
        let epoch = slot.epoch(spec.slots_per_epoch);
        let (shuffling, epoch) = self.shuffling_for_epoch(epoch, spec);
        let active = self.get_active_validator_indices(epoch);
        committee::get_beacon_proposer_index(slot, shuffling.seed, shuffling.start_shard, &active, spec)
    }

    pub fn get_current_epoch_committee_count(&self, spec: &ChainSpec) -> Result<u64, Error> {
        let active = self.get_active_validator_indices(self.current_epoch(spec));
        committee::get_epoch_committee_count(active.len(), spec)
    }

    /// Validator indices whose bit is set in `aggregation_bitfield`, for the committee assigned
    /// to `(data.slot, data.shard)`.
    pub fn get_attestation_participants(
        &self,
        data: &AttestationData,
        aggregation_bitfield: &Bitfield,
        spec: &ChainSpec,
    ) -> Result<Vec<ValidatorIndex>, Error> {
        let committees = self.get_crosslink_committees_at_slot(data.slot, spec)?;
        let (committee, _shard) = committees
            .into_iter()
            .find(|(_, shard)| *shard == data.shard)
            .ok_or(Error::ShardOutOfBounds(data.shard))?;

        if aggregation_bitfield.len() != committee.len() {
            return Err(Error::InvalidBitfield);
        }

        Ok(committee
            .into_iter()
            .enumerate()
            .filter(|(i, _)| aggregation_bitfield.get(*i) == Some(true))
            .map(|(_, index)| index)
            .collect())
    }

    /// Derives the shuffling seed for `epoch` from the randao mix `MIN_SEED_LOOKAHEAD` epochs
    /// prior and the active-index root for `epoch`.
    pub fn generate_seed(&self, epoch: Epoch, spec: &ChainSpec) -> Result<Hash256, Error> {
        let lookback = Epoch::new(
            epoch
                .as_u64()
                .saturating_sub(spec.min_seed_lookahead),
        );
        let randao_mix = self.get_randao_mix(lookback, spec)?;
        let active_index_root = self.get_active_index_root(epoch, spec)?;
        Ok(committee::generate_seed(randao_mix, active_index_root, epoch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_allocates_ring_buffers_at_spec_lengths() {
        let spec = ChainSpec::minimal();
        let state = BeaconState::new(&spec);

        assert_eq!(state.latest_block_roots.len(), spec.latest_block_roots_length as usize);
        assert_eq!(state.latest_randao_mixes.len(), spec.latest_randao_mixes_length as usize);
        assert_eq!(
            state.latest_active_index_roots.len(),
            spec.latest_active_index_roots_length as usize
        );
        assert_eq!(state.latest_slashed_balances.len(), spec.latest_slashed_exit_length as usize);
        assert_eq!(state.latest_crosslinks.len(), spec.shard_count as usize);
    }

    #[test]
    fn effective_balance_caps_at_max_deposit_amount() {
        let spec = ChainSpec::minimal();
        let mut state = BeaconState::new(&spec);
        state.validator_balances.push(spec.max_deposit_amount * 2);
        state.validator_balances.push(spec.max_deposit_amount / 2);

        assert_eq!(state.get_effective_balance(0, &spec).unwrap(), spec.max_deposit_amount);
        assert_eq!(
            state.get_effective_balance(1, &spec).unwrap(),
            spec.max_deposit_amount / 2
        );
    }

    #[test]
    fn get_balance_rejects_an_out_of_range_index() {
        let spec = ChainSpec::minimal();
        let state = BeaconState::new(&spec);
        assert!(state.get_balance(0).is_err());
    }

    #[test]
    fn get_block_root_rejects_the_current_and_future_slots() {
        let spec = ChainSpec::minimal();
        let mut state = BeaconState::new(&spec);
        state.slot = Slot::new(10);

        assert!(state.get_block_root(Slot::new(10), &spec).is_err());
        assert!(state.get_block_root(Slot::new(11), &spec).is_err());
        assert!(state.get_block_root(Slot::new(9), &spec).is_ok());
    }

    #[test]
    fn get_block_root_rejects_slots_older_than_the_ring_buffer() {
        let spec = ChainSpec::minimal();
        let mut state = BeaconState::new(&spec);
        state.slot = Slot::new(spec.latest_block_roots_length + 10);

        assert!(state.get_block_root(Slot::new(9), &spec).is_err());
        assert!(state
            .get_block_root(Slot::new(spec.latest_block_roots_length + 9), &spec)
            .is_ok());
    }

    #[test]
    fn get_block_root_reads_back_what_was_written_at_the_wrapped_index() {
        let spec = ChainSpec::minimal();
        let mut state = BeaconState::new(&spec);
        state.slot = Slot::new(spec.latest_block_roots_length + 5);

        let slot = Slot::new(3);
        let i = (slot.as_u64() % spec.latest_block_roots_length) as usize;
        state.latest_block_roots[i] = Hash256::repeat_byte(0x42);

        assert_eq!(state.get_block_root(slot, &spec).unwrap(), Hash256::repeat_byte(0x42));
    }

    #[test]
    fn active_validator_indices_are_sorted_ascending_and_exclude_inactive() {
        let spec = ChainSpec::minimal();
        let mut state = BeaconState::new(&spec);
        let active = |activation: u64, exit: u64| Validator {
            effective_balance: spec.max_deposit_amount,
            activation_epoch: Epoch::new(activation),
            exit_epoch: Epoch::new(exit),
            penalized_epoch: Epoch::new(u64::MAX),
        };
        state.validator_registry.push(active(0, u64::MAX)); // 0: active at epoch 5
        state.validator_registry.push(active(0, 3)); // 1: already exited by epoch 5
        state.validator_registry.push(active(10, u64::MAX)); // 2: not yet activated
        state.validator_registry.push(active(0, u64::MAX)); // 3: active at epoch 5

        assert_eq!(state.get_active_validator_indices(Epoch::new(5)), vec![0, 3]);
    }

    #[test]
    fn previous_epoch_does_not_underflow_at_genesis() {
        let spec = ChainSpec::minimal();
        let state = BeaconState::new(&spec);
        assert_eq!(state.current_epoch(&spec), spec.genesis_epoch);
        assert_eq!(state.previous_epoch(&spec), spec.genesis_epoch);
    }
}
