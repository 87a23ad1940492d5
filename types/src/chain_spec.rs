use crate::Epoch;

/// Configuration constants for epoch processing.
///
/// Mirrors the config surface consumed by `state_processing`: slot/epoch timing, the shard and
/// committee layout, reward/penalty quotients, and the lengths of the ring buffers `BeaconState`
/// carries. There is exactly one canonical instance (`ChainSpec::mainnet`) for this fork; networks
/// that want different constants would add another constructor, not a runtime-configurable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainSpec {
    pub slots_per_epoch: u64,
    pub genesis_epoch: Epoch,
    pub shard_count: u64,
    pub target_committee_size: u64,
    pub max_deposit_amount: u64,
    pub base_reward_quotient: u64,
    pub inactivity_penalty_quotient: u64,
    pub includer_reward_quotient: u64,
    pub min_attestation_inclusion_delay: u64,
    pub activation_exit_delay: u64,
    pub min_seed_lookahead: u64,
    pub latest_block_roots_length: u64,
    pub latest_randao_mixes_length: u64,
    pub latest_active_index_roots_length: u64,
    pub latest_slashed_exit_length: u64,
}

impl ChainSpec {
    /// The canonical Phase 0 constant set.
    pub fn mainnet() -> Self {
        Self {
            slots_per_epoch: 64,
            genesis_epoch: Epoch::new(0),
            shard_count: 1_024,
            target_committee_size: 128,
            max_deposit_amount: 32_000_000_000,
            base_reward_quotient: 32,
            inactivity_penalty_quotient: 1 << 25,
            includer_reward_quotient: 8,
            min_attestation_inclusion_delay: 4,
            activation_exit_delay: 4,
            min_seed_lookahead: 1,
            latest_block_roots_length: 8_192,
            latest_randao_mixes_length: 8_192,
            latest_active_index_roots_length: 8_192,
            latest_slashed_exit_length: 8_192,
        }
    }

    /// A spec with tiny ring buffers and committee sizes, for fast unit tests.
    pub fn minimal() -> Self {
        Self {
            slots_per_epoch: 8,
            genesis_epoch: Epoch::new(0),
            shard_count: 8,
            target_committee_size: 4,
            max_deposit_amount: 32_000_000_000,
            base_reward_quotient: 32,
            inactivity_penalty_quotient: 1 << 25,
            includer_reward_quotient: 8,
            min_attestation_inclusion_delay: 2,
            activation_exit_delay: 4,
            min_seed_lookahead: 1,
            latest_block_roots_length: 64,
            latest_randao_mixes_length: 64,
            latest_active_index_roots_length: 64,
            latest_slashed_exit_length: 64,
        }
    }
}

impl Default for ChainSpec {
    fn default() -> Self {
        Self::mainnet()
    }
}
