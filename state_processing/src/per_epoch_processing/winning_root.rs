//! Winning-root selection (§4.3): for a shard and a set of attestations already known to target
//! it, pick the shard-block-root with the largest attesting balance, tie-broken by the
//! lexicographically smallest root.

use super::attester_sets::shard_block_root_attester_indices;
use super::errors::NoWinningRootError;
use std::collections::BTreeSet;
use std::collections::HashSet;
use types::{BeaconState, ChainSpec, Hash256, PendingAttestation, Shard, ValidatorIndex};

#[derive(Clone)]
pub struct WinningRoot {
    pub shard_block_root: Hash256,
    pub attesting_validator_indices: BTreeSet<ValidatorIndex>,
    pub total_attesting_balance: u64,
}

impl WinningRoot {
    /// `true` if `self` should replace `other` as the current-best candidate: a strictly higher
    /// balance always wins; on a tie, the smaller root (compared as raw big-endian bytes) wins.
    fn is_better_than(&self, other: &Self) -> bool {
        match self.total_attesting_balance.cmp(&other.total_attesting_balance) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => self.shard_block_root < other.shard_block_root,
            std::cmp::Ordering::Less => false,
        }
    }
}

/// Selects the winning root for `shard` among `attestations` (already filtered or not — this
/// function does its own shard filtering so callers may pass a combined previous+current set).
///
/// Iteration runs over a `HashSet` of candidate roots, so the order candidates are visited in is
/// unspecified; determinism comes entirely from `is_better_than`'s tie-break, not from visitation
/// order, satisfying the "iteration order must not affect the result" requirement.
pub fn winning_root(
    state: &BeaconState,
    attestations: &[&PendingAttestation],
    shard: Shard,
    spec: &ChainSpec,
) -> Result<WinningRoot, NoWinningRootError> {
    let candidate_roots: HashSet<Hash256> = attestations
        .iter()
        .filter(|a| a.data.shard == shard)
        .map(|a| a.data.shard_block_root)
        .collect();

    let mut winner: Option<WinningRoot> = None;

    for root in candidate_roots {
        let attesting_validator_indices =
            shard_block_root_attester_indices(state, attestations, shard, root, spec)
                .map_err(|_| NoWinningRootError)?;

        let total_attesting_balance = state
            .get_total_balance(
                &attesting_validator_indices.iter().copied().collect::<Vec<_>>(),
                spec,
            )
            .map_err(|_| NoWinningRootError)?;

        if total_attesting_balance == 0 {
            continue;
        }

        let candidate = WinningRoot {
            shard_block_root: root,
            attesting_validator_indices,
            total_attesting_balance,
        };

        winner = Some(match winner {
            Some(current) if !candidate.is_better_than(&current) => current,
            _ => candidate,
        });
    }

    winner.ok_or(NoWinningRootError)
}
