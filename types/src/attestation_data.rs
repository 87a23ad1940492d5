use crate::{Epoch, Hash256, Shard, Slot};
use serde::{Deserialize, Serialize};

/// The data upon which an attestation is based.
///
/// Unlike the mainnet-era shape (a single `source`/`target` checkpoint pair), this is the Phase 0
/// sharded shape: attestations vote directly for a shard block root alongside the FFG fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttestationData {
    /// The slot in which the attestation was created.
    pub slot: Slot,
    /// The shard this attestation is crosslinking for.
    pub shard: Shard,
    /// Root of the beacon block that the attester is voting for (LMD GHOST vote).
    pub beacon_block_root: Hash256,
    /// Root of the block at the start of the epoch containing `slot` (the FFG target).
    pub epoch_boundary_root: Hash256,
    /// Shard block root the attester is crosslinking for.
    pub shard_block_root: Hash256,
    /// The most recent justified epoch the attester considers canonical (the FFG source).
    pub justified_epoch: Epoch,
}

impl AttestationData {
    /// The epoch `self.slot` falls within.
    pub fn slot_epoch(&self, slots_per_epoch: u64) -> Epoch {
        self.slot.epoch(slots_per_epoch)
    }
}
