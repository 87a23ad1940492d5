use crate::{Epoch, Hash256};
use serde::{Deserialize, Serialize};

/// A pointer from the beacon chain into a shard chain, recording the shard-block-root agreed
/// upon at a given epoch. `BeaconState::latest_crosslinks` holds exactly `SHARD_COUNT` of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Crosslink {
    pub epoch: Epoch,
    pub shard_block_root: Hash256,
}
