use crate::{Epoch, Hash256, Shard};
use serde::{Deserialize, Serialize};

/// The `(epoch, start_shard, seed)` triple that controls one epoch's committee shuffling.
/// `BeaconState` carries a `current` and a `previous` instance of this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ShufflingData {
    pub epoch: Epoch,
    pub start_shard: Shard,
    pub seed: Hash256,
}
