use safe_arith::ArithError;

/// Errors arising from malformed access to a `BeaconState`.
///
/// Per the invariants this crate relies on, most of these indicate a bug in the caller (an
/// out-of-range index, a ring buffer read against an epoch outside its window) rather than a
/// recoverable runtime condition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum BeaconStateError {
    /// A validator index was out of bounds for `validator_registry` / `validator_balances`.
    UnknownValidator(usize),
    /// A shard index was out of bounds for `latest_crosslinks`.
    ShardOutOfBounds(u64),
    /// An epoch fell outside the rolling window of a ring buffer.
    EpochOutOfBounds,
    /// A slot fell outside the rolling window of `latest_block_roots`.
    SlotOutOfBounds,
    /// `validator_registry.len() != validator_balances.len()`.
    RegistryBalanceMismatch,
    /// An aggregation or custody bitfield's length did not match its committee's.
    InvalidBitfield,
    ArithError(ArithError),
}

impl From<ArithError> for BeaconStateError {
    fn from(e: ArithError) -> Self {
        BeaconStateError::ArithError(e)
    }
}
