use types::BeaconStateError;

/// Errors that can occur during epoch processing.
///
/// `NoWinningRoot` is the one structured failure kind the transition itself can raise (inside
/// winning-root selection); callers inside this crate catch it locally, so it should never
/// actually escape `process_epoch`. Everything else indicates an invariant violation in the input
/// `BeaconState` or a bug in this crate, not a recoverable runtime condition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum EpochProcessingError {
    /// No shard-block-root attracted a strictly positive tied-or-greater attesting balance.
    NoWinningRoot,
    /// `validator_registry.len() != validator_balances.len()`.
    RegistryBalanceMismatch,
    /// An error related to the beacon state.
    BeaconStateError(BeaconStateError),
    /// An arithmetic error.
    ArithError(safe_arith::ArithError),
}

impl From<BeaconStateError> for EpochProcessingError {
    fn from(e: BeaconStateError) -> Self {
        EpochProcessingError::BeaconStateError(e)
    }
}

impl From<safe_arith::ArithError> for EpochProcessingError {
    fn from(e: safe_arith::ArithError) -> Self {
        EpochProcessingError::ArithError(e)
    }
}

/// Raised by the winning-root selector; always caught locally and converted into "no crosslink
/// update" / "empty attester set" by its two callers, never allowed to escape `process_epoch`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct NoWinningRootError;

impl From<NoWinningRootError> for EpochProcessingError {
    fn from(_: NoWinningRootError) -> Self {
        EpochProcessingError::NoWinningRoot
    }
}
