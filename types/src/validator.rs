use crate::Epoch;
use serde::{Deserialize, Serialize};

/// A record in `BeaconState::validator_registry`.
///
/// Mainnet-era Lighthouse tracks pubkeys, withdrawal credentials and slashing status here too;
/// this crate keeps only the fields epoch processing actually reads or writes (`deposit` /
/// `activation_eligibility` / signature-verification fields are the external registrar's
/// concern).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Effective balance in Gwei, capped at `MAX_DEPOSIT_AMOUNT` by the registrar that writes it.
    pub effective_balance: u64,
    /// Epoch at which the validator became (or will become) active.
    pub activation_epoch: Epoch,
    /// Epoch at which the validator exits (or will exit).
    pub exit_epoch: Epoch,
    /// Epoch at which the validator was penalized (slashed); `FAR_FUTURE_EPOCH` if never.
    pub penalized_epoch: Epoch,
}

impl Validator {
    /// Whether the validator is active at `epoch`, per the external `active_validator_indices`
    /// collaborator this crate's helpers reimplement against this type directly.
    pub fn is_active_at(&self, epoch: Epoch) -> bool {
        self.activation_epoch <= epoch && epoch < self.exit_epoch
    }
}
