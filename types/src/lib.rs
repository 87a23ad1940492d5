//! Consensus types for the Phase 0 beacon-chain epoch transition: the `BeaconState` aggregate,
//! its component records, and the chain configuration that parameterizes processing.
//!
//! Signature verification, SSZ encoding and tree-hash merkleization — all load-bearing for a
//! networked client — are deliberately absent. Nothing here talks to disk or the wire; it exists
//! to give `state_processing` a typed, in-memory state to transform.

mod attestation_data;
mod beacon_state;
mod bitfield;
mod chain_spec;
mod committee;
mod crosslink;
mod errors;
mod pending_attestation;
mod primitives;
mod shuffling;
mod validator;

pub use attestation_data::AttestationData;
pub use beacon_state::BeaconState;
pub use bitfield::Bitfield;
pub use chain_spec::ChainSpec;
pub use crosslink::Crosslink;
pub use errors::BeaconStateError;
pub use pending_attestation::PendingAttestation;
pub use primitives::{Epoch, Gwei, Hash256, Shard, Slot, ValidatorIndex};
pub use shuffling::ShufflingData;
pub use validator::Validator;
