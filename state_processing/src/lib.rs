#![cfg_attr(
    not(test),
    deny(
        clippy::arithmetic_side_effects,
        clippy::disallowed_methods,
        clippy::indexing_slicing,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::let_underscore_must_use
    )
)]

/// This module contains metrics related functionality.
mod metrics;

/// Public module `common` contains balance mutation and base-reward helpers shared by more than
/// one epoch-processing sub-phase.
pub mod common;

/// Public module `per_epoch_processing` provides the per-epoch state transition: justification
/// and finalization, crosslinks, rewards and penalties, registry updates, final updates.
pub mod per_epoch_processing;

/// Re-export of the epoch-processing entry point and its error type.
pub use per_epoch_processing::{errors::EpochProcessingError, process_epoch};
