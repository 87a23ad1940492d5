use lazy_static::lazy_static;
pub use metrics::*;

lazy_static! {
    /// Time required for `process_epoch`.
    pub static ref PROCESS_EPOCH_TIME: Result<Histogram> = try_create_histogram(
        "beacon_state_processing_process_epoch",
        "Time required for process_epoch",
    );

    /// Number of `(slot, shard)` pairs for which crosslink processing found no winning root.
    /// Expected to be non-zero under ordinary participation; a sustained rise relative to the
    /// number of shards is a cheap signal of reduced attester participation.
    pub static ref CROSSLINK_NO_WINNING_ROOT: Result<IntCounter> = try_create_int_counter(
        "beacon_state_processing_crosslink_no_winning_root_total",
        "Number of crosslink committees with no winning root in process_crosslinks",
    );

    /// Number of `(slot, shard)` pairs for which crosslink-reward processing found no winning
    /// root (and therefore penalized the whole committee).
    pub static ref CROSSLINK_REWARDS_NO_WINNING_ROOT: Result<IntCounter> = try_create_int_counter(
        "beacon_state_processing_crosslink_rewards_no_winning_root_total",
        "Number of crosslink committees with no winning root in process_crosslink_rewards",
    );
}
