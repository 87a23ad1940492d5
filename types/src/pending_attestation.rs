use crate::{AttestationData, Bitfield, Slot};

/// An attestation that has been included in a block but not yet consumed by epoch processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAttestation {
    /// One bit per member of the committee `data` was assigned to, set iff that member attested.
    pub aggregation_bitfield: Bitfield,
    /// Attestation data associated with this pending attestation.
    pub data: AttestationData,
    /// One bit per committee member indicating custody of the associated shard data.
    /// Unused by epoch processing; carried only because it is part of the canonical record.
    pub custody_bitfield: Bitfield,
    /// The slot at which this attestation was first included in a block.
    pub slot_included: Slot,
}
