//! A variable-length bitfield, standing in for the SSZ `Bitlist` used by mainnet-era committee
//! aggregation bits. Persistence and merkleization are out of scope for this crate, so this is a
//! plain `Vec<bool>` wrapper rather than an `ssz_types::BitList`.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitfield(Vec<bool>);

impl Bitfield {
    pub fn with_capacity(len: usize) -> Self {
        Self(vec![false; len])
    }

    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<bool> {
        self.0.get(i).copied()
    }

    pub fn set(&mut self, i: usize, value: bool) {
        if let Some(bit) = self.0.get_mut(i) {
            *bit = value;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }
}
