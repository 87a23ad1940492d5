//! Provides functions for converting integers to and from a fixed-length, little-endian bytes
//! representation, as required by the epoch-processing helpers (`generate_seed`,
//! `get_active_index_root`) that hash an integer alongside other fixed-size fields.

use bytes::{BufMut, BytesMut};

/// Returns `int` as little-endian bytes with a length of 4.
pub fn int_to_bytes4(int: u32) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(4);
    bytes.put_u32_le(int);
    bytes.to_vec()
}

/// Returns `int` as little-endian bytes with a length of 8.
pub fn int_to_bytes8(int: u64) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(8);
    bytes.put_u64_le(int);
    bytes.to_vec()
}

/// Returns `int` as little-endian bytes with a length of 32.
pub fn int_to_bytes32(int: u64) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(32);
    bytes.put_u64_le(int);
    bytes.resize(32, 0);
    bytes.to_vec()
}

/// Returns `int` as little-endian bytes with a length of 48.
pub fn int_to_bytes48(int: u64) -> Vec<u8> {
    let mut bytes = BytesMut::with_capacity(48);
    bytes.put_u64_le(int);
    bytes.resize(48, 0);
    bytes.to_vec()
}

/// Returns the smallest 8 bytes of `int` (converted to little-endian) as an integer.
pub fn bytes_to_int8(bytes: &[u8]) -> u64 {
    let mut array = [0; 8];
    array.copy_from_slice(&bytes[0..8]);
    u64::from_le_bytes(array)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_to_bytes4() {
        assert_eq!(int_to_bytes4(0), vec![0; 4]);
        assert_eq!(int_to_bytes4(1), vec![1, 0, 0, 0]);
        assert_eq!(int_to_bytes4(u32::MAX), vec![255; 4]);
    }

    #[test]
    fn test_int_to_bytes32() {
        let mut expected = vec![0; 32];
        expected[0] = 1;
        assert_eq!(int_to_bytes32(1), expected);
    }

    #[test]
    fn bytes_roundtrip() {
        let original = 42u64;
        let bytes = int_to_bytes8(original);
        assert_eq!(bytes_to_int8(&bytes), original);
    }
}
