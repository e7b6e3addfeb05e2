//! Reader for the IDX binary format used by MNIST and its derivatives.
//!
//! ```text
//! bytes  0-1:   0x00 0x00       (reserved, must be zero)
//! byte   2:     element type    (only 0x08 = uint8 is supported)
//! byte   3:     n_dims          (number of dimensions, >= 1)
//! then n_dims big-endian u32 dimension sizes
//! then product(dims) payload bytes, row-major
//! ```

use std::path::Path;

use crate::error::{NetError, Result};

const UNSIGNED_BYTE: u8 = 0x08;

/// A decoded IDX file: its dimensions and raw unsigned-byte payload.
///
/// Only [`parse_idx`] builds one, so `data.len()` always equals the product
/// of `dims` and there is at least one dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdxArray {
    dims: Vec<usize>,
    data: Vec<u8>,
}

impl IdxArray {
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Dimensions of one item, i.e. everything after the leading one.
    pub fn item_dims(&self) -> &[usize] {
        self.dims.get(1..).unwrap_or(&[])
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Number of items along the leading dimension.
    pub fn len(&self) -> usize {
        self.dims.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Product of the trailing dimensions (e.g. 28·28 for images, 1 for labels).
    pub fn item_size(&self) -> usize {
        self.item_dims().iter().product()
    }
}

/// Parses an in-memory IDX file.
pub fn parse_idx(bytes: &[u8]) -> Result<IdxArray> {
    if bytes.len() < 4 {
        return Err(NetError::Idx(format!(
            "file too short: expected at least 4 header bytes, got {}",
            bytes.len()
        )));
    }
    if bytes[0] != 0x00 || bytes[1] != 0x00 {
        return Err(NetError::Idx(format!(
            "bytes 0-1 must be 0x00 0x00 (reserved), got 0x{:02X} 0x{:02X}",
            bytes[0], bytes[1]
        )));
    }
    if bytes[2] != UNSIGNED_BYTE {
        return Err(NetError::Idx(format!(
            "element type 0x{:02X} is not supported (only 0x08, unsigned byte)",
            bytes[2]
        )));
    }
    let n_dims = bytes[3] as usize;
    if n_dims == 0 {
        return Err(NetError::Idx("file declares zero dimensions".into()));
    }

    let header_len = 4 + 4 * n_dims;
    if bytes.len() < header_len {
        return Err(NetError::Idx(format!(
            "file too short: {n_dims} dimensions need a {header_len}-byte header, got {} bytes",
            bytes.len()
        )));
    }
    let dims: Vec<usize> = bytes[4..header_len]
        .chunks_exact(4)
        .map(|c| u32::from_be_bytes([c[0], c[1], c[2], c[3]]) as usize)
        .collect();

    let payload_len = dims
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| NetError::Idx(format!("dimensions {dims:?} overflow usize")))?;
    let payload = &bytes[header_len..];
    if payload.len() != payload_len {
        return Err(NetError::Idx(format!(
            "dimensions {dims:?} need {payload_len} payload bytes, found {}",
            payload.len()
        )));
    }

    Ok(IdxArray {
        dims,
        data: payload.to_vec(),
    })
}

/// Reads and parses an IDX file from disk.
pub fn read_idx<P: AsRef<Path>>(path: P) -> Result<IdxArray> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_idx(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(dims: &[u32], payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, UNSIGNED_BYTE, dims.len() as u8];
        for d in dims {
            bytes.extend_from_slice(&d.to_be_bytes());
        }
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn parses_three_dimensional_images() {
        let payload: Vec<u8> = (0..12).collect();
        let idx = parse_idx(&encode(&[3, 2, 2], &payload)).unwrap();
        assert_eq!(idx.dims(), &[3, 2, 2]);
        assert_eq!(idx.item_dims(), &[2, 2]);
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.item_size(), 4);
        assert_eq!(idx.data(), payload.as_slice());
    }

    #[test]
    fn parses_labels() {
        let idx = parse_idx(&encode(&[4], &[7, 0, 9, 1])).unwrap();
        assert_eq!(idx.item_size(), 1);
        assert_eq!(idx.data(), &[7, 0, 9, 1]);
        assert!(idx.item_dims().is_empty());
    }

    #[test]
    fn rejects_truncated_payload() {
        let err = parse_idx(&encode(&[2, 2], &[1, 2, 3])).unwrap_err();
        assert!(matches!(err, NetError::Idx(_)));
    }

    #[test]
    fn rejects_unsupported_element_type() {
        let mut bytes = encode(&[1], &[0]);
        bytes[2] = 0x0D;
        assert!(parse_idx(&bytes).is_err());
    }

    #[test]
    fn rejects_nonzero_reserved_bytes() {
        let mut bytes = encode(&[1], &[0]);
        bytes[0] = 0x01;
        assert!(parse_idx(&bytes).is_err());
    }

    #[test]
    fn dimensionless_array_reports_no_items() {
        let idx = IdxArray {
            dims: Vec::new(),
            data: Vec::new(),
        };
        assert_eq!(idx.len(), 0);
        assert!(idx.is_empty());
        assert!(idx.item_dims().is_empty());
        assert_eq!(idx.item_size(), 1);
    }

    #[test]
    fn zero_dimension_header_is_rejected() {
        assert!(matches!(parse_idx(&[0, 0, 8, 0]), Err(NetError::Idx(_))));
    }

    #[test]
    fn rejects_short_header() {
        assert!(parse_idx(&[0, 0, 8]).is_err());
        assert!(parse_idx(&[0, 0, 8, 2, 0, 0, 0, 1]).is_err());
    }
}
