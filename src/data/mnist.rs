use std::path::Path;

use tracing::info;

use crate::data::buffer::Buffer;
use crate::data::idx::read_idx;
use crate::error::Result;

pub const CLASSES: usize = 10;

pub const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
pub const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
pub const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
pub const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Loads the standard MNIST files from `dir` as `(train, test)` buffers.
pub fn load<P: AsRef<Path>>(dir: P) -> Result<(Buffer, Buffer)> {
    let dir = dir.as_ref();
    let train = load_pair(dir, TRAIN_IMAGES, TRAIN_LABELS)?;
    let test = load_pair(dir, TEST_IMAGES, TEST_LABELS)?;
    info!(
        train = train.len(),
        test = test.len(),
        dir = %dir.display(),
        "loaded MNIST"
    );
    Ok((train, test))
}

fn load_pair(dir: &Path, images: &str, labels: &str) -> Result<Buffer> {
    let images = read_idx(dir.join(images))?;
    let labels = read_idx(dir.join(labels))?;
    Buffer::from_idx(images, labels, CLASSES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetError;
    use tempfile::tempdir;

    fn idx_bytes(dims: &[u32], payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0, 0, 0x08, dims.len() as u8];
        for d in dims {
            bytes.extend_from_slice(&d.to_be_bytes());
        }
        bytes.extend_from_slice(payload);
        bytes
    }

    fn write_split(dir: &Path, images: &str, labels: &str, items: &[u8]) {
        let pixels: Vec<u8> = items.iter().flat_map(|&l| [l; 4]).collect();
        std::fs::write(dir.join(images), idx_bytes(&[items.len() as u32, 2, 2], &pixels)).unwrap();
        std::fs::write(dir.join(labels), idx_bytes(&[items.len() as u32], items)).unwrap();
    }

    #[test]
    fn loads_both_splits_from_a_directory() {
        let dir = tempdir().unwrap();
        write_split(dir.path(), TRAIN_IMAGES, TRAIN_LABELS, &[3, 1, 4]);
        write_split(dir.path(), TEST_IMAGES, TEST_LABELS, &[9, 0]);

        let (train, test) = load(dir.path()).unwrap();
        assert_eq!(train.len(), 3);
        assert_eq!(test.len(), 2);
        assert_eq!(train.item_dims(), &[2, 2]);
        assert_eq!(train.classes(), CLASSES);
        assert_eq!(test.classes(), CLASSES);
    }

    #[test]
    fn missing_test_files_are_io_errors() {
        let dir = tempdir().unwrap();
        write_split(dir.path(), TRAIN_IMAGES, TRAIN_LABELS, &[1]);
        assert!(matches!(load(dir.path()), Err(NetError::Io(_))));
    }

    #[test]
    fn mismatched_item_counts_are_rejected() {
        let dir = tempdir().unwrap();
        write_split(dir.path(), TRAIN_IMAGES, TRAIN_LABELS, &[1, 2]);
        write_split(dir.path(), TEST_IMAGES, TEST_LABELS, &[1]);
        std::fs::write(dir.path().join(TEST_LABELS), idx_bytes(&[2], &[1, 2])).unwrap();
        assert!(matches!(load(dir.path()), Err(NetError::Idx(_))));
    }
}
