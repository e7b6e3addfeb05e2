pub mod buffer;
pub mod idx;
pub mod mnist;

use ndarray::{Array2, ArrayD};
use rand::Rng;

use crate::error::{NetError, Result};

pub use buffer::{one_hot, Batch, Buffer};
pub use idx::{parse_idx, read_idx, IdxArray};

/// Scales raw byte intensities into the unit interval.
///
/// Without dequantization this is `raw / 255`. With it, uniform noise in
/// `[0, 1)` is added to every value before dividing by 256, which spreads the
/// 256 discrete levels over `[0, 1)`.
pub fn normalize<R: Rng + ?Sized>(raw: &ArrayD<f64>, dequantize: bool, rng: &mut R) -> ArrayD<f64> {
    if dequantize {
        raw.mapv(|v| (v + rng.gen::<f64>()) / 256.0)
    } else {
        raw.mapv(|v| v / 255.0)
    }
}

/// Collapses every dimension after the first, giving `[batch, features]`.
pub fn flatten(inputs: ArrayD<f64>) -> Result<Array2<f64>> {
    let shape = inputs.shape().to_vec();
    let rows = shape.first().copied().unwrap_or(0);
    let features: usize = shape.iter().skip(1).product();
    inputs
        .as_standard_layout()
        .into_owned()
        .into_shape((rows, features))
        .map_err(|_| NetError::shape("flatten", &[rows, features], &shape))
}
