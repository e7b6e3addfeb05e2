use ndarray::{Array, Array2, ArrayBase, Data, Dimension, ShapeBuilder};
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{NetError, Result};

/// Samples an array of the given shape from N(0, 1).
///
/// Elements are drawn in logical (row-major) order, so the same seed always
/// yields the same array.
pub fn standard_normal<Sh, D, R>(shape: Sh, rng: &mut R) -> Array<f64, D>
where
    Sh: ShapeBuilder<Dim = D>,
    D: Dimension,
    R: Rng + ?Sized,
{
    Array::from_shape_simple_fn(shape, || StandardNormal.sample(&mut *rng))
}

/// Index of the maximum element of every row.
///
/// NaN entries never win a comparison; an empty row maps to 0.
pub fn argmax_rows(m: &Array2<f64>) -> Vec<usize> {
    m.rows()
        .into_iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                    Some((_, b)) if !(v > b) => best,
                    _ if v.is_nan() => best,
                    _ => Some((i, v)),
                })
                .map(|(i, _)| i)
                .unwrap_or(0)
        })
        .collect()
}

/// Fraction of rows whose prediction argmax matches the one-hot label argmax.
pub fn accuracy(predictions: &Array2<f64>, labels: &Array2<f64>) -> Result<f64> {
    if predictions.dim() != labels.dim() {
        return Err(NetError::shape("accuracy", labels.shape(), predictions.shape()));
    }
    let n = predictions.nrows();
    if n == 0 {
        return Ok(0.0);
    }
    let correct = argmax_rows(predictions)
        .into_iter()
        .zip(argmax_rows(labels))
        .filter(|(p, t)| p == t)
        .count();
    Ok(correct as f64 / n as f64)
}

/// Fails with `NumericInstability` if any element is NaN or infinite.
pub fn ensure_finite<S, D>(a: &ArrayBase<S, D>, context: &'static str) -> Result<()>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    if a.iter().all(|x| x.is_finite()) {
        Ok(())
    } else {
        Err(NetError::NumericInstability { context })
    }
}
