use ndarray::{Array2, Axis};

use crate::error::{NetError, Result};
use crate::layers::Layer;
use crate::math::ensure_finite;

/// Row-wise normalized exponential: each row of the output sums to 1.
///
/// Entries are strictly positive unless an input sits more than about 745
/// below its row maximum, where `exp` underflows and the entry is exactly 0.
#[derive(Debug, Clone, Default)]
pub struct Softmax {
    output: Option<Array2<f64>>,
}

impl Softmax {
    pub fn new() -> Softmax {
        Softmax::default()
    }
}

impl Layer for Softmax {
    fn name(&self) -> &'static str {
        "softmax"
    }

    fn forward(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.output = None;
        let mut out = x.to_owned();
        for mut row in out.rows_mut() {
            // Shift by the row maximum so the largest exponent is e^0.
            let max = row.fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            row.mapv_inplace(|v| (v - max).exp());
            let sum = row.sum();
            row /= sum;
        }
        ensure_finite(&out, "softmax forward")?;
        self.output = Some(out.clone());
        Ok(out)
    }

    /// Jacobian-vector product `δ⊙s − s·Σ(δ⊙s)` with the sum taken per row.
    fn backward(&mut self, delta: &Array2<f64>) -> Result<Array2<f64>> {
        let out = self
            .output
            .as_ref()
            .ok_or(NetError::BackwardBeforeForward { component: "softmax" })?;
        if delta.dim() != out.dim() {
            return Err(NetError::shape("softmax backward", out.shape(), delta.shape()));
        }
        let weighted = delta * out;
        let row_sums = weighted.sum_axis(Axis(1)).insert_axis(Axis(1));
        Ok(&weighted - &(out * &row_sums))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn rows_are_distributions() {
        let mut s = Softmax::new();
        let y = s.forward(&array![[1.0, 2.0, 3.0], [-20.0, 0.0, 20.0]]).unwrap();
        for row in y.rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-12);
            assert!(row.iter().all(|&p| p > 0.0 && p <= 1.0));
        }
    }

    #[test]
    fn extreme_gaps_underflow_to_zero() {
        let mut s = Softmax::new();
        let y = s.forward(&array![[800.0, 800.0, -800.0], [0.0, -800.0, 0.0]]).unwrap();
        assert_eq!(y, array![[0.5, 0.5, 0.0], [0.5, 0.0, 0.5]]);
    }

    #[test]
    fn failed_forward_drops_previous_output() {
        let mut s = Softmax::new();
        s.forward(&array![[0.0, 1.0]]).unwrap();
        assert!(s.forward(&array![[f64::NAN, 0.0]]).is_err());
        assert!(matches!(
            s.backward(&array![[1.0, 0.0]]),
            Err(NetError::BackwardBeforeForward { component: "softmax" })
        ));
    }

    #[test]
    fn uniform_upstream_gradient_vanishes() {
        let mut s = Softmax::new();
        s.forward(&array![[0.3, -1.2, 2.0]]).unwrap();
        let dx = s.backward(&array![[1.0, 1.0, 1.0]]).unwrap();
        assert!(dx.iter().all(|g| g.abs() < 1e-12));
    }

    #[test]
    fn backward_checks_shape() {
        let mut s = Softmax::new();
        s.forward(&array![[0.0, 1.0]]).unwrap();
        assert!(matches!(
            s.backward(&array![[1.0, 2.0, 3.0]]),
            Err(NetError::ShapeMismatch { .. })
        ));
    }
}
