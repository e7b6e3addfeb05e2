use ndarray::Array2;

use crate::error::{NetError, Result};
use crate::loss::{Cached, Loss};
use crate::math::ensure_finite;

/// Sum-of-squares error: `0.5 · Σ (x − l)²`.
#[derive(Debug, Clone, Default)]
pub struct MseLoss {
    cache: Option<Cached>,
}

impl MseLoss {
    pub fn new() -> MseLoss {
        MseLoss::default()
    }
}

impl Loss for MseLoss {
    fn name(&self) -> &'static str {
        "mse"
    }

    fn forward(&mut self, predictions: &Array2<f64>, labels: &Array2<f64>) -> Result<f64> {
        self.cache = None;
        let cache = Cached::new("mse forward", predictions, labels)?;
        let loss = 0.5 * (predictions - labels).mapv(|d| d * d).sum();
        if !loss.is_finite() {
            return Err(NetError::NumericInstability { context: "mse forward" });
        }
        self.cache = Some(cache);
        Ok(loss)
    }

    /// `seed · (x − l)`
    fn backward(&self, seed: f64) -> Result<Array2<f64>> {
        let Cached { predictions, labels } = self
            .cache
            .as_ref()
            .ok_or(NetError::BackwardBeforeForward { component: "mse" })?;
        let grad = (predictions - labels) * seed;
        ensure_finite(&grad, "mse backward")?;
        Ok(grad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn half_sum_of_squares() {
        let mut mse = MseLoss::new();
        let loss = mse
            .forward(&array![[1.0, 0.0], [0.5, 0.5]], &array![[0.0, 0.0], [0.0, 1.0]])
            .unwrap();
        assert_eq!(loss, 0.5 * (1.0 + 0.25 + 0.25));
    }

    #[test]
    fn seed_scales_gradient() {
        let mut mse = MseLoss::new();
        mse.forward(&array![[1.0, 0.0]], &array![[0.0, 1.0]]).unwrap();
        assert_eq!(mse.backward(0.1).unwrap(), array![[0.1, -0.1]]);
    }

    #[test]
    fn label_shape_must_match() {
        let mut mse = MseLoss::new();
        assert!(mse.forward(&array![[1.0, 0.0]], &array![[1.0]]).is_err());
        assert!(matches!(
            mse.backward(1.0),
            Err(NetError::BackwardBeforeForward { component: "mse" })
        ));
    }

    #[test]
    fn failed_forward_drops_previous_batch() {
        let mut mse = MseLoss::new();
        mse.forward(&array![[1.0, 0.0]], &array![[0.0, 1.0]]).unwrap();
        assert!(mse.forward(&array![[1.0, 0.0]], &array![[1.0]]).is_err());
        assert!(matches!(
            mse.backward(1.0),
            Err(NetError::BackwardBeforeForward { component: "mse" })
        ));
    }
}
