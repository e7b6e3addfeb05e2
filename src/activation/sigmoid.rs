use ndarray::{Array2, Zip};

use crate::error::{NetError, Result};
use crate::layers::Layer;
use crate::math::ensure_finite;

/// Element-wise logistic function `1 / (1 + e^-x)`.
#[derive(Debug, Clone, Default)]
pub struct Sigmoid {
    output: Option<Array2<f64>>,
}

impl Sigmoid {
    pub fn new() -> Sigmoid {
        Sigmoid::default()
    }
}

/// Evaluated so that `exp` only ever sees a non-positive argument.
fn logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

impl Layer for Sigmoid {
    fn name(&self) -> &'static str {
        "sigmoid"
    }

    fn forward(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.output = None;
        let r = x.mapv(logistic);
        ensure_finite(&r, "sigmoid forward")?;
        self.output = Some(r.clone());
        Ok(r)
    }

    fn backward(&mut self, delta: &Array2<f64>) -> Result<Array2<f64>> {
        let r = self
            .output
            .as_ref()
            .ok_or(NetError::BackwardBeforeForward { component: "sigmoid" })?;
        if delta.dim() != r.dim() {
            return Err(NetError::shape("sigmoid backward", r.shape(), delta.shape()));
        }
        Ok(Zip::from(delta).and(r).map_collect(|&d, &r| d * r * (1.0 - r)))
    }
}
