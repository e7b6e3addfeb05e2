use ndarray::{Array2, Zip};

use crate::error::{NetError, Result};
use crate::loss::{Cached, Loss};
use crate::math::ensure_finite;

/// Categorical cross-entropy `Σ −l · log(x)` over probabilities `x`,
/// typically the output of a Softmax layer.
///
/// No clamping is applied: a zero probability on a labelled class makes the
/// loss infinite, which is reported as `NumericInstability`.
#[derive(Debug, Clone, Default)]
pub struct CrossEntropyLoss {
    cache: Option<Cached>,
}

impl CrossEntropyLoss {
    pub fn new() -> CrossEntropyLoss {
        CrossEntropyLoss::default()
    }
}

impl Loss for CrossEntropyLoss {
    fn name(&self) -> &'static str {
        "cross_entropy"
    }

    fn forward(&mut self, predictions: &Array2<f64>, labels: &Array2<f64>) -> Result<f64> {
        self.cache = None;
        let cache = Cached::new("cross-entropy forward", predictions, labels)?;
        // Unlabelled entries contribute nothing, even where log(x) is -inf.
        let loss: f64 = predictions
            .iter()
            .zip(labels.iter())
            .fold(0.0, |acc, (&x, &l)| if l == 0.0 { acc } else { acc - l * x.ln() });
        if !loss.is_finite() {
            return Err(NetError::NumericInstability { context: "cross-entropy forward" });
        }
        self.cache = Some(cache);
        Ok(loss)
    }

    /// `−seed · l / x`
    fn backward(&self, seed: f64) -> Result<Array2<f64>> {
        let Cached { predictions, labels } = self
            .cache
            .as_ref()
            .ok_or(NetError::BackwardBeforeForward { component: "cross_entropy" })?;
        let grad = Zip::from(predictions)
            .and(labels)
            .map_collect(|&x, &l| if l == 0.0 { 0.0 } else { -seed * l / x });
        ensure_finite(&grad, "cross-entropy backward")?;
        Ok(grad)
    }
}
