pub mod cross_entropy;
pub mod loss_type;
pub mod mse;

use std::fmt;

use ndarray::Array2;

use crate::error::{NetError, Result};

pub use cross_entropy::CrossEntropyLoss;
pub use loss_type::LossType;
pub use mse::MseLoss;

/// Terminal node of the forward pipeline.
///
/// `forward` reduces predictions and one-hot labels to a scalar (summed over
/// the whole batch) and caches both. `backward(seed)` returns
/// `seed · ∂L/∂predictions`; the trainer passes the learning rate as the seed
/// so the gradients that flow back are already scaled for the update.
/// A failed `forward` drops the previous cache.
pub trait Loss: fmt::Debug {
    fn name(&self) -> &'static str;

    fn forward(&mut self, predictions: &Array2<f64>, labels: &Array2<f64>) -> Result<f64>;

    fn backward(&self, seed: f64) -> Result<Array2<f64>>;
}

/// Prediction/label pair cached by a loss between forward and backward.
#[derive(Debug, Clone)]
pub(crate) struct Cached {
    pub predictions: Array2<f64>,
    pub labels: Array2<f64>,
}

impl Cached {
    pub fn new(
        context: &'static str,
        predictions: &Array2<f64>,
        labels: &Array2<f64>,
    ) -> Result<Cached> {
        if predictions.dim() != labels.dim() {
            return Err(NetError::shape(context, labels.shape(), predictions.shape()));
        }
        Ok(Cached {
            predictions: predictions.clone(),
            labels: labels.clone(),
        })
    }
}
