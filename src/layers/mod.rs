pub mod linear;
pub mod parameter;

use std::fmt;

use ndarray::{Array2, ArrayViewD};

use crate::error::Result;

pub use linear::Linear;
pub use parameter::{Parameter, Trainable};

/// One differentiable stage of a [`Pipeline`](crate::network::Pipeline).
///
/// `forward` caches whatever `backward` needs, so the two must be called in
/// that order within a training step. `backward` receives ∂L/∂output (same
/// shape as the last forward output) and returns ∂L/∂input; layers with
/// parameters also refresh their gradients as a side effect.
///
/// Every `forward` discards the previous cache first, so a forward that
/// fails leaves nothing for `backward` to consume.
pub trait Layer: fmt::Debug {
    fn name(&self) -> &'static str;

    fn forward(&mut self, x: &Array2<f64>) -> Result<Array2<f64>>;

    fn backward(&mut self, delta: &Array2<f64>) -> Result<Array2<f64>>;

    /// Learnable parameters in a fixed order. Empty for stateless layers.
    fn parameters(&self) -> Vec<&dyn Trainable> {
        Vec::new()
    }

    /// Mutable access to the same parameters, in the same order.
    fn parameters_mut(&mut self) -> Vec<&mut dyn Trainable> {
        Vec::new()
    }

    /// Gradients paired positionally with [`Layer::parameters`].
    fn parameter_deltas(&self) -> Vec<Option<ArrayViewD<'_, f64>>> {
        self.parameters().into_iter().map(|p| p.delta_view()).collect()
    }

    fn parameter_count(&self) -> usize {
        self.parameters().iter().map(|p| p.len()).sum()
    }
}
